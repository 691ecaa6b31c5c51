//! # Registrar Configuration
//!
//! Loaded from YAML:
//!
//! ```yaml
//! parent_domain: x.zk.eth
//! registrar: "0x1111111111111111111111111111111111111111"
//! account_implementation: "0x2222222222222222222222222222222222222222"
//! resolver: "0x3333333333333333333333333333333333333333"   # name claims only
//! address_casings: [checksum, lowercase]                    # default: all three
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkreg_core::Address;
use zkreg_zkp::AddressCasing;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrarConfig {
    /// Domain every claimed identity is registered under.
    pub parent_domain: String,
    /// The registrar's own address: account provisioner and name operator.
    pub registrar: Address,
    /// Implementation custodial accounts are cloned from.
    pub account_implementation: Address,
    /// Resolver assigned to claimed names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<Address>,
    /// Address renderings accepted in masked commands.
    #[serde(default = "all_casings")]
    pub address_casings: Vec<AddressCasing>,
}

fn all_casings() -> Vec<AddressCasing> {
    AddressCasing::ALL.to_vec()
}

impl RegistrarConfig {
    /// A configuration accepting every address casing and no resolver.
    pub fn new(parent_domain: impl Into<String>, registrar: Address, account_implementation: Address) -> Self {
        Self {
            parent_domain: parent_domain.into(),
            registrar,
            account_implementation,
            resolver: None,
            address_casings: all_casings(),
        }
    }

    pub fn with_resolver(mut self, resolver: Address) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Parse and validate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parent_domain.is_empty() {
            return Err(ConfigError::Invalid("parent_domain is empty".into()));
        }
        if self.parent_domain != self.parent_domain.to_ascii_lowercase() {
            return Err(ConfigError::Invalid(format!(
                "parent_domain {:?} must be lowercase",
                self.parent_domain
            )));
        }
        if self.parent_domain.split('.').any(str::is_empty) {
            return Err(ConfigError::Invalid(format!(
                "parent_domain {:?} has an empty label",
                self.parent_domain
            )));
        }
        if self.registrar.is_zero() {
            return Err(ConfigError::Invalid("registrar is the zero address".into()));
        }
        if self.account_implementation.is_zero() {
            return Err(ConfigError::Invalid(
                "account_implementation is the zero address".into(),
            ));
        }
        if self.resolver.is_some_and(|r| r.is_zero()) {
            return Err(ConfigError::Invalid("resolver is the zero address".into()));
        }
        if self.address_casings.is_empty() {
            return Err(ConfigError::Invalid("address_casings is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const YAML: &str = r#"
parent_domain: x.zk.eth
registrar: "0x1111111111111111111111111111111111111111"
account_implementation: "0x2222222222222222222222222222222222222222"
"#;

    #[test]
    fn defaults_accept_all_casings() {
        let config = RegistrarConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.parent_domain, "x.zk.eth");
        assert_eq!(config.address_casings, AddressCasing::ALL.to_vec());
        assert_eq!(config.resolver, None);
    }

    #[test]
    fn explicit_casings_and_resolver() {
        let yaml = format!(
            "{YAML}resolver: \"0x3333333333333333333333333333333333333333\"\naddress_casings: [checksum]\n"
        );
        let config = RegistrarConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.address_casings, vec![AddressCasing::Checksum]);
        assert_eq!(config.resolver, Some(Address::new([0x33; 20])));
    }

    #[test]
    fn rejects_uppercase_domain() {
        let yaml = YAML.replace("x.zk.eth", "X.zk.eth");
        assert!(matches!(
            RegistrarConfig::from_yaml_str(&yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_zero_registrar() {
        let yaml = YAML.replace("0x1111111111111111111111111111111111111111", &format!("0x{}", "0".repeat(40)));
        assert!(matches!(
            RegistrarConfig::from_yaml_str(&yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_empty_casings() {
        let yaml = format!("{YAML}address_casings: []\n");
        assert!(matches!(
            RegistrarConfig::from_yaml_str(&yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_field() {
        let yaml = format!("{YAML}colour: blue\n");
        assert!(matches!(
            RegistrarConfig::from_yaml_str(&yaml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let config = RegistrarConfig::from_path(file.path()).unwrap();
        assert_eq!(config.registrar, Address::new([0x11; 20]));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RegistrarConfig::from_path(&dir.path().join("absent.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
