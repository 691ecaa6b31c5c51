//! # Command Kinds
//!
//! The three operations a proven email can authorize:
//!
//! | kind               | template                                   | params                 |
//! |--------------------|--------------------------------------------|------------------------|
//! | [`WithdrawAll`]    | `Withdraw all eth to {ethAddr}`            | `target`               |
//! | [`LinkTextRecord`] | `Link my x handle to {string}` (or email)  | `ens_name`             |
//! | [`ClaimEmailName`] | `Claim ENS name for address {ethAddr}`     | `email_parts`, `owner` |

use serde::{Deserialize, Serialize};

use zkreg_core::{Address, ClaimError};

use crate::command::{masked_param, CommandKind};
use crate::public_inputs::PublicInputSet;
use crate::template::{CommandTemplate, ParamKind, TemplateValue};

/// Sweep the custodial account's full balance to a target address.
#[derive(Debug, Clone)]
pub struct WithdrawAll {
    template: CommandTemplate,
}

impl WithdrawAll {
    pub const TEMPLATE: &'static str = "Withdraw all eth to {ethAddr}";

    pub fn new() -> Self {
        Self {
            template: CommandTemplate::parse(Self::TEMPLATE),
        }
    }
}

impl Default for WithdrawAll {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawParams {
    pub target: Address,
}

impl CommandKind for WithdrawAll {
    type Params = WithdrawParams;

    fn name(&self) -> &'static str {
        "withdraw"
    }

    fn template(&self) -> &CommandTemplate {
        &self.template
    }

    fn template_values(&self, params: &WithdrawParams) -> Vec<TemplateValue> {
        vec![TemplateValue::EthAddr(params.target)]
    }

    fn params_from_inputs(&self, inputs: &PublicInputSet) -> Result<WithdrawParams, ClaimError> {
        match masked_param(&self.template, inputs, 0, ParamKind::EthAddr)? {
            TemplateValue::EthAddr(target) => Ok(WithdrawParams { target }),
            other => Err(ClaimError::Format(format!("unexpected parameter {other:?}"))),
        }
    }
}

/// Point a text record at an ENS name.
#[derive(Debug, Clone)]
pub struct LinkTextRecord {
    template: CommandTemplate,
}

impl LinkTextRecord {
    pub const X_HANDLE_TEMPLATE: &'static str = "Link my x handle to {string}";
    pub const EMAIL_TEMPLATE: &'static str = "Link my email to {string}";

    /// Handle-based linking (x.com sender).
    pub fn x_handle() -> Self {
        Self {
            template: CommandTemplate::parse(Self::X_HANDLE_TEMPLATE),
        }
    }

    /// Email-based linking.
    pub fn email() -> Self {
        Self {
            template: CommandTemplate::parse(Self::EMAIL_TEMPLATE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkParams {
    pub ens_name: String,
}

impl CommandKind for LinkTextRecord {
    type Params = LinkParams;

    fn name(&self) -> &'static str {
        "link"
    }

    fn template(&self) -> &CommandTemplate {
        &self.template
    }

    fn template_values(&self, params: &LinkParams) -> Vec<TemplateValue> {
        vec![TemplateValue::String(params.ens_name.clone())]
    }

    fn params_from_inputs(&self, inputs: &PublicInputSet) -> Result<LinkParams, ClaimError> {
        match masked_param(&self.template, inputs, 0, ParamKind::String)? {
            TemplateValue::String(ens_name) => Ok(LinkParams { ens_name }),
            other => Err(ClaimError::Format(format!("unexpected parameter {other:?}"))),
        }
    }
}

/// Claim `<email with @ as $>.<parent>` and point it at an owner.
#[derive(Debug, Clone)]
pub struct ClaimEmailName {
    template: CommandTemplate,
}

impl ClaimEmailName {
    pub const TEMPLATE: &'static str = "Claim ENS name for address {ethAddr}";

    pub fn new() -> Self {
        Self {
            template: CommandTemplate::parse(Self::TEMPLATE),
        }
    }

    /// Dot-separated labels of an email once `@` is replaced by `$`.
    pub fn email_parts(email: &str) -> Vec<String> {
        email_as_name(email).split('.').map(str::to_string).collect()
    }
}

impl Default for ClaimEmailName {
    fn default() -> Self {
        Self::new()
    }
}

fn email_as_name(email: &str) -> String {
    email.replace('@', "$")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimNameParams {
    /// Labels of the claimed name, leftmost first.
    pub email_parts: Vec<String>,
    pub owner: Address,
}

impl CommandKind for ClaimEmailName {
    type Params = ClaimNameParams;

    fn name(&self) -> &'static str {
        "claim-name"
    }

    fn template(&self) -> &CommandTemplate {
        &self.template
    }

    fn template_values(&self, params: &ClaimNameParams) -> Vec<TemplateValue> {
        vec![TemplateValue::EthAddr(params.owner)]
    }

    fn params_from_inputs(&self, inputs: &PublicInputSet) -> Result<ClaimNameParams, ClaimError> {
        let owner = match masked_param(&self.template, inputs, 0, ParamKind::EthAddr)? {
            TemplateValue::EthAddr(owner) => owner,
            other => return Err(ClaimError::Format(format!("unexpected parameter {other:?}"))),
        };
        Ok(ClaimNameParams {
            email_parts: Self::email_parts(&inputs.claimed_identity),
            owner,
        })
    }

    /// The proven email, `@` replaced by `$`, must equal the joined parts
    /// byte for byte, and no part may be empty.
    fn check_structure(&self, params: &ClaimNameParams, inputs: &PublicInputSet) -> bool {
        !params.email_parts.iter().any(String::is_empty)
            && email_as_name(&inputs.claimed_identity) == params.email_parts.join(".")
    }
}

#[cfg(test)]
mod tests {
    use zkreg_core::{Bytes32, Nullifier};

    use super::*;

    fn inputs(identity: &str, masked: &str) -> PublicInputSet {
        PublicInputSet {
            domain_name: "gmail.com".into(),
            public_key_hash: Bytes32::new([1; 32]),
            header_hash: Bytes32::ZERO,
            nullifier: Nullifier::new([2; 32]),
            timestamp: 0,
            masked_command: masked.into(),
            account_salt: Bytes32::ZERO,
            is_code_exist: false,
            auxiliary_key_hash: Bytes32::ZERO,
            claimed_identity: identity.into(),
            sender_domain: "gmail.com".into(),
            prover_address: Address::ZERO,
        }
    }

    #[test]
    fn withdraw_params_from_masked_command() {
        let kind = WithdrawAll::new();
        let i = inputs("thezdev1", "Withdraw all eth to 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        let params = kind.params_from_inputs(&i).unwrap();
        assert_eq!(
            params.target,
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap()
        );
    }

    #[test]
    fn withdraw_params_missing_is_format_error() {
        let kind = WithdrawAll::new();
        let i = inputs("thezdev1", "Withdraw all eth");
        assert!(matches!(kind.params_from_inputs(&i), Err(ClaimError::Format(_))));
    }

    #[test]
    fn link_templates() {
        let kind = LinkTextRecord::email();
        let i = inputs("alice@mail.com", "Link my email to alice.zk.eth");
        assert_eq!(
            kind.params_from_inputs(&i).unwrap(),
            LinkParams {
                ens_name: "alice.zk.eth".into()
            }
        );
        assert_eq!(LinkTextRecord::x_handle().template().to_string(), LinkTextRecord::X_HANDLE_TEMPLATE);
    }

    #[test]
    fn email_parts_split_on_dots_after_at_replacement() {
        assert_eq!(
            ClaimEmailName::email_parts("alice.b@mail.com"),
            vec!["alice", "b$mail", "com"]
        );
    }

    #[test]
    fn claim_name_structure_check() {
        let kind = ClaimEmailName::new();
        let i = inputs(
            "alice@mail.com",
            "Claim ENS name for address 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        );
        let params = kind.params_from_inputs(&i).unwrap();
        assert_eq!(params.email_parts, vec!["alice$mail", "com"]);
        assert!(kind.check_structure(&params, &i));

        let mut forged = params.clone();
        forged.email_parts = vec!["bob$mail".into(), "com".into()];
        assert!(!kind.check_structure(&forged, &i));

        let mut empty = params;
        empty.email_parts = vec!["alice$mail".into(), "".into(), "com".into()];
        assert!(!kind.check_structure(&empty, &i));
    }
}
