//! # Command Templates
//!
//! A template is a space-separated sentence of literal words and typed
//! placeholders, e.g. `Withdraw all eth to {ethAddr}`. The circuit proves the
//! masked subject line; the verifier rebuilds that line from the claimed
//! parameters and requires equality.
//!
//! Matching is positional: parameter *n* is the word at the position of the
//! *n*-th placeholder, and a string parameter is exactly one word.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkreg_core::Address;

/// Fixed-point scale of a `{decimals}` placeholder.
pub const DECIMALS: u32 = 18;

/// Error building or parsing template parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template expects {expected} parameters, got {actual}")]
    ParamCount { expected: usize, actual: usize },

    #[error("parameter {index} is {actual}, template expects {expected}")]
    ParamKind {
        index: usize,
        expected: ParamKind,
        actual: ParamKind,
    },

    #[error("cannot parse {token:?} as {kind}")]
    InvalidValue { kind: ParamKind, token: String },

    #[error("unknown placeholder kind {0:?}")]
    UnknownKind(String),

    #[error("unknown address casing {0:?}")]
    UnknownCasing(String),
}

/// Placeholder type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    String,
    Uint,
    Int,
    Decimals,
    EthAddr,
}

impl ParamKind {
    /// The placeholder as written in a template.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::String => "{string}",
            Self::Uint => "{uint}",
            Self::Int => "{int}",
            Self::Decimals => "{decimals}",
            Self::EthAddr => "{ethAddr}",
        }
    }

    /// Recognize a placeholder word.
    pub fn from_marker(word: &str) -> Option<Self> {
        match word {
            "{string}" => Some(Self::String),
            "{uint}" => Some(Self::Uint),
            "{int}" => Some(Self::Int),
            "{decimals}" => Some(Self::Decimals),
            "{ethAddr}" => Some(Self::EthAddr),
            _ => None,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Parses the bare kind name (`string`, `uint`, `ethAddr`, ...) or the marker.
impl FromStr for ParamKind {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = Self::from_marker(s) {
            return Ok(kind);
        }
        match s {
            "string" => Ok(Self::String),
            "uint" => Ok(Self::Uint),
            "int" => Ok(Self::Int),
            "decimals" => Ok(Self::Decimals),
            "ethAddr" | "ethaddr" | "address" => Ok(Self::EthAddr),
            other => Err(TemplateError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    Literal(String),
    Param(ParamKind),
}

/// A parsed command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<TemplateToken>,
}

impl CommandTemplate {
    /// Split on single spaces; placeholder words become [`TemplateToken::Param`].
    pub fn parse(template: &str) -> Self {
        let tokens = template
            .split(' ')
            .map(|word| match ParamKind::from_marker(word) {
                Some(kind) => TemplateToken::Param(kind),
                None => TemplateToken::Literal(word.to_string()),
            })
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Placeholder kinds in order.
    pub fn param_kinds(&self) -> Vec<ParamKind> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                TemplateToken::Param(kind) => Some(*kind),
                TemplateToken::Literal(_) => None,
            })
            .collect()
    }

    pub fn param_count(&self) -> usize {
        self.param_kinds().len()
    }

    /// Word position of the `index`-th placeholder.
    fn param_position(&self, index: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(t, TemplateToken::Param(_)))
            .nth(index)
            .map(|(pos, _)| pos)
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                TemplateToken::Literal(word) => f.write_str(word)?,
                TemplateToken::Param(kind) => f.write_str(kind.marker())?,
            }
        }
        Ok(())
    }
}

/// How `{ethAddr}` values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressCasing {
    /// EIP-55 mixed case.
    #[default]
    Checksum,
    Lowercase,
    Uppercase,
}

impl AddressCasing {
    pub const ALL: [AddressCasing; 3] = [Self::Checksum, Self::Lowercase, Self::Uppercase];

    pub fn render(&self, address: &Address) -> String {
        match self {
            Self::Checksum => address.to_checksum(),
            Self::Lowercase => address.to_lowercase_hex(),
            Self::Uppercase => address.to_uppercase_hex(),
        }
    }
}

impl fmt::Display for AddressCasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum => write!(f, "checksum"),
            Self::Lowercase => write!(f, "lowercase"),
            Self::Uppercase => write!(f, "uppercase"),
        }
    }
}

impl FromStr for AddressCasing {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checksum" => Ok(Self::Checksum),
            "lowercase" => Ok(Self::Lowercase),
            "uppercase" => Ok(Self::Uppercase),
            other => Err(TemplateError::UnknownCasing(other.to_string())),
        }
    }
}

/// A typed value substituted for a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TemplateValue {
    String(String),
    Uint(u128),
    Int(i128),
    /// Fixed-point with [`DECIMALS`] fractional digits, stored scaled.
    Decimals(u128),
    EthAddr(Address),
}

impl TemplateValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::String(_) => ParamKind::String,
            Self::Uint(_) => ParamKind::Uint,
            Self::Int(_) => ParamKind::Int,
            Self::Decimals(_) => ParamKind::Decimals,
            Self::EthAddr(_) => ParamKind::EthAddr,
        }
    }

    /// Canonical rendering in a command sentence.
    pub fn render(&self, casing: AddressCasing) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Uint(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Decimals(v) => render_decimals(*v),
            Self::EthAddr(a) => casing.render(a),
        }
    }

    /// Parse one command word as a value of `kind`.
    pub fn parse(kind: ParamKind, token: &str) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidValue {
            kind,
            token: token.to_string(),
        };
        match kind {
            ParamKind::String => {
                if token.is_empty() || token.contains(' ') {
                    Err(invalid())
                } else {
                    Ok(Self::String(token.to_string()))
                }
            }
            ParamKind::Uint => token.parse().map(Self::Uint).map_err(|_| invalid()),
            ParamKind::Int => token.parse().map(Self::Int).map_err(|_| invalid()),
            ParamKind::Decimals => parse_decimals(token).map(Self::Decimals).ok_or_else(invalid),
            ParamKind::EthAddr => {
                if !token.starts_with("0x") {
                    return Err(invalid());
                }
                token.parse().map(Self::EthAddr).map_err(|_| invalid())
            }
        }
    }
}

fn render_decimals(value: u128) -> String {
    let scale = 10u128.pow(DECIMALS);
    let int = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return int.to_string();
    }
    let frac = format!("{frac:0width$}", width = DECIMALS as usize);
    format!("{int}.{}", frac.trim_end_matches('0'))
}

fn parse_decimals(token: &str) -> Option<u128> {
    let (int, frac) = match token.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (token, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int.is_empty() || !all_digits(int) || !all_digits(frac) || frac.len() > DECIMALS as usize {
        return None;
    }
    if token.contains('.') && frac.is_empty() {
        return None;
    }
    let scale = 10u128.pow(DECIMALS);
    let int: u128 = int.parse().ok()?;
    let frac: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = DECIMALS as usize);
        padded.parse().ok()?
    };
    int.checked_mul(scale)?.checked_add(frac)
}

/// The word of `text` at the position of the `param_index`-th placeholder.
pub fn extract_param<'t>(
    template: &CommandTemplate,
    text: &'t str,
    param_index: usize,
) -> Option<&'t str> {
    let position = template.param_position(param_index)?;
    text.split(' ').nth(position)
}

/// Substitute `params` into `template`, rendering addresses with `casing`.
pub fn build_expected_command(
    params: &[TemplateValue],
    template: &CommandTemplate,
    casing: AddressCasing,
) -> Result<String, TemplateError> {
    let expected = template.param_count();
    if params.len() != expected {
        return Err(TemplateError::ParamCount {
            expected,
            actual: params.len(),
        });
    }

    let mut values = params.iter().enumerate();
    let mut words = Vec::with_capacity(template.tokens.len());
    for token in &template.tokens {
        match token {
            TemplateToken::Literal(word) => words.push(word.clone()),
            TemplateToken::Param(kind) => {
                let Some((index, value)) = values.next() else {
                    return Err(TemplateError::ParamCount {
                        expected,
                        actual: params.len(),
                    });
                };
                if value.kind() != *kind {
                    return Err(TemplateError::ParamKind {
                        index,
                        expected: *kind,
                        actual: value.kind(),
                    });
                }
                words.push(value.render(casing));
            }
        }
    }
    Ok(words.join(" "))
}
