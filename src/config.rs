//! Validator configuration document.
//!
//! ```yaml
//! # applies to every namespace
//! networkValidator:
//!   podSelector:
//!     matchLabels:
//!       rules:
//!       - { name: LabelCount, operator: Ge, value: 1 }
//!   allowedPolicyTypes: [Ingress, Egress]
//! # applies to matching namespaces only
//! networkValidators:
//! - namespace: "^kube-"
//!   ingress:
//!     from:
//!       ipBlock:
//!         cidr:
//!           rules:
//!           - { name: MaskBitsSize, operator: Gt, value: 20 }
//! ```

use crate::admission::AdmissionValidator;
use crate::validator::NetworkPolicyValidator;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Validator applied to every namespace.
    pub network_validator: Option<NetworkPolicyValidator>,

    /// Validators applied to the namespaces matching their pattern.
    pub network_validators: Vec<ScopedValidator>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ScopedValidator {
    /// Namespace regular expression; empty matches every namespace.
    pub namespace: String,

    #[serde(flatten)]
    pub validator: NetworkPolicyValidator,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("read config failed: {0}: {1}")]
    Read(String, std::io::Error),
    #[error("parse config failed: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid namespace pattern {pattern:?}: {source}")]
    NamespacePattern {
        pattern: String,
        source: regex::Error,
    },
}

impl TryFrom<Config> for AdmissionValidator {
    type Error = Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let mut validator = match config.network_validator {
            Some(v) => AdmissionValidator::new(v),
            None => AdmissionValidator::default(),
        };

        for ScopedValidator { namespace, validator: v } in config.network_validators {
            validator = (validator.with_scope(&namespace, v)).map_err(|source| {
                Error::NamespacePattern {
                    pattern: namespace,
                    source,
                }
            })?;
        }

        Ok(validator)
    }
}

/// Parse a YAML (or JSON) configuration document.
pub fn from_slice(data: &[u8]) -> Result<AdmissionValidator, Error> {
    let config: Config = serde_yaml::from_slice(data)?;
    config.try_into()
}

/// Read and parse a configuration file.
pub async fn read(path: &str) -> Result<AdmissionValidator, Error> {
    let data = (tokio::fs::read(path).await).map_err(|e| Error::Read(path.to_string(), e))?;
    from_slice(&data)
}
