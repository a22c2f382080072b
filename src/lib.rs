pub mod admission;
pub mod config;
pub mod mask;
pub mod operator;
pub mod rule;
pub mod validator;
pub mod webhook;

pub use admission::AdmissionValidator;

use operator::{Operator, Unsupported};
use rule::RuleKind;

/// Why a NetworkPolicy is refused. Only the first failure is reported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{}: {} must be {operator} {operand}, got {actual}", .kind.reason(), .kind.subject())]
    Rule {
        kind: RuleKind,
        operator: Operator,
        operand: i64,
        actual: i64,
    },
    #[error("InvalidCidr: {cidr:?} is not a valid CIDR: {reason}")]
    MalformedCidr { cidr: String, reason: String },
    #[error("PolicyType {0} is not allowed for this namespace")]
    PolicyType(String),
    #[error(transparent)]
    UnsupportedOperator(#[from] Unsupported),
}
