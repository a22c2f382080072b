/// Relational operator of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Equals,
    Gt,
    Lt,
    Ge,
    Le,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operator {0} is not supported on numeric subjects")]
pub struct Unsupported(pub Operator);

impl Operator {
    /// The set operators are reserved: nothing implements them yet.
    pub fn is_numeric(self) -> bool {
        use Operator::*;
        matches!(self, Equals | Gt | Lt | Ge | Le)
    }

    pub fn evaluate(self, subject: i64, operand: i64) -> Result<bool, Unsupported> {
        use Operator::*;
        Ok(match self {
            Equals => subject == operand,
            Gt => subject > operand,
            Lt => subject < operand,
            Ge => subject >= operand,
            Le => subject <= operand,
            In | NotIn | Exists | DoesNotExist => return Err(Unsupported(self)),
        })
    }

    pub fn as_str(self) -> &'static str {
        use Operator::*;
        match self {
            In => "In",
            NotIn => "NotIn",
            Exists => "Exists",
            DoesNotExist => "DoesNotExist",
            Equals => "Equals",
            Gt => "Gt",
            Lt => "Lt",
            Ge => "Ge",
            Le => "Le",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
