use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::marker::PhantomData;

use crate::Rejection;
use crate::operator::Operator;

/// What a rule measures on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum RuleKind {
    MaskBitsSize,
    ListSize,
    LabelCount,
    /// Reserved for per-label value constraints; always satisfied for now.
    LabelValues,
    PortNumber,
}

impl RuleKind {
    /// reason code reported on rejection
    pub fn reason(self) -> &'static str {
        use RuleKind::*;
        match self {
            MaskBitsSize => "InvalidMaskSize",
            ListSize => "InvalidListSize",
            LabelCount => "InvalidLabelCount",
            LabelValues => "InvalidLabelValues",
            PortNumber => "InvalidPortNumber",
        }
    }

    /// human name of the measured quantity
    pub fn subject(self) -> &'static str {
        use RuleKind::*;
        match self {
            MaskBitsSize => "mask size",
            ListSize => "list size",
            LabelCount => "the number of labels",
            LabelValues => "label values",
            PortNumber => "port number",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RuleKind::*;
        f.write_str(match self {
            MaskBitsSize => "MaskBitsSize",
            ListSize => "ListSize",
            LabelCount => "LabelCount",
            LabelValues => "LabelValues",
            PortNumber => "PortNumber",
        })
    }
}

/// Rule errors, raised while loading the configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("UnsupportedOperator: operator {operator} cannot be used with rule {kind}")]
    UnsupportedOperator { kind: RuleKind, operator: Operator },
    #[error("rule {kind} cannot be attached to {target}")]
    UnsupportedRule { kind: RuleKind, target: &'static str },
    #[error("invalid value for rule {kind}: {value:?} is not a non-negative integer")]
    InvalidOperand { kind: RuleKind, value: String },
}

/// Rule as written in the configuration document.
#[derive(Debug, serde::Deserialize)]
struct RuleSpec {
    name: RuleKind,
    operator: Operator,
    #[serde(default)]
    key: Option<String>,
    value: IntOrString,
}

/// A single `(kind, operator, operand)` constraint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "RuleSpec")]
pub struct Rule {
    kind: RuleKind,
    operator: Operator,
    key: Option<String>,
    operand: i64,
}

impl TryFrom<RuleSpec> for Rule {
    type Error = Error;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        let operand = match spec.value {
            IntOrString::Int(v) => i64::from(v),
            IntOrString::String(ref s) => {
                (s.trim().parse()).map_err(|_| Error::InvalidOperand {
                    kind: spec.name,
                    value: s.clone(),
                })?
            }
        };

        let mut rule = Self::new(spec.name, spec.operator, operand)?;
        rule.key = spec.key;
        Ok(rule)
    }
}

impl Rule {
    pub fn new(kind: RuleKind, operator: Operator, operand: i64) -> Result<Self, Error> {
        if !operator.is_numeric() {
            return Err(Error::UnsupportedOperator { kind, operator });
        }
        if operand < 0 {
            return Err(Error::InvalidOperand {
                kind,
                value: operand.to_string(),
            });
        }
        Ok(Self {
            kind,
            operator,
            key: None,
            operand,
        })
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> i64 {
        self.operand
    }

    /// label key, only meaningful for [`RuleKind::LabelValues`]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn check(&self, subject: i64) -> Result<(), Rejection> {
        if self.operator.evaluate(subject, self.operand)? {
            return Ok(());
        }
        Err(Rejection::Rule {
            kind: self.kind,
            operator: self.operator,
            operand: self.operand,
            actual: subject,
        })
    }
}

/// A validation target: knows which rule kinds apply to it and how to extract
/// the subject of each kind from its input.
pub trait Target {
    type Input: ?Sized;

    /// name of the configuration node, for errors
    const NAME: &'static str;
    /// rule kinds accepted on this node
    const KINDS: &'static [RuleKind];

    /// Feed every subject of `kind` found in `input` to `check`, stopping at
    /// the first error.
    fn measure<F>(input: &Self::Input, kind: RuleKind, check: F) -> Result<(), Rejection>
    where
        F: FnMut(i64) -> Result<(), Rejection>;
}

/// Rules attached to one target, all of which must hold.
pub struct RuleList<T> {
    rules: Vec<Rule>,
    target: PhantomData<fn() -> T>,
}

impl<T: Target> RuleList<T> {
    pub fn new(rules: Vec<Rule>) -> Result<Self, Error> {
        for rule in &rules {
            if !T::KINDS.contains(&rule.kind) {
                return Err(Error::UnsupportedRule {
                    kind: rule.kind,
                    target: T::NAME,
                });
            }
        }
        Ok(Self {
            rules,
            target: PhantomData,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, input: &T::Input) -> Result<(), Rejection> {
        for rule in &self.rules {
            T::measure(input, rule.kind, |subject| rule.check(subject))?;
        }
        Ok(())
    }
}

impl<T> Default for RuleList<T> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            target: PhantomData,
        }
    }
}

impl<T> Clone for RuleList<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            target: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for RuleList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}

impl<'de, T: Target> serde::Deserialize<'de> for RuleList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rules = Vec::<Rule>::deserialize(deserializer)?;
        Self::new(rules).map_err(serde::de::Error::custom)
    }
}

/// Lengths are measured as i64 like every other subject.
pub fn len_subject(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests;
