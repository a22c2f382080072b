use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap as Map;

use crate::Rejection;
use crate::rule::{RuleKind, RuleList, Target, len_subject};

/// `matchLabels` of a selector; absent labels count as none.
pub enum Labels {}

impl Target for Labels {
    type Input = Option<Map<String, String>>;
    const NAME: &'static str = "matchLabels";
    const KINDS: &'static [RuleKind] = &[RuleKind::LabelCount, RuleKind::LabelValues];

    fn measure<F>(labels: &Self::Input, kind: RuleKind, mut check: F) -> Result<(), Rejection>
    where
        F: FnMut(i64) -> Result<(), Rejection>,
    {
        match kind {
            RuleKind::LabelCount => check(len_subject(labels.as_ref().map_or(0, Map::len))),
            // LabelValues: no operator has value semantics yet
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct MatchLabelsValidator {
    pub rules: RuleList<Labels>,
}

impl MatchLabelsValidator {
    pub fn is_valid(&self, labels: &Option<Map<String, String>>) -> Result<(), Rejection> {
        self.rules.check(labels)
    }
}

/// Label selector constraints. Pod and namespace selectors only differ by
/// where they appear in the tree.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorValidator {
    pub match_labels: MatchLabelsValidator,
}

pub type PodSelectorValidator = SelectorValidator;
pub type NamespaceSelectorValidator = SelectorValidator;

impl SelectorValidator {
    pub fn is_valid(&self, selector: &LabelSelector) -> Result<(), Rejection> {
        self.match_labels.is_valid(&selector.match_labels)
    }
}
