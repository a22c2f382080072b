//! Validator tree, shaped like a NetworkPolicy spec.
//!
//! Every node is optional in the configuration: a node without rules accepts
//! anything. Nodes are immutable once loaded and the first failing rule
//! anywhere in the tree is the rejection reason.

pub mod ip_block;
pub mod labels;
pub mod peer;
pub mod policy_types;
pub mod ports;
pub mod traffic;


use k8s_openapi::{
    api::networking::v1::NetworkPolicySpec, apimachinery::pkg::apis::meta::v1::LabelSelector,
};

use crate::Rejection;

pub use ip_block::{CidrValidator, ExceptValidator, IpBlockValidator};
pub use labels::{
    MatchLabelsValidator, NamespaceSelectorValidator, PodSelectorValidator, SelectorValidator,
};
pub use peer::{Peer, PeerValidator};
pub use policy_types::PolicyTypeValidator;
pub use ports::PortValidator;
pub use traffic::{EgressRuleValidator, IngressRuleValidator};

/// Root of the tree.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkPolicyValidator {
    pub pod_selector: PodSelectorValidator,
    #[serde(rename = "allowedPolicyTypes")]
    pub policy_types: PolicyTypeValidator,
    pub egress: EgressRuleValidator,
    pub ingress: IngressRuleValidator,
}

impl NetworkPolicyValidator {
    /// Selector and policy types first, as they are cheaper than walking the
    /// rule lists.
    pub fn is_valid(&self, spec: &NetworkPolicySpec) -> Result<(), Rejection> {
        // podSelector is only optional in recent API versions
        let pod_selector = Option::<&LabelSelector>::from(&spec.pod_selector);
        let no_selector = LabelSelector::default();
        (self.pod_selector).is_valid(pod_selector.unwrap_or(&no_selector))?;
        (self.policy_types).is_valid(spec.policy_types.as_deref().unwrap_or_default())?;
        (self.egress).is_valid(spec.egress.as_deref().unwrap_or_default())?;
        (self.ingress).is_valid(spec.ingress.as_deref().unwrap_or_default())
    }
}
