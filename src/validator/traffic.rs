use k8s_openapi::api::networking::v1::{
    NetworkPolicyEgressRule as EgressRule, NetworkPolicyIngressRule as IngressRule,
};

use super::peer::PeerValidator;
use super::ports::PortValidator;
use crate::Rejection;

/// Constraints applied to every ingress rule of a policy.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct IngressRuleValidator {
    pub ports: PortValidator,
    pub from: PeerValidator,
}

impl IngressRuleValidator {
    pub fn is_valid(&self, rules: &[IngressRule]) -> Result<(), Rejection> {
        for rule in rules {
            self.from.is_valid(rule.from.as_deref().unwrap_or_default())?;
            self.ports.is_valid(rule.ports.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Constraints applied to every egress rule of a policy.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct EgressRuleValidator {
    pub ports: PortValidator,
    pub to: PeerValidator,
}

impl EgressRuleValidator {
    pub fn is_valid(&self, rules: &[EgressRule]) -> Result<(), Rejection> {
        for rule in rules {
            self.to.is_valid(rule.to.as_deref().unwrap_or_default())?;
            self.ports.is_valid(rule.ports.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}
