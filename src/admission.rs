use k8s_openapi::api::networking::v1::{NetworkPolicy, NetworkPolicySpec};
use regex::Regex;

use crate::Rejection;
use crate::validator::NetworkPolicyValidator;

/// Entry point of the engine: the validator trees and the namespaces they
/// apply to.
#[derive(Debug, Clone, Default)]
pub struct AdmissionValidator {
    scopes: Vec<Scope>,
}

#[derive(Debug, Clone)]
struct Scope {
    /// None matches every namespace
    namespace: Option<Regex>,
    validator: NetworkPolicyValidator,
}

impl Scope {
    fn matches(&self, namespace: &str) -> bool {
        self.namespace.as_ref().is_none_or(|re| re.is_match(namespace))
    }
}

impl AdmissionValidator {
    /// A single tree applied to every namespace.
    pub fn new(validator: NetworkPolicyValidator) -> Self {
        Self {
            scopes: vec![Scope {
                namespace: None,
                validator,
            }],
        }
    }

    /// Add a tree applied to namespaces matching `pattern` (unanchored).
    pub fn with_scope(
        mut self,
        pattern: &str,
        validator: NetworkPolicyValidator,
    ) -> Result<Self, regex::Error> {
        self.scopes.push(Scope {
            namespace: Some(Regex::new(pattern)?),
            validator,
        });
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Check the policy against every tree whose scope matches its namespace.
    /// A policy in no scope is valid.
    pub fn is_valid(&self, policy: &NetworkPolicy) -> Result<(), Rejection> {
        let namespace = policy.metadata.namespace.as_deref().unwrap_or_default();

        let no_spec = NetworkPolicySpec::default();
        let spec = policy.spec.as_ref().unwrap_or(&no_spec);

        for scope in self.scopes.iter().filter(|s| s.matches(namespace)) {
            scope.validator.is_valid(spec)?;
        }
        Ok(())
    }
}
