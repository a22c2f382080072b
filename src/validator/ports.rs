use k8s_openapi::{
    api::networking::v1::NetworkPolicyPort,
    apimachinery::pkg::util::intstr::IntOrString,
};

use crate::Rejection;
use crate::rule::{RuleKind, RuleList, Target, len_subject};

/// Port list of an ingress or egress rule.
pub enum Ports {}

impl Target for Ports {
    type Input = [NetworkPolicyPort];
    const NAME: &'static str = "ports";
    const KINDS: &'static [RuleKind] = &[RuleKind::ListSize, RuleKind::PortNumber];

    fn measure<F>(ports: &[NetworkPolicyPort], kind: RuleKind, mut check: F) -> Result<(), Rejection>
    where
        F: FnMut(i64) -> Result<(), Rejection>,
    {
        match kind {
            RuleKind::ListSize => check(len_subject(ports.len())),
            RuleKind::PortNumber => {
                for port in ports {
                    let (first, last) = port_range(port);
                    check(first)?;
                    if last != first {
                        check(last)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Bounds of the port range selected by a port entry.
///
/// A named port has no number until resolved on the pod, so it measures 0.
fn port_range(port: &NetworkPolicyPort) -> (i64, i64) {
    let first = match port.port.as_ref() {
        // unspecified = all ports
        None => return (1, 0xffff),
        Some(IntOrString::Int(port)) => i64::from(*port),
        Some(IntOrString::String(name)) => name.parse().unwrap_or(0),
    };
    (first, port.end_port.map_or(first, i64::from))
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct PortValidator {
    pub rules: RuleList<Ports>,
}

impl PortValidator {
    pub fn is_valid(&self, ports: &[NetworkPolicyPort]) -> Result<(), Rejection> {
        self.rules.check(ports)
    }
}
