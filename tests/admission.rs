use k8s_openapi::api::networking::v1::NetworkPolicy;

use netpol_admission::{AdmissionValidator, Rejection, config};

const CONFIG: &str = include_str!("../config.yaml");

fn validator() -> AdmissionValidator {
    config::from_slice(CONFIG.as_bytes()).unwrap()
}

fn policy(namespace: &str, spec: &str) -> NetworkPolicy {
    let manifest = format!(
        "apiVersion: networking.k8s.io/v1
kind: NetworkPolicy
metadata:
  name: test-network-policy
  namespace: {namespace}
spec:
{spec}"
    );
    serde_yaml::from_str(&manifest).unwrap()
}

fn reason(r: Result<(), Rejection>) -> String {
    r.unwrap_err().to_string()
}

#[test]
fn sample_config_loads() {
    assert!(!validator().is_empty());
}

#[test]
fn system_namespace_policy_allowed() {
    let p = policy(
        "kube-system",
        r#"
  podSelector:
    matchLabels:
      role: db
  policyTypes: [Ingress]
  ingress:
  - from:
    - ipBlock:
        cidr: 172.17.0.0/24
        except: [172.17.0.0/28]
    ports:
    - protocol: TCP
      port: 6379
"#,
    );
    assert_eq!(validator().is_valid(&p), Ok(()));
}

#[test]
fn system_namespace_wide_cidr_denied() {
    let p = policy(
        "kube-system",
        r#"
  podSelector:
    matchLabels:
      role: db
  ingress:
  - from:
    - ipBlock:
        cidr: 172.16.0.0/16
    ports:
    - port: 6379
"#,
    );
    assert_eq!(
        reason(validator().is_valid(&p)),
        "InvalidMaskSize: mask size must be Gt 20, got 16"
    );
}

#[test]
fn system_namespace_egress_denied() {
    let p = policy(
        "kube-public",
        r#"
  podSelector:
    matchLabels:
      role: db
  policyTypes: [Ingress, Egress]
"#,
    );
    assert_eq!(
        reason(validator().is_valid(&p)),
        "PolicyType Egress is not allowed for this namespace"
    );
}

#[test]
fn system_namespace_privileged_port_denied() {
    let p = policy(
        "kube-system",
        r#"
  podSelector:
    matchLabels:
      role: dns
  ingress:
  - ports:
    - protocol: UDP
      port: 53
"#,
    );
    assert_eq!(
        reason(validator().is_valid(&p)),
        "InvalidPortNumber: port number must be Ge 1024, got 53"
    );
}

#[test]
fn catch_all_scope_applies_everywhere() {
    let spec = r#"
  podSelector: {}
  egress:
  - to:
    - ipBlock:
        cidr: 0.0.0.0/0
"#;

    // only the catch-all tree applies outside kube-*
    assert_eq!(
        reason(validator().is_valid(&policy("default", spec))),
        "InvalidMaskSize: mask size must be Ge 8, got 0"
    );

    let allowed = r#"
  podSelector: {}
  egress:
  - to:
    - ipBlock:
        cidr: 10.0.0.0/8
"#;
    assert_eq!(validator().is_valid(&policy("default", allowed)), Ok(()));
}
