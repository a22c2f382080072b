use k8s_openapi::{
    api::networking::v1::{IPBlock, NetworkPolicyPeer},
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};

use super::ip_block::IpBlockValidator;
use super::labels::{NamespaceSelectorValidator, PodSelectorValidator};
use crate::Rejection;

/// The populated side of a [`NetworkPolicyPeer`].
#[derive(Debug, Clone, Copy)]
pub enum Peer<'t> {
    Pods(&'t LabelSelector),
    Namespaces(&'t LabelSelector),
    /// pods selected in the selected namespaces; both selectors are checked,
    /// not only the pod selector
    PodsInNamespaces {
        pods: &'t LabelSelector,
        namespaces: &'t LabelSelector,
    },
    IpBlock(&'t IPBlock),
}

impl<'t> Peer<'t> {
    /// None when no field is set. An IP block excludes selectors in the API
    /// schema, so it wins if both are somehow present.
    pub fn of(peer: &'t NetworkPolicyPeer) -> Option<Self> {
        let selectors = (peer.pod_selector.as_ref(), peer.namespace_selector.as_ref());
        Some(match (peer.ip_block.as_ref(), selectors) {
            (Some(block), _) => Peer::IpBlock(block),
            (None, (Some(pods), Some(namespaces))) => Peer::PodsInNamespaces { pods, namespaces },
            (None, (Some(pods), None)) => Peer::Pods(pods),
            (None, (None, Some(namespaces))) => Peer::Namespaces(namespaces),
            (None, (None, None)) => return None,
        })
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PeerValidator {
    pub pod_selector: PodSelectorValidator,
    pub namespace_selector: NamespaceSelectorValidator,
    pub ip_block: IpBlockValidator,
}

impl PeerValidator {
    pub fn is_valid(&self, peers: &[NetworkPolicyPeer]) -> Result<(), Rejection> {
        for peer in peers.iter().filter_map(Peer::of) {
            self.check(peer)?;
        }
        Ok(())
    }

    pub fn check(&self, peer: Peer<'_>) -> Result<(), Rejection> {
        match peer {
            Peer::Pods(pods) => self.pod_selector.is_valid(pods),
            Peer::Namespaces(namespaces) => self.namespace_selector.is_valid(namespaces),
            Peer::PodsInNamespaces { pods, namespaces } => {
                self.pod_selector.is_valid(pods)?;
                self.namespace_selector.is_valid(namespaces)
            }
            Peer::IpBlock(block) => self.ip_block.is_valid(block),
        }
    }
}
