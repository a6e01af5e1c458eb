//! IPFS: go-ipfs peers and ipfs-cluster-service cluster peers.

pub mod cluster_peer;
pub mod cluster_service;
pub mod go_ipfs;
pub mod peer;

pub use cluster_peer::{ClusterConsensus, ClusterPeerClient, ClusterPeerSpec};
pub use peer::{PeerClient, PeerSpec, Profile, Routing};

use crate::shared::Verbosity as V;
use crate::spec::Feature::*;
use crate::spec::Registry;

pub static PEER_CAPABILITIES: Registry<PeerClient> = Registry::new(&[(
    PeerClient::GoIpfs,
    &[
        Logging(V::Debug),
        Logging(V::Info),
        Logging(V::Warn),
        Logging(V::Error),
        Logging(V::Panic),
        Logging(V::Fatal),
    ],
)]);

pub static CLUSTER_PEER_CAPABILITIES: Registry<ClusterPeerClient> = Registry::new(&[(
    ClusterPeerClient::IpfsClusterService,
    &[
        Logging(V::Debug),
        Logging(V::Info),
        Logging(V::Warn),
        Logging(V::Error),
        Logging(V::Panic),
        Logging(V::Fatal),
    ],
)]);
