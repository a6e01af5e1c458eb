//! ipfs-cluster-service compiler.

use crate::compile::{ClientCompiler, Compile, CompiledNode, Env, EnvValue};
use crate::ipfs::cluster_peer::{ClusterPeerClient, ClusterPeerSpec};
use crate::shared::path_data;
use crate::spec::{NodeKind, Object};
use tracing::debug;

pub const IMAGE_ENV: &str = "IPFS_CLUSTER_IMAGE";
pub const DEFAULT_IMAGE: &str = "ipfs/ipfs-cluster:v1.0.2";
pub const HOME_DIR: &str = "/home/ipfs-cluster";

pub const BINARY: &str = "ipfs-cluster-service";
pub const DAEMON: &str = "daemon";
pub const BOOTSTRAP: &str = "--bootstrap";
pub const LOGLEVEL: &str = "--loglevel";

pub const CLUSTER_SECRET_KEY: &str = "secret";
pub const PRIVATEKEY_KEY: &str = "key";

pub const ENV_CLUSTER_PATH: &str = "IPFS_CLUSTER_PATH";
pub const ENV_CONSENSUS: &str = "IPFS_CLUSTER_CONSENSUS";
pub const ENV_PEER_ENDPOINT: &str = "IPFS_CLUSTER_PEER_ENDPOINT";
pub const ENV_TRUSTED_PEERS: &str = "IPFS_CLUSTER_TRUSTED_PEERS";
pub const ENV_CLUSTER_SECRET: &str = "CLUSTER_SECRET";
pub const ENV_ID: &str = "CLUSTER_ID";
pub const ENV_PRIVATEKEY: &str = "CLUSTER_PRIVATEKEY";
pub const ENV_PEER_NAME: &str = "CLUSTER_PEERNAME";

/// The peer name is part of the cluster configuration, so the compiler needs it.
pub struct ClusterServiceClient<'a> {
    pub name: &'a str,
    pub peer: &'a ClusterPeerSpec,
}

impl ClientCompiler for ClusterServiceClient<'_> {
    fn image(&self) -> String {
        self.peer
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        vec![BINARY.to_string()]
    }

    fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Global flag, goes before the subcommand.
        if let Some(level) = self.peer.logging {
            args.extend([LOGLEVEL.to_string(), level.to_string()]);
        }

        args.push(DAEMON.to_string());

        if !self.peer.bootstrap_peers.is_empty() {
            args.extend([BOOTSTRAP.to_string(), self.peer.bootstrap_peers.join(",")]);
        }

        args
    }

    fn env(&self) -> Env {
        let peer = self.peer;
        let mut env = Env::from([
            (
                ENV_CLUSTER_PATH.to_string(),
                EnvValue::literal(path_data(HOME_DIR)),
            ),
            (ENV_PEER_NAME.to_string(), EnvValue::literal(self.name)),
            (
                ENV_CONSENSUS.to_string(),
                EnvValue::literal(peer.consensus.as_ref()),
            ),
            (
                ENV_PEER_ENDPOINT.to_string(),
                EnvValue::literal(&peer.peer_endpoint),
            ),
            (
                ENV_CLUSTER_SECRET.to_string(),
                EnvValue::secret(&peer.cluster_secret_name, CLUSTER_SECRET_KEY),
            ),
            (
                ENV_TRUSTED_PEERS.to_string(),
                EnvValue::literal(peer.trusted_peers.join(",")),
            ),
        ]);

        if let (Some(id), Some(key)) = (&peer.id, &peer.privatekey_secret_name) {
            env.insert(ENV_ID.to_string(), EnvValue::literal(id));
            env.insert(ENV_PRIVATEKEY.to_string(), EnvValue::secret(key, PRIVATEKEY_KEY));
        }

        env
    }

    fn home_dir(&self) -> &'static str {
        HOME_DIR
    }
}

pub fn new_cluster_peer_client<'a>(
    name: &'a str,
    peer: &'a ClusterPeerSpec,
) -> Box<dyn ClientCompiler + 'a> {
    debug!(client = %peer.client, name, "selected ipfs cluster peer compiler");
    match peer.client {
        ClusterPeerClient::IpfsClusterService => Box::new(ClusterServiceClient { name, peer }),
    }
}

impl Compile for Object<ClusterPeerSpec> {
    fn compile(&self) -> Vec<CompiledNode> {
        let command = new_cluster_peer_client(&self.name, &self.spec).compile();
        vec![CompiledNode::new(
            &self.name,
            NodeKind::ClusterPeer,
            self.spec.client.as_ref(),
            "cluster-peer",
            command,
            self.spec.resources.clone(),
        )]
    }
}
