//! go-ipfs daemon compiler.
//!
//! Most of the node configuration travels through the environment: the repo
//! init step and `ipfs config` read the `IPFS_*` variables before the daemon
//! starts.

use crate::compile::{ClientCompiler, Compile, CompiledNode, Env, EnvValue};
use crate::ipfs::peer::{PeerClient, PeerSpec, Profile};
use crate::shared::path_data;
use crate::spec::{NodeKind, Object};
use tracing::debug;

pub const IMAGE_ENV: &str = "GO_IPFS_IMAGE";
pub const DEFAULT_IMAGE: &str = "ipfs/go-ipfs:v0.15.0";
pub const HOME_DIR: &str = "/home/ipfs";

pub const BINARY: &str = "ipfs";
pub const DAEMON: &str = "daemon";
pub const ROUTING: &str = "--routing";
pub const SWARM_KEY_KEY: &str = "secret";

pub const ENV_IPFS_PATH: &str = "IPFS_PATH";
pub const ENV_API_HOST: &str = "IPFS_API_HOST";
pub const ENV_API_PORT: &str = "IPFS_API_PORT";
pub const ENV_GATEWAY_HOST: &str = "IPFS_GATEWAY_HOST";
pub const ENV_GATEWAY_PORT: &str = "IPFS_GATEWAY_PORT";
pub const ENV_INIT_PROFILES: &str = "IPFS_INIT_PROFILES";
pub const ENV_PROFILES: &str = "IPFS_PROFILES";
pub const ENV_SWARM_KEY: &str = "IPFS_SWARM_KEY";
pub const ENV_LOGGING: &str = "GOLOG_LOG_LEVEL";

fn joined(profiles: &[Profile]) -> String {
    let names: Vec<&str> = profiles.iter().map(AsRef::as_ref).collect();
    names.join(",")
}

pub struct GoIpfsClient<'a> {
    pub peer: &'a PeerSpec,
}

impl ClientCompiler for GoIpfsClient<'_> {
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
        let mut args = vec![DAEMON.to_string()];
        if let Some(routing) = self.peer.routing {
            args.extend([ROUTING.to_string(), routing.to_string()]);
        }
        args
    }

    fn env(&self) -> Env {
        let peer = self.peer;
        let mut env = Env::new();

        env.insert(ENV_IPFS_PATH.into(), EnvValue::literal(path_data(HOME_DIR)));

        if let Some(host) = &peer.api_host {
            env.insert(ENV_API_HOST.into(), EnvValue::literal(host));
        }
        if let Some(port) = peer.api_port {
            env.insert(ENV_API_PORT.into(), EnvValue::literal(port.to_string()));
        }
        if let Some(host) = &peer.gateway_host {
            env.insert(ENV_GATEWAY_HOST.into(), EnvValue::literal(host));
        }
        if let Some(port) = peer.gateway_port {
            env.insert(ENV_GATEWAY_PORT.into(), EnvValue::literal(port.to_string()));
        }

        if !peer.init_profiles.is_empty() {
            env.insert(
                ENV_INIT_PROFILES.into(),
                EnvValue::literal(joined(&peer.init_profiles)),
            );
        }
        if !peer.profiles.is_empty() {
            env.insert(ENV_PROFILES.into(), EnvValue::literal(joined(&peer.profiles)));
        }

        if let Some(secret) = &peer.swarm_key_secret_name {
            env.insert(ENV_SWARM_KEY.into(), EnvValue::secret(secret, SWARM_KEY_KEY));
        }

        if let Some(level) = peer.logging {
            env.insert(ENV_LOGGING.into(), EnvValue::literal(level.as_ref()));
        }

        env
    }

    fn home_dir(&self) -> &'static str {
        HOME_DIR
    }
}

pub fn new_peer_client(peer: &PeerSpec) -> Box<dyn ClientCompiler + '_> {
    debug!(client = %peer.client, "selected ipfs peer compiler");
    match peer.client {
        PeerClient::GoIpfs => Box::new(GoIpfsClient { peer }),
    }
}

impl Compile for Object<PeerSpec> {
    fn compile(&self) -> Vec<CompiledNode> {
        let command = new_peer_client(&self.spec).compile();
        vec![CompiledNode::new(
            &self.name,
            NodeKind::Peer,
            self.spec.client.as_ref(),
            "peer",
            command,
            self.spec.resources.clone(),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;

    #[test]
    fn daemon_with_private_swarm() {
        let mut peer = PeerSpec {
            init_profiles: vec![Profile::Server, Profile::Flatfs],
            profiles: vec![Profile::Lowpower],
            swarm_key_secret_name: Some("swarm-key".into()),
            ..Default::default()
        };
        peer.apply_defaults(&ImageConfig::new());

        let compiled = GoIpfsClient { peer: &peer }.compile();
        assert_eq!(compiled.image, DEFAULT_IMAGE);
        assert_eq!(compiled.command, vec!["ipfs"]);
        assert_eq!(compiled.args, vec!["daemon", "--routing", "dht"]);
        assert_eq!(compiled.home_dir, HOME_DIR);

        let env = &compiled.env;
        assert_eq!(env[ENV_IPFS_PATH], EnvValue::literal("/home/ipfs/kotal-data"));
        assert_eq!(env[ENV_API_HOST], EnvValue::literal("0.0.0.0"));
        assert_eq!(env[ENV_API_PORT], EnvValue::literal("5001"));
        assert_eq!(env[ENV_GATEWAY_PORT], EnvValue::literal("8080"));
        assert_eq!(env[ENV_INIT_PROFILES], EnvValue::literal("server,flatfs"));
        assert_eq!(env[ENV_PROFILES], EnvValue::literal("lowpower"));
        assert_eq!(env[ENV_SWARM_KEY], EnvValue::secret("swarm-key", "secret"));
        assert_eq!(env[ENV_LOGGING], EnvValue::literal("info"));
    }

    #[test]
    fn compiled_peer_labels() {
        let mut spec = PeerSpec::default();
        spec.apply_defaults(&ImageConfig::new());
        let nodes = Object {
            name: "ipfs-peer".to_string(),
            spec,
        }
        .compile();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].labels[crate::compile::LABEL_CLIENT], "go-ipfs");
        assert_eq!(nodes[0].labels[crate::compile::LABEL_PROTOCOL], "ipfs");
        assert!(!nodes[0].command.env.contains_key(ENV_SWARM_KEY));
    }
}
