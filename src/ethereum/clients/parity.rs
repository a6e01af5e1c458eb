//! OpenEthereum (formerly Parity).

use crate::compile::{ClientCompiler, Env, EnvValue};
use crate::ethereum::spec::{Api, NetworkConfig, NodeSpec, PublicNetwork, SyncMode};
use crate::shared::{DEFAULT_HOST, path_config, path_data, path_secrets};

pub const IMAGE_ENV: &str = "PARITY_IMAGE";
pub const DEFAULT_IMAGE: &str = "openethereum/openethereum:v3.3.5";
pub const HOME_DIR: &str = "/home/openethereum";

/// Env var carrying the node key; expanded into the args by the backend.
pub const ENV_NODE_KEY: &str = "NODE_KEY";

pub const BASE_PATH: &str = "--base-path";
pub const CHAIN: &str = "--chain";
pub const NETWORK_ID: &str = "--network-id";
pub const NODE_KEY: &str = "--node-key";
pub const BOOTNODES: &str = "--bootnodes";
pub const P2P_PORT: &str = "--port";
pub const NO_WARP: &str = "--no-warp";
pub const UNLOCK: &str = "--unlock";
pub const PASSWORD: &str = "--password";
pub const MINER_COINBASE: &str = "--author";
pub const RPC_HTTP_INTERFACE: &str = "--jsonrpc-interface";
pub const RPC_HTTP_PORT: &str = "--jsonrpc-port";
pub const RPC_HTTP_APIS: &str = "--jsonrpc-apis";
pub const RPC_HTTP_CORS: &str = "--jsonrpc-cors";
pub const RPC_HTTP_HOSTS: &str = "--jsonrpc-hosts";
pub const NO_RPC_HTTP: &str = "--no-jsonrpc";
pub const WS_INTERFACE: &str = "--ws-interface";
pub const WS_PORT: &str = "--ws-port";
pub const WS_APIS: &str = "--ws-apis";
pub const WS_ORIGINS: &str = "--ws-origins";
pub const WS_HOSTS: &str = "--ws-hosts";
pub const NO_WS: &str = "--no-ws";
pub const LOGGING: &str = "--logging";

pub struct ParityClient<'a> {
    pub network: &'a NetworkConfig,
    pub node: &'a NodeSpec,
}

fn apis(apis: &[Api]) -> String {
    apis.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(",")
}

/// OpenEthereum names the wildcard interface "all".
fn interface(host: &str) -> String {
    if host == DEFAULT_HOST {
        "all".to_string()
    } else {
        host.to_string()
    }
}

fn chain(join: PublicNetwork) -> String {
    match join {
        PublicNetwork::Mainnet => "foundation".to_string(),
        other => other.to_string(),
    }
}

impl ClientCompiler for ParityClient<'_> {
    fn image(&self) -> String {
        self.node.image.clone().unwrap_or_else(|| DEFAULT_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        Vec::new()
    }

    fn args(&self) -> Vec<String> {
        let node = self.node;
        let mut args = vec![BASE_PATH.to_string(), path_data(HOME_DIR)];

        match self.network.join {
            Some(join) => args.extend([CHAIN.to_string(), chain(join)]),
            None => {
                args.extend([
                    CHAIN.to_string(),
                    format!("{}/genesis.json", path_config(HOME_DIR)),
                ]);
                if let Some(id) = self.network.id {
                    args.extend([NETWORK_ID.to_string(), id.to_string()]);
                }
            }
        }

        if node.nodekey_secret_name.is_some() {
            args.extend([NODE_KEY.to_string(), format!("$({})", ENV_NODE_KEY)]);
        }

        if !node.bootnodes.is_empty() {
            args.extend([BOOTNODES.to_string(), node.bootnodes.join(",")]);
        }

        if let Some(port) = node.p2p_port {
            args.extend([P2P_PORT.to_string(), port.to_string()]);
        }

        if node.sync_mode == Some(SyncMode::Full) {
            args.push(NO_WARP.to_string());
        }

        if let (Some(coinbase), Some(_)) = (&node.coinbase, &node.import) {
            args.extend([
                MINER_COINBASE.to_string(),
                coinbase.clone(),
                UNLOCK.to_string(),
                coinbase.clone(),
                PASSWORD.to_string(),
                format!("{}/account.password", path_secrets(HOME_DIR)),
            ]);
        }

        if node.rpc {
            if let Some(host) = &node.rpc_host {
                args.extend([RPC_HTTP_INTERFACE.to_string(), interface(host)]);
            }
            if let Some(port) = node.rpc_port {
                args.extend([RPC_HTTP_PORT.to_string(), port.to_string()]);
            }
            if !node.rpc_apis.is_empty() {
                args.extend([RPC_HTTP_APIS.to_string(), apis(&node.rpc_apis)]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([RPC_HTTP_CORS.to_string(), node.cors_domains.join(",")]);
            }
            if !node.hosts.is_empty() {
                args.extend([RPC_HTTP_HOSTS.to_string(), node.hosts.join(",")]);
            }
        } else {
            args.push(NO_RPC_HTTP.to_string());
        }

        if node.ws {
            if let Some(host) = &node.ws_host {
                args.extend([WS_INTERFACE.to_string(), interface(host)]);
            }
            if let Some(port) = node.ws_port {
                args.extend([WS_PORT.to_string(), port.to_string()]);
            }
            if !node.ws_apis.is_empty() {
                args.extend([WS_APIS.to_string(), apis(&node.ws_apis)]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([WS_ORIGINS.to_string(), node.cors_domains.join(",")]);
            }
            if !node.hosts.is_empty() {
                args.extend([WS_HOSTS.to_string(), node.hosts.join(",")]);
            }
        } else {
            args.push(NO_WS.to_string());
        }

        if let Some(level) = node.logging {
            args.extend([LOGGING.to_string(), level.to_string()]);
        }

        args
    }

    fn env(&self) -> Env {
        let mut env = Env::new();
        if let Some(secret) = &self.node.nodekey_secret_name {
            env.insert(ENV_NODE_KEY.to_string(), EnvValue::secret(secret, "key"));
        }
        env
    }

    fn home_dir(&self) -> &'static str {
        HOME_DIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;
    use crate::ethereum::spec::Client;
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;

    #[test]
    fn mainnet_is_foundation_chain() {
        let network = NetworkConfig {
            join: Some(PublicNetwork::Mainnet),
            ..Default::default()
        };
        let mut node = NodeSpec {
            sync_mode: Some(SyncMode::Full),
            ..NodeSpec::new("node-1", Client::Parity)
        };
        node.apply_defaults(&ImageConfig::new());
        let args = ParityClient {
            network: &network,
            node: &node,
        }
        .args();
        assert_eq!(
            args,
            vec![
                "--base-path",
                "/home/openethereum/kotal-data",
                "--chain",
                "foundation",
                "--port",
                "30303",
                "--no-warp",
                "--no-jsonrpc",
                "--no-ws",
                "--logging",
                "info",
            ]
        );
    }

    #[test]
    fn node_key_travels_as_secret_reference() {
        let network = NetworkConfig {
            join: Some(PublicNetwork::Kotti),
            ..Default::default()
        };
        let node = NodeSpec {
            bootnode: true,
            nodekey_secret_name: Some("parity-nodekey".into()),
            rpc: true,
            rpc_host: Some("0.0.0.0".into()),
            rpc_port: Some(8545),
            ..NodeSpec::new("node-1", Client::Parity)
        };
        let compiled = ParityClient {
            network: &network,
            node: &node,
        }
        .compile();

        assert_eq!(
            compiled.env.get(ENV_NODE_KEY),
            Some(&EnvValue::secret("parity-nodekey", "key"))
        );
        let key_at = compiled.args.iter().position(|a| a == "--node-key").unwrap();
        assert_eq!(compiled.args[key_at + 1], "$(NODE_KEY)");
        let iface_at = compiled
            .args
            .iter()
            .position(|a| a == "--jsonrpc-interface")
            .unwrap();
        assert_eq!(compiled.args[iface_at + 1], "all");
        assert_eq!(compiled.home_dir, HOME_DIR);
    }
}
