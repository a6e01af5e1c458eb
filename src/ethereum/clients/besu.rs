//! Hyperledger Besu.

use crate::compile::{ClientCompiler, Env};
use crate::ethereum::spec::{Api, NetworkConfig, NodeSpec};
use crate::shared::{path_config, path_data, path_secrets};

pub const IMAGE_ENV: &str = "BESU_IMAGE";
pub const DEFAULT_IMAGE: &str = "hyperledger/besu:22.7.0";
pub const HOME_DIR: &str = "/opt/besu";

pub const DATA_PATH: &str = "--data-path";
pub const GENESIS_FILE: &str = "--genesis-file";
pub const NETWORK_ID: &str = "--network-id";
pub const NETWORK: &str = "--network";
pub const NODE_PRIVATE_KEY: &str = "--node-private-key-file";
pub const BOOTNODES: &str = "--bootnodes";
pub const P2P_PORT: &str = "--p2p-port";
pub const SYNC_MODE: &str = "--sync-mode";
pub const MINER_ENABLED: &str = "--miner-enabled";
pub const MINER_COINBASE: &str = "--miner-coinbase";
pub const RPC_HTTP_ENABLED: &str = "--rpc-http-enabled";
pub const RPC_HTTP_HOST: &str = "--rpc-http-host";
pub const RPC_HTTP_PORT: &str = "--rpc-http-port";
pub const RPC_HTTP_APIS: &str = "--rpc-http-api";
pub const RPC_HTTP_CORS_ORIGINS: &str = "--rpc-http-cors-origins";
pub const RPC_WS_ENABLED: &str = "--rpc-ws-enabled";
pub const RPC_WS_HOST: &str = "--rpc-ws-host";
pub const RPC_WS_PORT: &str = "--rpc-ws-port";
pub const RPC_WS_APIS: &str = "--rpc-ws-api";
pub const GRAPHQL_HTTP_ENABLED: &str = "--graphql-http-enabled";
pub const GRAPHQL_HTTP_HOST: &str = "--graphql-http-host";
pub const GRAPHQL_HTTP_PORT: &str = "--graphql-http-port";
pub const GRAPHQL_HTTP_CORS_ORIGINS: &str = "--graphql-http-cors-origins";
pub const HOST_ALLOWLIST: &str = "--host-allowlist";
pub const LOGGING: &str = "--logging";

pub struct BesuClient<'a> {
    pub network: &'a NetworkConfig,
    pub node: &'a NodeSpec,
}

fn apis(apis: &[Api]) -> String {
    apis.iter()
        .map(|api| api.as_ref().to_uppercase())
        .collect::<Vec<_>>()
        .join(",")
}

impl ClientCompiler for BesuClient<'_> {
    fn image(&self) -> String {
        self.node.image.clone().unwrap_or_else(|| DEFAULT_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        Vec::new()
    }

    fn args(&self) -> Vec<String> {
        let node = self.node;
        let mut args = vec![DATA_PATH.to_string(), path_data(HOME_DIR)];

        if let Some(join) = self.network.join {
            args.extend([NETWORK.to_string(), join.to_string()]);
        } else {
            args.extend([
                GENESIS_FILE.to_string(),
                format!("{}/genesis.json", path_config(HOME_DIR)),
            ]);
            if let Some(id) = self.network.id {
                args.extend([NETWORK_ID.to_string(), id.to_string()]);
            }
        }

        if node.nodekey_secret_name.is_some() {
            args.extend([
                NODE_PRIVATE_KEY.to_string(),
                format!("{}/nodekey", path_secrets(HOME_DIR)),
            ]);
        }

        if !node.bootnodes.is_empty() {
            args.extend([BOOTNODES.to_string(), node.bootnodes.join(",")]);
        }

        if let Some(port) = node.p2p_port {
            args.extend([P2P_PORT.to_string(), port.to_string()]);
        }

        if let Some(mode) = node.sync_mode {
            args.extend([SYNC_MODE.to_string(), mode.as_ref().to_uppercase()]);
        }

        if node.miner {
            args.push(MINER_ENABLED.to_string());
            if let Some(coinbase) = &node.coinbase {
                args.extend([MINER_COINBASE.to_string(), coinbase.clone()]);
            }
        }

        if node.rpc {
            args.push(RPC_HTTP_ENABLED.to_string());
            if let Some(host) = &node.rpc_host {
                args.extend([RPC_HTTP_HOST.to_string(), host.clone()]);
            }
            if let Some(port) = node.rpc_port {
                args.extend([RPC_HTTP_PORT.to_string(), port.to_string()]);
            }
            if !node.rpc_apis.is_empty() {
                args.extend([RPC_HTTP_APIS.to_string(), apis(&node.rpc_apis)]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([RPC_HTTP_CORS_ORIGINS.to_string(), node.cors_domains.join(",")]);
            }
        }

        if node.ws {
            args.push(RPC_WS_ENABLED.to_string());
            if let Some(host) = &node.ws_host {
                args.extend([RPC_WS_HOST.to_string(), host.clone()]);
            }
            if let Some(port) = node.ws_port {
                args.extend([RPC_WS_PORT.to_string(), port.to_string()]);
            }
            if !node.ws_apis.is_empty() {
                args.extend([RPC_WS_APIS.to_string(), apis(&node.ws_apis)]);
            }
        }

        if node.graphql {
            args.push(GRAPHQL_HTTP_ENABLED.to_string());
            if let Some(host) = &node.graphql_host {
                args.extend([GRAPHQL_HTTP_HOST.to_string(), host.clone()]);
            }
            if let Some(port) = node.graphql_port {
                args.extend([GRAPHQL_HTTP_PORT.to_string(), port.to_string()]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([
                    GRAPHQL_HTTP_CORS_ORIGINS.to_string(),
                    node.cors_domains.join(","),
                ]);
            }
        }

        if !node.hosts.is_empty() {
            args.extend([HOST_ALLOWLIST.to_string(), node.hosts.join(",")]);
        }

        if let Some(level) = node.logging {
            args.extend([LOGGING.to_string(), level.upper()]);
        }

        args
    }

    fn env(&self) -> Env {
        Env::new()
    }

    fn home_dir(&self) -> &'static str {
        HOME_DIR
    }
}
