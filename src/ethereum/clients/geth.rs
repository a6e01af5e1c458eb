//! Go Ethereum.

use crate::compile::{ClientCompiler, Env};
use crate::ethereum::spec::{Api, NetworkConfig, NodeSpec, PublicNetwork};
use crate::shared::{Verbosity, path_data, path_secrets};

pub const IMAGE_ENV: &str = "GETH_IMAGE";
pub const DEFAULT_IMAGE: &str = "ethereum/client-go:v1.10.23";
pub const HOME_DIR: &str = "/home/ethereum";

pub const DATA_DIR: &str = "--datadir";
pub const NETWORK_ID: &str = "--networkid";
pub const NODE_KEY: &str = "--nodekey";
pub const BOOTNODES: &str = "--bootnodes";
pub const P2P_PORT: &str = "--port";
pub const SYNC_MODE: &str = "--syncmode";
pub const MINER_ENABLED: &str = "--mine";
pub const MINER_COINBASE: &str = "--miner.etherbase";
pub const UNLOCK: &str = "--unlock";
pub const PASSWORD: &str = "--password";
pub const RPC_HTTP_ENABLED: &str = "--http";
pub const RPC_HTTP_HOST: &str = "--http.addr";
pub const RPC_HTTP_PORT: &str = "--http.port";
pub const RPC_HTTP_APIS: &str = "--http.api";
pub const RPC_HTTP_CORS_DOMAIN: &str = "--http.corsdomain";
pub const RPC_HTTP_VIRTUAL_HOSTS: &str = "--http.vhosts";
pub const WS_ENABLED: &str = "--ws";
pub const WS_HOST: &str = "--ws.addr";
pub const WS_PORT: &str = "--ws.port";
pub const WS_APIS: &str = "--ws.api";
pub const WS_ORIGINS: &str = "--ws.origins";
pub const GRAPHQL_ENABLED: &str = "--graphql";
pub const GRAPHQL_CORS_DOMAIN: &str = "--graphql.corsdomain";
pub const GRAPHQL_VIRTUAL_HOSTS: &str = "--graphql.vhosts";
pub const VERBOSITY: &str = "--verbosity";

pub struct GethClient<'a> {
    pub network: &'a NetworkConfig,
    pub node: &'a NodeSpec,
}

fn apis(apis: &[Api]) -> String {
    apis.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(",")
}

/// Geth takes a numeric verbosity.
fn verbosity(level: Verbosity) -> &'static str {
    match level {
        Verbosity::Off => "0",
        Verbosity::Error => "1",
        Verbosity::Warn => "2",
        Verbosity::Debug => "4",
        Verbosity::All => "5",
        _ => "3",
    }
}

impl ClientCompiler for GethClient<'_> {
    fn image(&self) -> String {
        self.node.image.clone().unwrap_or_else(|| DEFAULT_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        Vec::new()
    }

    fn args(&self) -> Vec<String> {
        let node = self.node;
        let mut args = vec![DATA_DIR.to_string(), path_data(HOME_DIR)];

        match self.network.join {
            // Mainnet is geth's default chain.
            Some(PublicNetwork::Mainnet) => {}
            Some(join) => args.push(format!("--{}", join)),
            None => {
                if let Some(id) = self.network.id {
                    args.extend([NETWORK_ID.to_string(), id.to_string()]);
                }
            }
        }

        if node.nodekey_secret_name.is_some() {
            args.extend([NODE_KEY.to_string(), format!("{}/nodekey", path_secrets(HOME_DIR))]);
        }

        if !node.bootnodes.is_empty() {
            args.extend([BOOTNODES.to_string(), node.bootnodes.join(",")]);
        }

        if let Some(port) = node.p2p_port {
            args.extend([P2P_PORT.to_string(), port.to_string()]);
        }

        if let Some(mode) = node.sync_mode {
            args.extend([SYNC_MODE.to_string(), mode.to_string()]);
        }

        if node.miner {
            args.push(MINER_ENABLED.to_string());
            if let Some(coinbase) = &node.coinbase {
                args.extend([MINER_COINBASE.to_string(), coinbase.clone()]);
                if node.import.is_some() {
                    args.extend([
                        UNLOCK.to_string(),
                        coinbase.clone(),
                        PASSWORD.to_string(),
                        format!("{}/account.password", path_secrets(HOME_DIR)),
                    ]);
                }
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
                args.extend([RPC_HTTP_CORS_DOMAIN.to_string(), node.cors_domains.join(",")]);
            }
            if !node.hosts.is_empty() {
                args.extend([RPC_HTTP_VIRTUAL_HOSTS.to_string(), node.hosts.join(",")]);
            }
        }

        if node.ws {
            args.push(WS_ENABLED.to_string());
            if let Some(host) = &node.ws_host {
                args.extend([WS_HOST.to_string(), host.clone()]);
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
        }

        // Served over the HTTP RPC listener.
        if node.graphql {
            args.push(GRAPHQL_ENABLED.to_string());
            if !node.cors_domains.is_empty() {
                args.extend([GRAPHQL_CORS_DOMAIN.to_string(), node.cors_domains.join(",")]);
            }
            if !node.hosts.is_empty() {
                args.extend([GRAPHQL_VIRTUAL_HOSTS.to_string(), node.hosts.join(",")]);
            }
        }

        if let Some(level) = node.logging {
            args.extend([VERBOSITY.to_string(), verbosity(level).to_string()]);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;
    use crate::ethereum::genesis::Genesis;
    use crate::ethereum::spec::{Client, Consensus, ImportedAccount};
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;

    fn compile(network: &NetworkConfig, node: &NodeSpec) -> Vec<String> {
        GethClient { network, node }.args()
    }

    #[test]
    fn joined_network_flag() {
        let mut node = NodeSpec::new("node-1", Client::Geth);
        node.apply_defaults(&ImageConfig::new());

        let goerli = NetworkConfig {
            join: Some(PublicNetwork::Goerli),
            ..Default::default()
        };
        assert_eq!(
            compile(&goerli, &node),
            vec![
                "--datadir",
                "/home/ethereum/kotal-data",
                "--goerli",
                "--port",
                "30303",
                "--syncmode",
                "fast",
                "--verbosity",
                "3",
            ]
        );

        let mainnet = NetworkConfig {
            join: Some(PublicNetwork::Mainnet),
            ..Default::default()
        };
        assert!(!compile(&mainnet, &node).iter().any(|a| a == "--mainnet"));
    }

    #[test]
    fn imported_miner_unlocks_coinbase() {
        let coinbase = "0xd2c21213027cbf4d46c16b55fa98e5252b048706";
        let network = NetworkConfig {
            id: Some(77777),
            consensus: Some(Consensus::ProofOfAuthority),
            genesis: Some(Genesis::new(55555)),
            ..Default::default()
        };
        let node = NodeSpec {
            miner: true,
            coinbase: Some(coinbase.into()),
            import: Some(ImportedAccount {
                private_key_secret_name: "my-account-privatekey".into(),
                password_secret_name: "my-account-password".into(),
            }),
            ..NodeSpec::new("node-1", Client::Geth)
        };
        assert_eq!(
            compile(&network, &node),
            vec![
                "--datadir",
                "/home/ethereum/kotal-data",
                "--networkid",
                "77777",
                "--mine",
                "--miner.etherbase",
                coinbase,
                "--unlock",
                coinbase,
                "--password",
                "/home/ethereum/.kotal-secrets/account.password",
            ]
        );
    }

    #[test]
    fn endpoints() {
        let network = NetworkConfig {
            join: Some(PublicNetwork::Rinkeby),
            ..Default::default()
        };
        let mut node = NodeSpec {
            rpc: true,
            ws: true,
            graphql: true,
            logging: Some(Verbosity::All),
            ..NodeSpec::new("node-1", Client::Geth)
        };
        node.apply_defaults(&ImageConfig::new());
        let args = compile(&network, &node);

        let tail: Vec<&str> = args
            .iter()
            .skip_while(|a| *a != "--http")
            .map(String::as_str)
            .collect();
        assert_eq!(
            tail,
            vec![
                "--http",
                "--http.addr",
                "0.0.0.0",
                "--http.port",
                "8545",
                "--http.api",
                "web3,eth,net",
                "--http.corsdomain",
                "*",
                "--http.vhosts",
                "*",
                "--ws",
                "--ws.addr",
                "0.0.0.0",
                "--ws.port",
                "8546",
                "--ws.api",
                "web3,eth,net",
                "--ws.origins",
                "*",
                "--graphql",
                "--graphql.corsdomain",
                "*",
                "--graphql.vhosts",
                "*",
                "--verbosity",
                "5",
            ]
        );
    }
}
