//! Prysmatic Labs Prysm.

use crate::compile::{ClientCompiler, Env};
use crate::ethereum2::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::shared::{path_data, path_secrets};

pub const BEACON_NODE_IMAGE_ENV: &str = "PRYSM_BEACON_NODE_IMAGE";
pub const VALIDATOR_IMAGE_ENV: &str = "PRYSM_VALIDATOR_IMAGE";
pub const DEFAULT_BEACON_NODE_IMAGE: &str = "gcr.io/prysmaticlabs/prysm/beacon-chain:v3.1.1";
pub const DEFAULT_VALIDATOR_IMAGE: &str = "gcr.io/prysmaticlabs/prysm/validator:v3.1.1";
pub const HOME_DIR: &str = "/home/prysm";

pub const ACCEPT_TERMS: &str = "--accept-terms-of-use";
pub const DATA_DIR: &str = "--datadir";
pub const EXECUTION_ENGINE_ENDPOINT: &str = "--execution-endpoint";
pub const JWT_SECRET: &str = "--jwt-secret";
pub const CHECKPOINT_SYNC_URL: &str = "--checkpoint-sync-url";
pub const GENESIS_STATE_URL: &str = "--genesis-beacon-api-url";
pub const P2P_TCP_PORT: &str = "--p2p-tcp-port";
pub const P2P_UDP_PORT: &str = "--p2p-udp-port";
pub const RPC_HOST: &str = "--rpc-host";
pub const RPC_PORT: &str = "--rpc-port";
pub const GRPC_GATEWAY_HOST: &str = "--grpc-gateway-host";
pub const GRPC_GATEWAY_PORT: &str = "--grpc-gateway-port";
pub const GRPC_GATEWAY_CORS: &str = "--grpc-gateway-corsdomain";
pub const DISABLE_GRPC_GATEWAY: &str = "--disable-grpc-gateway";
pub const TLS_CERT: &str = "--tls-cert";
pub const TLS_KEY: &str = "--tls-key";
pub const VERBOSITY: &str = "--verbosity";

pub const BEACON_RPC_PROVIDER: &str = "--beacon-rpc-provider";
pub const GRAFFITI: &str = "--graffiti";
pub const FEE_RECIPIENT: &str = "--suggested-fee-recipient";
pub const WALLET_DIR: &str = "--wallet-dir";
pub const WALLET_PASSWORD_FILE: &str = "--wallet-password-file";

/// Prysm selects public networks with a bare flag, e.g. `--prater`.
fn network_flag(network: &str) -> String {
    format!("--{}", network)
}

fn cert_paths() -> (String, String) {
    let dir = path_secrets(HOME_DIR);
    (format!("{}/cert/tls.crt", dir), format!("{}/cert/tls.key", dir))
}

pub struct PrysmBeaconNode<'a> {
    pub node: &'a BeaconNodeSpec,
}

impl ClientCompiler for PrysmBeaconNode<'_> {
    fn image(&self) -> String {
        self.node
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_BEACON_NODE_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        Vec::new()
    }

    fn args(&self) -> Vec<String> {
        let node = self.node;
        let mut args = vec![
            ACCEPT_TERMS.to_string(),
            DATA_DIR.to_string(),
            path_data(HOME_DIR),
            network_flag(&node.network),
        ];

        if let Some(endpoint) = &node.execution_engine_endpoint {
            args.extend([EXECUTION_ENGINE_ENDPOINT.to_string(), endpoint.clone()]);
        }

        if node.jwt_secret_name.is_some() {
            args.extend([
                JWT_SECRET.to_string(),
                format!("{}/jwt.secret", path_secrets(HOME_DIR)),
            ]);
        }

        if let Some(url) = &node.checkpoint_sync_url {
            args.extend([
                CHECKPOINT_SYNC_URL.to_string(),
                url.clone(),
                GENESIS_STATE_URL.to_string(),
                url.clone(),
            ]);
        }

        if let Some(port) = node.p2p_port {
            args.extend([
                P2P_TCP_PORT.to_string(),
                port.to_string(),
                P2P_UDP_PORT.to_string(),
                port.to_string(),
            ]);
        }

        if node.rpc {
            if let Some(host) = &node.rpc_host {
                args.extend([RPC_HOST.to_string(), host.clone()]);
            }
            if let Some(port) = node.rpc_port {
                args.extend([RPC_PORT.to_string(), port.to_string()]);
            }
        }

        if node.grpc {
            if let Some(host) = &node.grpc_host {
                args.extend([GRPC_GATEWAY_HOST.to_string(), host.clone()]);
            }
            if let Some(port) = node.grpc_port {
                args.extend([GRPC_GATEWAY_PORT.to_string(), port.to_string()]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([GRPC_GATEWAY_CORS.to_string(), node.cors_domains.join(",")]);
            }
        } else {
            args.push(DISABLE_GRPC_GATEWAY.to_string());
        }

        if node.cert_secret_name.is_some() {
            let (cert, key) = cert_paths();
            args.extend([TLS_CERT.to_string(), cert, TLS_KEY.to_string(), key]);
        }

        if let Some(level) = node.logging {
            args.extend([VERBOSITY.to_string(), level.to_string()]);
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

pub struct PrysmValidator<'a> {
    pub validator: &'a ValidatorSpec,
}

impl ClientCompiler for PrysmValidator<'_> {
    fn image(&self) -> String {
        self.validator
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_VALIDATOR_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        Vec::new()
    }

    fn args(&self) -> Vec<String> {
        let v = self.validator;
        let mut args = vec![
            ACCEPT_TERMS.to_string(),
            DATA_DIR.to_string(),
            path_data(HOME_DIR),
            network_flag(&v.network),
        ];

        // Prysm dials a single beacon node over gRPC, addressed as host:port.
        if let Some(endpoint) = v.beacon_urls().first() {
            let host = endpoint.host_str().unwrap_or_default();
            let provider = match endpoint.port_or_known_default() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            args.extend([BEACON_RPC_PROVIDER.to_string(), provider]);
        }

        if let Some(graffiti) = &v.graffiti {
            args.extend([GRAFFITI.to_string(), graffiti.clone()]);
        }

        if let Some(recipient) = &v.fee_recipient {
            args.extend([FEE_RECIPIENT.to_string(), recipient.clone()]);
        }

        if v.wallet_password_secret.is_some() {
            let secrets = path_secrets(HOME_DIR);
            args.extend([
                WALLET_DIR.to_string(),
                format!("{}/prysm-wallet", path_data(HOME_DIR)),
                WALLET_PASSWORD_FILE.to_string(),
                format!("{}/prysm-wallet/prysm-wallet-password.txt", secrets),
            ]);
        }

        if v.cert_secret_name.is_some() {
            let (cert, _) = cert_paths();
            args.extend([TLS_CERT.to_string(), cert]);
        }

        if let Some(level) = v.logging {
            args.extend([VERBOSITY.to_string(), level.to_string()]);
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
