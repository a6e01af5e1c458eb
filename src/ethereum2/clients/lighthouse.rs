//! Sigma Prime Lighthouse. One binary; `bn` and `vc` select the role.

use crate::compile::{ClientCompiler, Env};
use crate::ethereum2::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::shared::{path_data, path_secrets};
use url::Url;

pub const BEACON_NODE_IMAGE_ENV: &str = "LIGHTHOUSE_BEACON_NODE_IMAGE";
pub const VALIDATOR_IMAGE_ENV: &str = "LIGHTHOUSE_VALIDATOR_IMAGE";
pub const DEFAULT_BEACON_NODE_IMAGE: &str = "sigp/lighthouse:v3.1.2";
pub const DEFAULT_VALIDATOR_IMAGE: &str = "sigp/lighthouse:v3.1.2";
pub const HOME_DIR: &str = "/home/lighthouse";

pub const BINARY: &str = "lighthouse";
pub const BEACON_NODE_SUBCOMMAND: &str = "bn";
pub const VALIDATOR_SUBCOMMAND: &str = "vc";

pub const DATA_DIR: &str = "--datadir";
pub const NETWORK: &str = "--network";
pub const EXECUTION_ENGINE_ENDPOINT: &str = "--execution-endpoint";
pub const JWT_SECRET: &str = "--execution-jwt";
pub const CHECKPOINT_SYNC_URL: &str = "--checkpoint-sync-url";
pub const P2P_PORT: &str = "--port";
pub const HTTP: &str = "--http";
pub const HTTP_ADDRESS: &str = "--http-address";
pub const HTTP_PORT: &str = "--http-port";
pub const HTTP_ALLOW_ORIGIN: &str = "--http-allow-origin";
pub const DEBUG_LEVEL: &str = "--debug-level";

pub const BEACON_NODES: &str = "--beacon-nodes";
pub const GRAFFITI: &str = "--graffiti";
pub const FEE_RECIPIENT: &str = "--suggested-fee-recipient";
pub const INIT_SLASHING_PROTECTION: &str = "--init-slashing-protection";

pub struct LighthouseBeaconNode<'a> {
    pub node: &'a BeaconNodeSpec,
}

impl ClientCompiler for LighthouseBeaconNode<'_> {
    fn image(&self) -> String {
        self.node
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_BEACON_NODE_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        vec![BINARY.to_string(), BEACON_NODE_SUBCOMMAND.to_string()]
    }

    fn args(&self) -> Vec<String> {
        let node = self.node;
        let mut args = vec![
            DATA_DIR.to_string(),
            path_data(HOME_DIR),
            NETWORK.to_string(),
            node.network.clone(),
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
            args.extend([CHECKPOINT_SYNC_URL.to_string(), url.clone()]);
        }

        if let Some(port) = node.p2p_port {
            args.extend([P2P_PORT.to_string(), port.to_string()]);
        }

        if node.rest {
            args.push(HTTP.to_string());
            if let Some(host) = &node.rest_host {
                args.extend([HTTP_ADDRESS.to_string(), host.clone()]);
            }
            if let Some(port) = node.rest_port {
                args.extend([HTTP_PORT.to_string(), port.to_string()]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([HTTP_ALLOW_ORIGIN.to_string(), node.cors_domains.join(",")]);
            }
        }

        if let Some(level) = node.logging {
            args.extend([DEBUG_LEVEL.to_string(), level.to_string()]);
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

pub struct LighthouseValidator<'a> {
    pub validator: &'a ValidatorSpec,
}

impl ClientCompiler for LighthouseValidator<'_> {
    fn image(&self) -> String {
        self.validator
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_VALIDATOR_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        vec![BINARY.to_string(), VALIDATOR_SUBCOMMAND.to_string()]
    }

    fn args(&self) -> Vec<String> {
        let v = self.validator;
        let mut args = vec![
            DATA_DIR.to_string(),
            path_data(HOME_DIR),
            NETWORK.to_string(),
            v.network.clone(),
            INIT_SLASHING_PROTECTION.to_string(),
        ];

        let urls = v.beacon_urls();
        if !urls.is_empty() {
            let endpoints: Vec<&str> = urls.iter().map(Url::as_str).collect();
            args.extend([BEACON_NODES.to_string(), endpoints.join(",")]);
        }

        if let Some(graffiti) = &v.graffiti {
            args.extend([GRAFFITI.to_string(), graffiti.clone()]);
        }

        if let Some(recipient) = &v.fee_recipient {
            args.extend([FEE_RECIPIENT.to_string(), recipient.clone()]);
        }

        if let Some(level) = v.logging {
            args.extend([DEBUG_LEVEL.to_string(), level.to_string()]);
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
    use crate::ethereum2::spec::Client;
    use crate::shared::Verbosity;
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;

    #[test]
    fn beacon_node_http_api() {
        let mut node = BeaconNodeSpec {
            rest: true,
            checkpoint_sync_url: Some("https://checkpoint.example.org".into()),
            logging: Some(Verbosity::Crit),
            ..BeaconNodeSpec::new(Client::Lighthouse, "mainnet")
        };
        node.apply_defaults(&ImageConfig::new());
        let compiled = LighthouseBeaconNode { node: &node }.compile();
        assert_eq!(compiled.command, vec!["lighthouse", "bn"]);
        assert_eq!(
            compiled.args,
            vec![
                "--datadir",
                "/home/lighthouse/kotal-data",
                "--network",
                "mainnet",
                "--checkpoint-sync-url",
                "https://checkpoint.example.org",
                "--port",
                "9000",
                "--http",
                "--http-address",
                "0.0.0.0",
                "--http-port",
                "5051",
                "--http-allow-origin",
                "*",
                "--debug-level",
                "crit",
            ]
        );
    }

    #[test]
    fn validator_joins_every_beacon_endpoint() {
        let mut validator = ValidatorSpec {
            beacon_endpoints: vec![
                "http://10.0.0.11:5051".to_string(),
                "http://10.0.0.12:5051".to_string(),
            ],
            ..ValidatorSpec::new(Client::Lighthouse, "prater")
        };
        validator.apply_defaults(&ImageConfig::new());
        let compiled = LighthouseValidator {
            validator: &validator,
        }
        .compile();
        assert_eq!(compiled.command, vec!["lighthouse", "vc"]);
        assert_eq!(
            compiled.args,
            vec![
                "--datadir",
                "/home/lighthouse/kotal-data",
                "--network",
                "prater",
                "--init-slashing-protection",
                "--beacon-nodes",
                "http://10.0.0.11:5051/,http://10.0.0.12:5051/",
                "--graffiti",
                "Validated by Kotal",
                "--debug-level",
                "info",
            ]
        );
    }
}
