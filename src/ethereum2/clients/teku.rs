//! ConsenSys Teku.

use crate::compile::{ClientCompiler, Env};
use crate::ethereum2::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::shared::{path_data, path_secrets};
use url::Url;

pub const BEACON_NODE_IMAGE_ENV: &str = "TEKU_BEACON_NODE_IMAGE";
pub const VALIDATOR_IMAGE_ENV: &str = "TEKU_VALIDATOR_IMAGE";
pub const DEFAULT_BEACON_NODE_IMAGE: &str = "consensys/teku:22.9.1";
pub const DEFAULT_VALIDATOR_IMAGE: &str = "consensys/teku:22.9.1";
pub const HOME_DIR: &str = "/opt/teku";

pub const DATA_PATH: &str = "--data-path";
pub const P2P_PORT: &str = "--p2p-port";
pub const NETWORK: &str = "--network";
pub const EXECUTION_ENGINE_ENDPOINT: &str = "--ee-endpoint";
pub const JWT_SECRET_FILE: &str = "--ee-jwt-secret-file";
pub const INITIAL_STATE: &str = "--initial-state";
pub const REST_ENABLED: &str = "--rest-api-enabled";
pub const REST_PORT: &str = "--rest-api-port";
pub const REST_HOST: &str = "--rest-api-interface";
pub const REST_CORS_ORIGINS: &str = "--rest-api-cors-origins";
pub const REST_HOST_ALLOWLIST: &str = "--rest-api-host-allowlist";
pub const LOGGING: &str = "--logging";

pub const VALIDATOR_SUBCOMMAND: &str = "validator-client";
pub const BEACON_NODE_ENDPOINTS: &str = "--beacon-node-api-endpoints";
pub const GRAFFITI: &str = "--validators-graffiti";
pub const FEE_RECIPIENT: &str = "--validators-proposer-default-fee-recipient";
pub const VALIDATOR_KEYS: &str = "--validator-keys";

pub struct TekuBeaconNode<'a> {
    pub node: &'a BeaconNodeSpec,
}

impl ClientCompiler for TekuBeaconNode<'_> {
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
        let mut args = vec![DATA_PATH.to_string(), path_data(HOME_DIR)];

        if let Some(port) = node.p2p_port {
            args.extend([P2P_PORT.to_string(), port.to_string()]);
        }

        args.extend([NETWORK.to_string(), node.network.clone()]);

        if let Some(endpoint) = &node.execution_engine_endpoint {
            args.extend([EXECUTION_ENGINE_ENDPOINT.to_string(), endpoint.clone()]);
        }

        if node.jwt_secret_name.is_some() {
            args.extend([
                JWT_SECRET_FILE.to_string(),
                format!("{}/jwt.secret", path_secrets(HOME_DIR)),
            ]);
        }

        if let Some(url) = &node.checkpoint_sync_url {
            args.extend([INITIAL_STATE.to_string(), url.clone()]);
        }

        if node.rest {
            args.push(REST_ENABLED.to_string());
            if let Some(port) = node.rest_port {
                args.extend([REST_PORT.to_string(), port.to_string()]);
            }
            if let Some(host) = &node.rest_host {
                args.extend([REST_HOST.to_string(), host.clone()]);
            }
            if !node.cors_domains.is_empty() {
                args.extend([REST_CORS_ORIGINS.to_string(), node.cors_domains.join(",")]);
            }
            if !node.hosts.is_empty() {
                args.extend([REST_HOST_ALLOWLIST.to_string(), node.hosts.join(",")]);
            }
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

pub struct TekuValidator<'a> {
    pub validator: &'a ValidatorSpec,
}

impl ClientCompiler for TekuValidator<'_> {
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
            VALIDATOR_SUBCOMMAND.to_string(),
            NETWORK.to_string(),
            v.network.clone(),
            DATA_PATH.to_string(),
            path_data(HOME_DIR),
        ];

        let urls = v.beacon_urls();
        if !urls.is_empty() {
            let endpoints: Vec<&str> = urls.iter().map(Url::as_str).collect();
            args.extend([BEACON_NODE_ENDPOINTS.to_string(), endpoints.join(",")]);
        }

        if let Some(graffiti) = &v.graffiti {
            args.extend([GRAFFITI.to_string(), graffiti.clone()]);
        }

        if let Some(recipient) = &v.fee_recipient {
            args.extend([FEE_RECIPIENT.to_string(), recipient.clone()]);
        }

        if !v.keystores.is_empty() {
            let secrets = path_secrets(HOME_DIR);
            let keys: Vec<String> = v
                .keystores
                .iter()
                .map(|k| {
                    format!(
                        "{dir}/{name}/keystore.json:{dir}/{name}/password.txt",
                        dir = secrets,
                        name = k.secret_name
                    )
                })
                .collect();
            args.extend([VALIDATOR_KEYS.to_string(), keys.join(",")]);
        }

        if let Some(level) = v.logging {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;
    use crate::ethereum2::spec::{Client, Keystore};
    use crate::shared::Verbosity;
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;

    fn beacon_args(mut node: BeaconNodeSpec) -> Vec<String> {
        node.apply_defaults(&ImageConfig::new());
        TekuBeaconNode { node: &node }.args()
    }

    /// `expected` appears in `args` as an ordered subsequence.
    fn contains_in_order(args: &[String], expected: &[&str]) -> bool {
        let mut it = args.iter();
        expected.iter().all(|e| it.any(|a| a == e))
    }

    #[test]
    fn image_command_env_home() {
        let mut node = BeaconNodeSpec::new(Client::Teku, "mainnet");
        node.apply_defaults(&ImageConfig::new());
        let compiled = TekuBeaconNode { node: &node }.compile();
        assert_eq!(compiled.image, DEFAULT_BEACON_NODE_IMAGE);
        assert!(compiled.command.is_empty());
        assert!(compiled.env.is_empty());
        assert_eq!(compiled.home_dir, HOME_DIR);
    }

    #[test]
    fn syncing_mainnet_with_logging() {
        let args = beacon_args(BeaconNodeSpec {
            logging: Some(Verbosity::Error),
            ..BeaconNodeSpec::new(Client::Teku, "mainnet")
        });
        assert_eq!(
            args,
            vec![
                "--data-path",
                "/opt/teku/kotal-data",
                "--p2p-port",
                "9000",
                "--network",
                "mainnet",
                "--logging",
                "ERROR",
            ]
        );
    }

    #[test]
    fn execution_engine_endpoint() {
        let args = beacon_args(BeaconNodeSpec {
            execution_engine_endpoint: Some("https://localhost:8551".into()),
            jwt_secret_name: Some("jwt-secret".into()),
            ..BeaconNodeSpec::new(Client::Teku, "mainnet")
        });
        assert!(contains_in_order(
            &args,
            &[
                DATA_PATH,
                NETWORK,
                "mainnet",
                EXECUTION_ENGINE_ENDPOINT,
                "https://localhost:8551",
                JWT_SECRET_FILE,
                "/opt/teku/.kotal-secrets/jwt.secret",
            ]
        ));
    }

    #[test]
    fn rest_enabled_with_port_and_host() {
        let args = beacon_args(BeaconNodeSpec {
            execution_engine_endpoint: Some("https://localhost:8551".into()),
            rest: true,
            rest_port: Some(3333),
            rest_host: Some("0.0.0.0".into()),
            ..BeaconNodeSpec::new(Client::Teku, "mainnet")
        });
        assert!(contains_in_order(
            &args,
            &[
                DATA_PATH,
                NETWORK,
                "mainnet",
                EXECUTION_ENGINE_ENDPOINT,
                "https://localhost:8551",
                REST_ENABLED,
                REST_PORT,
                "3333",
                REST_HOST,
                "0.0.0.0",
                REST_CORS_ORIGINS,
                "*",
                REST_HOST_ALLOWLIST,
                "*",
            ]
        ));
    }

    #[test]
    fn custom_p2p_port_precedes_network() {
        let args = beacon_args(BeaconNodeSpec {
            p2p_port: Some(7891),
            rest: true,
            ..BeaconNodeSpec::new(Client::Teku, "mainnet")
        });
        assert!(contains_in_order(
            &args,
            &[
                DATA_PATH,
                P2P_PORT,
                "7891",
                NETWORK,
                "mainnet",
                REST_ENABLED,
                REST_PORT,
                "5051",
                REST_HOST,
                "0.0.0.0",
            ]
        ));
    }

    #[test]
    fn validator_client() {
        let mut validator = ValidatorSpec {
            beacon_endpoints: vec!["http://10.0.0.11:5051".to_string()],
            fee_recipient: Some("0xd2c21213027cbf4d46c16b55fa98e5252b048706".into()),
            keystores: vec![Keystore {
                secret_name: "my-validator".into(),
                public_key: None,
            }],
            ..ValidatorSpec::new(Client::Teku, "mainnet")
        };
        validator.apply_defaults(&ImageConfig::new());
        let args = TekuValidator {
            validator: &validator,
        }
        .args();
        assert_eq!(
            args,
            vec![
                "validator-client",
                "--network",
                "mainnet",
                "--data-path",
                "/opt/teku/kotal-data",
                "--beacon-node-api-endpoints",
                "http://10.0.0.11:5051/",
                "--validators-graffiti",
                "Validated by Kotal",
                "--validators-proposer-default-fee-recipient",
                "0xd2c21213027cbf4d46c16b55fa98e5252b048706",
                "--validator-keys",
                "/opt/teku/.kotal-secrets/my-validator/keystore.json:/opt/teku/.kotal-secrets/my-validator/password.txt",
                "--logging",
                "INFO",
            ]
        );
    }
}
