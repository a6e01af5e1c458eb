//! Status Nimbus. Every flag takes the `--flag=value` form.

use crate::compile::{ClientCompiler, Env};
use crate::ethereum2::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::shared::{arg_with_val, path_data, path_secrets};

pub const BEACON_NODE_IMAGE_ENV: &str = "NIMBUS_BEACON_NODE_IMAGE";
pub const VALIDATOR_IMAGE_ENV: &str = "NIMBUS_VALIDATOR_IMAGE";
pub const DEFAULT_BEACON_NODE_IMAGE: &str = "statusim/nimbus-eth2:multiarch-v22.9.1";
pub const DEFAULT_VALIDATOR_IMAGE: &str = "statusim/nimbus-validator-client:multiarch-v22.9.1";
pub const HOME_DIR: &str = "/home/nimbus";

pub const BEACON_NODE_BINARY: &str = "nimbus_beacon_node";
pub const VALIDATOR_BINARY: &str = "nimbus_validator_client";

pub const NON_INTERACTIVE: &str = "--non-interactive";
pub const DATA_DIR: &str = "--data-dir";
pub const NETWORK: &str = "--network";
pub const EXECUTION_ENGINE_ENDPOINT: &str = "--web3-url";
pub const JWT_SECRET: &str = "--jwt-secret";
pub const TCP_PORT: &str = "--tcp-port";
pub const UDP_PORT: &str = "--udp-port";
pub const REST: &str = "--rest";
pub const REST_ADDRESS: &str = "--rest-address";
pub const REST_PORT: &str = "--rest-port";
pub const REST_ALLOW_ORIGIN: &str = "--rest-allow-origin";
pub const LOG_LEVEL: &str = "--log-level";

pub const RPC_ADDRESS: &str = "--rpc-address";
pub const RPC_PORT: &str = "--rpc-port";
pub const GRAFFITI: &str = "--graffiti";
pub const FEE_RECIPIENT: &str = "--suggested-fee-recipient";
pub const VALIDATORS_DIR: &str = "--validators-dir";
pub const SECRETS_DIR: &str = "--secrets-dir";

pub struct NimbusBeaconNode<'a> {
    pub node: &'a BeaconNodeSpec,
}

impl ClientCompiler for NimbusBeaconNode<'_> {
    fn image(&self) -> String {
        self.node
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_BEACON_NODE_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        vec![BEACON_NODE_BINARY.to_string()]
    }

    fn args(&self) -> Vec<String> {
        let node = self.node;
        let mut args = vec![
            NON_INTERACTIVE.to_string(),
            arg_with_val(DATA_DIR, path_data(HOME_DIR)),
            arg_with_val(NETWORK, &node.network),
        ];

        if let Some(endpoint) = &node.execution_engine_endpoint {
            args.push(arg_with_val(EXECUTION_ENGINE_ENDPOINT, endpoint));
        }

        if node.jwt_secret_name.is_some() {
            args.push(arg_with_val(
                JWT_SECRET,
                format!("{}/jwt.secret", path_secrets(HOME_DIR)),
            ));
        }

        if let Some(port) = node.p2p_port {
            args.push(arg_with_val(TCP_PORT, port));
            args.push(arg_with_val(UDP_PORT, port));
        }

        if node.rest {
            args.push(REST.to_string());
            if let Some(host) = &node.rest_host {
                args.push(arg_with_val(REST_ADDRESS, host));
            }
            if let Some(port) = node.rest_port {
                args.push(arg_with_val(REST_PORT, port));
            }
            if !node.cors_domains.is_empty() {
                args.push(arg_with_val(REST_ALLOW_ORIGIN, node.cors_domains.join(",")));
            }
        }

        if let Some(level) = node.logging {
            args.push(arg_with_val(LOG_LEVEL, level.upper()));
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

pub struct NimbusValidator<'a> {
    pub validator: &'a ValidatorSpec,
}

impl ClientCompiler for NimbusValidator<'_> {
    fn image(&self) -> String {
        self.validator
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_VALIDATOR_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        vec![VALIDATOR_BINARY.to_string()]
    }

    fn args(&self) -> Vec<String> {
        let v = self.validator;
        let mut args = vec![
            NON_INTERACTIVE.to_string(),
            arg_with_val(DATA_DIR, path_data(HOME_DIR)),
        ];

        // The REST address is scheme and host only; the port travels separately.
        if let Some(endpoint) = v.beacon_urls().first() {
            let host = endpoint.host_str().unwrap_or_default();
            args.push(arg_with_val(
                RPC_ADDRESS,
                format!("{}://{}", endpoint.scheme(), host),
            ));
            if let Some(port) = endpoint.port_or_known_default() {
                args.push(arg_with_val(RPC_PORT, port));
            }
        }

        if let Some(graffiti) = &v.graffiti {
            args.push(arg_with_val(GRAFFITI, graffiti));
        }

        if let Some(recipient) = &v.fee_recipient {
            args.push(arg_with_val(FEE_RECIPIENT, recipient));
        }

        if !v.keystores.is_empty() {
            args.push(arg_with_val(
                VALIDATORS_DIR,
                format!("{}/validator-keys", path_data(HOME_DIR)),
            ));
            args.push(arg_with_val(
                SECRETS_DIR,
                format!("{}/validator-secrets", path_data(HOME_DIR)),
            ));
        }

        if let Some(level) = v.logging {
            args.push(arg_with_val(LOG_LEVEL, level.upper()));
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
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;

    #[test]
    fn mainnet_validator_client() {
        let mut validator = ValidatorSpec {
            beacon_endpoints: vec!["http://10.0.0.11".to_string()],
            ..ValidatorSpec::new(Client::Nimbus, "mainnet")
        };
        validator.apply_defaults(&ImageConfig::new());
        let compiled = NimbusValidator {
            validator: &validator,
        }
        .compile();

        assert_eq!(compiled.command, vec!["nimbus_validator_client"]);
        for expected in [
            "--non-interactive",
            "--data-dir=/home/nimbus/kotal-data",
            "--rpc-address=http://10.0.0.11",
            "--rpc-port=80",
            "--graffiti=Validated by Kotal",
        ] {
            assert!(
                compiled.args.iter().any(|a| a == expected),
                "missing {} in {:?}",
                expected,
                compiled.args
            );
        }
    }

    #[test]
    fn beacon_node_rest() {
        let mut node = BeaconNodeSpec {
            rest: true,
            execution_engine_endpoint: Some("http://geth:8551".into()),
            jwt_secret_name: Some("jwt".into()),
            ..BeaconNodeSpec::new(Client::Nimbus, "mainnet")
        };
        node.apply_defaults(&ImageConfig::new());
        let args = NimbusBeaconNode { node: &node }.args();
        assert_eq!(
            args,
            vec![
                "--non-interactive",
                "--data-dir=/home/nimbus/kotal-data",
                "--network=mainnet",
                "--web3-url=http://geth:8551",
                "--jwt-secret=/home/nimbus/.kotal-secrets/jwt.secret",
                "--tcp-port=9000",
                "--udp-port=9000",
                "--rest",
                "--rest-address=0.0.0.0",
                "--rest-port=5051",
                "--rest-allow-origin=*",
                "--log-level=INFO",
            ]
        );
    }
}
