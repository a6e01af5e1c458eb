//! Beacon node and validator defaulting.

use crate::config::ImageConfig;
use crate::ethereum2::clients::{beacon_node_image, validator_image};
use crate::ethereum2::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::shared::{DEFAULT_HOST, ResourceDefaults, Verbosity};
use crate::spec::Defaults;

pub const DEFAULT_REST_PORT: u16 = 5051;
pub const DEFAULT_RPC_PORT: u16 = 4000;
pub const DEFAULT_GRPC_PORT: u16 = 3500;
pub const DEFAULT_P2P_PORT: u16 = 9000;
pub const DEFAULT_LOGGING: Verbosity = Verbosity::Info;
pub const DEFAULT_GRAFFITI: &str = "Validated by Kotal";
pub const DEFAULT_ORIGINS: &str = "*";

pub const BEACON_NODE_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "8Gi",
    memory_limit: "16Gi",
    storage: "200Gi",
};

pub const VALIDATOR_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "2",
    cpu_limit: "4",
    memory: "2Gi",
    memory_limit: "4Gi",
    storage: "1Gi",
};

impl Defaults for BeaconNodeSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        if self.image.is_none() {
            let (key, default) = beacon_node_image(self.client);
            self.image = Some(images.resolve(None, key, default));
        }

        self.logging.get_or_insert(DEFAULT_LOGGING);
        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);

        if self.rest {
            self.rest_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rest_port.get_or_insert(DEFAULT_REST_PORT);
        }

        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(DEFAULT_RPC_PORT);
        }

        if self.grpc {
            self.grpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.grpc_port.get_or_insert(DEFAULT_GRPC_PORT);
        }

        if self.serves_api() {
            if self.hosts.is_empty() {
                self.hosts = vec![DEFAULT_ORIGINS.to_string()];
            }
            if self.cors_domains.is_empty() {
                self.cors_domains = vec![DEFAULT_ORIGINS.to_string()];
            }
        }

        self.resources.apply_defaults(&BEACON_NODE_RESOURCES);
    }
}

impl Defaults for ValidatorSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        if self.image.is_none() {
            let (key, default) = validator_image(self.client);
            self.image = Some(images.resolve(None, key, default));
        }

        self.logging.get_or_insert(DEFAULT_LOGGING);
        self.graffiti
            .get_or_insert_with(|| DEFAULT_GRAFFITI.to_string());
        self.resources.apply_defaults(&VALIDATOR_RESOURCES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum2::clients::teku;
    use crate::ethereum2::spec::Client;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn rest_defaults_only_when_enabled() {
        let mut node = BeaconNodeSpec::new(Client::Teku, "mainnet");
        node.apply_defaults(&ImageConfig::new());
        assert_eq!(node.rest_port, None);
        assert!(node.cors_domains.is_empty());

        let mut node = BeaconNodeSpec {
            rest: true,
            ..BeaconNodeSpec::new(Client::Teku, "mainnet")
        };
        node.apply_defaults(&ImageConfig::new());
        assert_eq!(node.rest_host.as_deref(), Some("0.0.0.0"));
        assert_eq!(node.rest_port, Some(5051));
        assert_eq!(node.cors_domains, vec!["*".to_string()]);
        assert_eq!(node.hosts, vec!["*".to_string()]);
        assert_eq!(node.rpc_port, None);
    }

    #[test]
    fn image_precedence() {
        let images =
            ImageConfig::new().with_image(teku::BEACON_NODE_IMAGE_ENV, "kotalco/teku:test");

        let mut node = BeaconNodeSpec::new(Client::Teku, "mainnet");
        node.apply_defaults(&ImageConfig::new());
        assert_eq!(node.image.as_deref(), Some(teku::DEFAULT_BEACON_NODE_IMAGE));

        let mut node = BeaconNodeSpec::new(Client::Teku, "mainnet");
        node.apply_defaults(&images);
        assert_eq!(node.image.as_deref(), Some("kotalco/teku:test"));

        let mut node = BeaconNodeSpec {
            image: Some("kotalco/teku:spec".into()),
            ..BeaconNodeSpec::new(Client::Teku, "mainnet")
        };
        node.apply_defaults(&images);
        assert_eq!(node.image.as_deref(), Some("kotalco/teku:spec"));

        // Validator overrides are keyed separately.
        let mut validator = ValidatorSpec::new(Client::Teku, "mainnet");
        validator.apply_defaults(&images);
        assert_eq!(validator.image.as_deref(), Some(teku::DEFAULT_VALIDATOR_IMAGE));
    }

    #[test]
    fn idempotent() {
        let images = ImageConfig::new();
        for client in Client::iter() {
            let mut node = BeaconNodeSpec {
                rest: true,
                rpc: true,
                grpc: true,
                ..BeaconNodeSpec::new(client, "mainnet")
            };
            node.apply_defaults(&images);
            let once = node.clone();
            node.apply_defaults(&images);
            assert_eq!(node, once);

            let mut validator = ValidatorSpec::new(client, "mainnet");
            validator.apply_defaults(&images);
            assert_eq!(validator.graffiti.as_deref(), Some(DEFAULT_GRAFFITI));
            let once = validator.clone();
            validator.apply_defaults(&images);
            assert_eq!(validator, once);
        }
    }
}
