//! Beacon node and validator compilers for teku, prysm, lighthouse and nimbus.

pub mod lighthouse;
pub mod nimbus;
pub mod prysm;
pub mod teku;

use crate::compile::{ClientCompiler, Compile, CompiledNode};
use crate::ethereum2::spec::{BeaconNodeSpec, Client, ValidatorSpec};
use crate::spec::{NodeKind, Object};
use tracing::debug;

pub fn beacon_node_image(client: Client) -> (&'static str, &'static str) {
    match client {
        Client::Teku => (teku::BEACON_NODE_IMAGE_ENV, teku::DEFAULT_BEACON_NODE_IMAGE),
        Client::Prysm => (prysm::BEACON_NODE_IMAGE_ENV, prysm::DEFAULT_BEACON_NODE_IMAGE),
        Client::Lighthouse => (
            lighthouse::BEACON_NODE_IMAGE_ENV,
            lighthouse::DEFAULT_BEACON_NODE_IMAGE,
        ),
        Client::Nimbus => (nimbus::BEACON_NODE_IMAGE_ENV, nimbus::DEFAULT_BEACON_NODE_IMAGE),
    }
}

pub fn validator_image(client: Client) -> (&'static str, &'static str) {
    match client {
        Client::Teku => (teku::VALIDATOR_IMAGE_ENV, teku::DEFAULT_VALIDATOR_IMAGE),
        Client::Prysm => (prysm::VALIDATOR_IMAGE_ENV, prysm::DEFAULT_VALIDATOR_IMAGE),
        Client::Lighthouse => (
            lighthouse::VALIDATOR_IMAGE_ENV,
            lighthouse::DEFAULT_VALIDATOR_IMAGE,
        ),
        Client::Nimbus => (nimbus::VALIDATOR_IMAGE_ENV, nimbus::DEFAULT_VALIDATOR_IMAGE),
    }
}

pub fn new_beacon_node_client(node: &BeaconNodeSpec) -> Box<dyn ClientCompiler + '_> {
    debug!(client = %node.client, "selected beacon node compiler");
    match node.client {
        Client::Teku => Box::new(teku::TekuBeaconNode { node }),
        Client::Prysm => Box::new(prysm::PrysmBeaconNode { node }),
        Client::Lighthouse => Box::new(lighthouse::LighthouseBeaconNode { node }),
        Client::Nimbus => Box::new(nimbus::NimbusBeaconNode { node }),
    }
}

pub fn new_validator_client(validator: &ValidatorSpec) -> Box<dyn ClientCompiler + '_> {
    debug!(client = %validator.client, "selected validator compiler");
    match validator.client {
        Client::Teku => Box::new(teku::TekuValidator { validator }),
        Client::Prysm => Box::new(prysm::PrysmValidator { validator }),
        Client::Lighthouse => Box::new(lighthouse::LighthouseValidator { validator }),
        Client::Nimbus => Box::new(nimbus::NimbusValidator { validator }),
    }
}

impl Compile for Object<BeaconNodeSpec> {
    fn compile(&self) -> Vec<CompiledNode> {
        let command = new_beacon_node_client(&self.spec).compile();
        vec![CompiledNode::new(
            &self.name,
            NodeKind::BeaconNode,
            self.spec.client.as_ref(),
            "beacon-node",
            command,
            self.spec.resources.clone(),
        )]
    }
}

impl Compile for Object<ValidatorSpec> {
    fn compile(&self) -> Vec<CompiledNode> {
        let command = new_validator_client(&self.spec).compile();
        vec![CompiledNode::new(
            &self.name,
            NodeKind::Validator,
            self.spec.client.as_ref(),
            "validator",
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
    use strum::IntoEnumIterator;

    #[test]
    fn images_resolve_per_client() {
        for client in Client::iter() {
            let mut node = BeaconNodeSpec::new(client, "mainnet");
            node.apply_defaults(&ImageConfig::new());
            assert_eq!(new_beacon_node_client(&node).image(), beacon_node_image(client).1);

            let mut validator = ValidatorSpec::new(client, "mainnet");
            validator.apply_defaults(&ImageConfig::new());
            assert_eq!(new_validator_client(&validator).image(), validator_image(client).1);
        }
    }

    #[test]
    fn compiled_validator_labels() {
        let mut spec = ValidatorSpec::new(Client::Lighthouse, "mainnet");
        spec.apply_defaults(&ImageConfig::new());
        let nodes = Object {
            name: "my-validator".to_string(),
            spec,
        }
        .compile();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Validator);
        assert_eq!(nodes[0].labels[crate::compile::LABEL_CLIENT], "lighthouse");
        assert_eq!(nodes[0].labels[crate::compile::LABEL_COMPONENT], "validator");
    }
}
