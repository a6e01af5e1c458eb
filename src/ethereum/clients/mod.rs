//! Ethereum client compilers and the dispatcher selecting one per node.

pub mod besu;
pub mod geth;
pub mod parity;

pub use besu::BesuClient;
pub use geth::GethClient;
pub use parity::ParityClient;

use crate::compile::{ClientCompiler, Compile, CompiledNode};
use crate::ethereum::spec::{Client, NetworkConfig, NetworkSpec, NodeSpec};
use crate::spec::{NodeKind, Object};
use tracing::debug;

/// Override key and built-in image for a client.
pub fn image_defaults(client: Client) -> (&'static str, &'static str) {
    match client {
        Client::Besu => (besu::IMAGE_ENV, besu::DEFAULT_IMAGE),
        Client::Geth => (geth::IMAGE_ENV, geth::DEFAULT_IMAGE),
        Client::Parity => (parity::IMAGE_ENV, parity::DEFAULT_IMAGE),
    }
}

fn compiler<'a>(
    client: Client,
    network: &'a NetworkConfig,
    node: &'a NodeSpec,
) -> Box<dyn ClientCompiler + 'a> {
    debug!(%client, node = %node.name, "selected ethereum compiler");
    match client {
        Client::Besu => Box::new(BesuClient { network, node }),
        Client::Geth => Box::new(GethClient { network, node }),
        Client::Parity => Box::new(ParityClient { network, node }),
    }
}

pub fn new_client<'a>(
    network: &'a NetworkConfig,
    node: &'a NodeSpec,
) -> Box<dyn ClientCompiler + 'a> {
    compiler(node.client, network, node)
}

/// Dispatch on a raw client name, failing closed outside the supported set.
pub fn new_client_by_name<'a>(
    client: &str,
    network: &'a NetworkConfig,
    node: &'a NodeSpec,
) -> Result<Box<dyn ClientCompiler + 'a>, crate::Error> {
    let client = Client::try_from(client.to_string())?;
    Ok(compiler(client, network, node))
}

fn role(node: &NodeSpec) -> &'static str {
    if node.bootnode {
        "bootnode"
    } else if node.miner {
        "miner"
    } else {
        "node"
    }
}

impl Compile for Object<NetworkSpec> {
    fn compile(&self) -> Vec<CompiledNode> {
        self.spec
            .nodes
            .iter()
            .map(|node| {
                let command = new_client(&self.spec.network, node).compile();
                CompiledNode::new(
                    &format!("{}-{}", self.name, node.name),
                    NodeKind::Network,
                    node.client.as_ref(),
                    role(node),
                    command,
                    node.resources.clone(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::LABEL_COMPONENT;
    use crate::config::ImageConfig;
    use crate::ethereum::spec::PublicNetwork;
    use crate::spec::Defaults;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn dispatch_covers_every_client() {
        let network = NetworkConfig {
            join: Some(PublicNetwork::Goerli),
            ..Default::default()
        };
        for client in Client::iter() {
            let mut node = NodeSpec::new("node-1", client);
            node.apply_defaults(&ImageConfig::new());
            let compiled = new_client(&network, &node).compile();
            assert_eq!(compiled.image, image_defaults(client).1);
        }
    }

    #[test]
    fn unknown_client_name_fails_closed() {
        let network = NetworkConfig::default();
        let node = NodeSpec::new("node-1", Client::Besu);
        let err = new_client_by_name("nethermind", &network, &node)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::Error::UnsupportedClient { kind: NodeKind::Network, ref client } if client == "nethermind"
        ));
        assert!(new_client_by_name("besu", &network, &node).is_ok());
    }

    #[test]
    fn one_compiled_node_per_network_node() {
        let mut spec = NetworkSpec {
            network: NetworkConfig {
                join: Some(PublicNetwork::Rinkeby),
                ..Default::default()
            },
            nodes: vec![
                NodeSpec {
                    bootnode: true,
                    nodekey_secret_name: Some("nodekey".into()),
                    ..NodeSpec::new("node-1", Client::Besu)
                },
                NodeSpec::new("node-2", Client::Geth),
            ],
        };
        spec.apply_defaults(&ImageConfig::new());
        let object = Object {
            name: "rinkeby".to_string(),
            spec,
        };
        let nodes = object.compile();
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["rinkeby-node-1", "rinkeby-node-2"]);
        assert_eq!(nodes[0].labels[LABEL_COMPONENT], "bootnode");
        assert_eq!(nodes[1].labels[LABEL_COMPONENT], "node");
        assert_eq!(nodes[1].client, "geth");
        // Compilation is a pure function of the spec.
        assert_eq!(object.compile(), nodes);
    }
}
