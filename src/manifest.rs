//! Kind-tagged envelope tying every node kind to the pipeline.
//!
//! { "kind": "BeaconNode", "name": "beacon-1", "spec": { ... } }

use crate::aptos;
use crate::chainlink;
use crate::compile::{Compile, CompiledNode};
use crate::config::ImageConfig;
use crate::error::Error;
use crate::ethereum::NetworkSpec;
use crate::ethereum2::{BeaconNodeSpec, ValidatorSpec};
use crate::ipfs::{ClusterPeerSpec, PeerSpec};
use crate::spec::{Defaults, ErrorList, FieldError, NodeKind, Object, Path, Validate};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Manifest {
    Network(Object<NetworkSpec>),
    BeaconNode(Object<BeaconNodeSpec>),
    Validator(Object<ValidatorSpec>),
    Peer(Object<PeerSpec>),
    ClusterPeer(Object<ClusterPeerSpec>),
    ChainlinkNode(Object<chainlink::NodeSpec>),
    AptosNode(Object<aptos::NodeSpec>),
}

/// Run `$body` with `$obj` bound to the wrapped object, whatever the kind.
macro_rules! each_kind {
    ($manifest:expr, $obj:ident => $body:expr) => {
        match $manifest {
            Manifest::Network($obj) => $body,
            Manifest::BeaconNode($obj) => $body,
            Manifest::Validator($obj) => $body,
            Manifest::Peer($obj) => $body,
            Manifest::ClusterPeer($obj) => $body,
            Manifest::ChainlinkNode($obj) => $body,
            Manifest::AptosNode($obj) => $body,
        }
    };
}

impl Manifest {
    pub fn kind(&self) -> NodeKind {
        match self {
            Manifest::Network(_) => NodeKind::Network,
            Manifest::BeaconNode(_) => NodeKind::BeaconNode,
            Manifest::Validator(_) => NodeKind::Validator,
            Manifest::Peer(_) => NodeKind::Peer,
            Manifest::ClusterPeer(_) => NodeKind::ClusterPeer,
            Manifest::ChainlinkNode(_) => NodeKind::ChainlinkNode,
            Manifest::AptosNode(_) => NodeKind::AptosNode,
        }
    }

    pub fn name(&self) -> &str {
        each_kind!(self, obj => obj.name.as_str())
    }

    pub fn apply_defaults(&mut self, images: &ImageConfig) {
        info!(kind = %self.kind(), name = self.name(), "defaulting");
        each_kind!(self, obj => obj.spec.apply_defaults(images))
    }

    pub fn validate_create(&self) -> ErrorList {
        info!(kind = %self.kind(), name = self.name(), "validating create");
        each_kind!(self, obj => obj.spec.validate_create())
    }

    /// `self` is the new object. A kind change is reported at `kind`.
    pub fn validate_update(&self, old: &Manifest) -> ErrorList {
        info!(kind = %self.kind(), name = self.name(), "validating update");
        match (old, self) {
            (Manifest::Network(old), Manifest::Network(new)) => new.spec.validate_update(&old.spec),
            (Manifest::BeaconNode(old), Manifest::BeaconNode(new)) => {
                new.spec.validate_update(&old.spec)
            }
            (Manifest::Validator(old), Manifest::Validator(new)) => {
                new.spec.validate_update(&old.spec)
            }
            (Manifest::Peer(old), Manifest::Peer(new)) => new.spec.validate_update(&old.spec),
            (Manifest::ClusterPeer(old), Manifest::ClusterPeer(new)) => {
                new.spec.validate_update(&old.spec)
            }
            (Manifest::ChainlinkNode(old), Manifest::ChainlinkNode(new)) => {
                new.spec.validate_update(&old.spec)
            }
            (Manifest::AptosNode(old), Manifest::AptosNode(new)) => {
                new.spec.validate_update(&old.spec)
            }
            _ => {
                let mut errors = ErrorList::new();
                errors.push(FieldError::immutable(
                    &Path::new("kind"),
                    self.kind().to_string(),
                ));
                errors
            }
        }
    }

    pub fn compile(&self) -> Vec<CompiledNode> {
        info!(kind = %self.kind(), name = self.name(), "compiling");
        each_kind!(self, obj => obj.compile())
    }

    /// Turn a non-empty violation list into an atomic rejection.
    pub fn reject(&self, errors: ErrorList) -> Result<(), Error> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(Error::Invalid {
            kind: self.kind(),
            name: self.name().to_string(),
            errors,
        })
    }

    /// Default, validate and compile; nothing is compiled from an invalid spec.
    /// `old` may be the raw previous manifest: it is defaulted on a copy first.
    pub fn admit(
        &mut self,
        images: &ImageConfig,
        old: Option<&Manifest>,
    ) -> Result<Vec<CompiledNode>, Error> {
        self.apply_defaults(images);
        let errors = match old {
            Some(old) => {
                let mut old = old.clone();
                old.apply_defaults(images);
                self.validate_update(&old)
            }
            None => self.validate_create(),
        };
        self.reject(errors)?;
        Ok(self.compile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn beacon_manifest() -> Manifest {
        serde_json::from_value(serde_json::json!({
            "kind": "BeaconNode",
            "name": "beacon-1",
            "spec": {
                "client": "teku",
                "network": "mainnet",
                "executionEngineEndpoint": "https://localhost:8551",
                "jwtSecretName": "jwt-secret",
                "rest": true
            }
        }))
        .unwrap()
    }

    #[test]
    fn decodes_by_kind() {
        let manifest = beacon_manifest();
        assert_eq!(manifest.kind(), NodeKind::BeaconNode);
        assert_eq!(manifest.name(), "beacon-1");
    }

    #[test]
    fn unsupported_client_names_the_kind() {
        let err = serde_json::from_value::<Manifest>(serde_json::json!({
            "kind": "Network",
            "name": "net",
            "spec": { "join": "rinkeby", "nodes": [ { "name": "n", "client": "erigon" } ] }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unsupported client \"erigon\""), "{}", err);
    }

    #[test]
    fn admit_compiles_valid_specs() {
        let mut manifest = beacon_manifest();
        let nodes = manifest.admit(&ImageConfig::new(), None).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "beacon-1");
        assert!(nodes[0].command.args.contains(&"--rest-api-enabled".to_string()));
    }

    #[test]
    fn admit_rejects_atomically() {
        let mut manifest: Manifest = serde_json::from_value(serde_json::json!({
            "kind": "Validator",
            "name": "validator-1",
            "spec": { "client": "prysm", "network": "mainnet" }
        }))
        .unwrap();
        match manifest.admit(&ImageConfig::new(), None) {
            Err(Error::Invalid { kind, name, errors }) => {
                assert_eq!(kind, NodeKind::Validator);
                assert_eq!(name, "validator-1");
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["spec.beaconEndpoints", "spec.walletPasswordSecret"]);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn unchanged_raw_update_is_admitted() {
        let raw = serde_json::json!({
            "kind": "Network",
            "name": "private",
            "spec": {
                "id": 7777,
                "consensus": "poa",
                "genesis": { "chainId": 5555 },
                "nodes": [ { "name": "node-1", "client": "besu" } ]
            }
        });
        let old: Manifest = serde_json::from_value(raw.clone()).unwrap();
        let mut new: Manifest = serde_json::from_value(raw).unwrap();
        let nodes = new.admit(&ImageConfig::new(), Some(&old)).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn kind_change_is_an_update_violation() {
        let old = beacon_manifest();
        let mut new: Manifest = serde_json::from_value(serde_json::json!({
            "kind": "Peer",
            "name": "beacon-1",
            "spec": {}
        }))
        .unwrap();
        new.apply_defaults(&ImageConfig::new());
        assert_eq!(
            new.validate_update(&old).as_slice(),
            &[FieldError::immutable(&Path::new("kind"), "Peer")]
        );
    }
}
