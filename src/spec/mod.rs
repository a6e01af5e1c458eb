//! Spec layer: declarative node specs, defaulting and validation contracts.
//!
//! This module is kind-agnostic. It owns:
//! - field paths + ErrorList (structured violations)
//! - the ordered rule engine
//! - the Capability Registry
//! - the Defaults / Validate contracts every node kind implements

pub mod capability;
pub mod field;
pub mod rules;

pub use capability::{Feature, Registry};
pub use field::{BadValue, ErrorList, ErrorType, FieldError, Path};
pub use rules::{Rule, UpdateRule};

use crate::config::ImageConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Node kinds, one per supported product family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum NodeKind {
    /// Ethereum execution network (one or more nodes).
    Network,
    BeaconNode,
    Validator,
    Peer,
    ClusterPeer,
    ChainlinkNode,
    AptosNode,
}

impl NodeKind {
    pub fn protocol(&self) -> &'static str {
        match self {
            NodeKind::Network => "ethereum",
            NodeKind::BeaconNode | NodeKind::Validator => "ethereum2",
            NodeKind::Peer | NodeKind::ClusterPeer => "ipfs",
            NodeKind::ChainlinkNode => "chainlink",
            NodeKind::AptosNode => "aptos",
        }
    }
}

/// A named spec, as submitted by the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object<S> {
    pub name: String,
    pub spec: S,
}

/// Fills unset optional fields. Never rejects input; idempotent.
pub trait Defaults {
    fn apply_defaults(&mut self, images: &ImageConfig);
}

/// Create/update validation. Returns every violation; empty means valid.
pub trait Validate {
    fn validate_create(&self) -> ErrorList;

    /// Create rules on `self` (the new spec), then immutability and transition
    /// rules against `old`.
    fn validate_update(&self, old: &Self) -> ErrorList;
}

/// Rejects the logging level when the client's registry entry does not list it.
pub fn gate_logging<C>(
    registry: &Registry<C>,
    client: C,
    level: Option<crate::shared::Verbosity>,
    path: &Path,
    errors: &mut ErrorList,
) where
    C: Copy + PartialEq + AsRef<str>,
{
    if let Some(level) = level {
        if !registry.supports(client, Feature::Logging(level)) {
            errors.push(FieldError::invalid(
                path,
                level.as_ref(),
                format!("not supported by client {}", client.as_ref()),
            ));
        }
    }
}

/// "geth", "geth or parity", "teku, prysm or lighthouse".
pub fn one_of<C: AsRef<str>>(clients: &[C]) -> String {
    match clients {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} or {}", head.join(", "), last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_lists() {
        assert_eq!(one_of(&["geth"]), "geth");
        assert_eq!(one_of(&["geth", "parity"]), "geth or parity");
        assert_eq!(one_of(&["teku", "prysm", "lighthouse"]), "teku, prysm or lighthouse");
    }

    #[test]
    fn kinds_map_to_protocols() {
        assert_eq!(NodeKind::Validator.protocol(), "ethereum2");
        assert_eq!(NodeKind::ClusterPeer.protocol(), "ipfs");
        assert_eq!("AptosNode".parse::<NodeKind>().ok(), Some(NodeKind::AptosNode));
    }
}
