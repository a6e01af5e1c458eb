//! Outward failure surfaces: invalid specs and unsupported clients.

use crate::spec::{ErrorList, NodeKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A client name outside the closed set for its node kind.
    #[error("unsupported client {client:?} for {kind}")]
    UnsupportedClient { kind: NodeKind, client: String },

    /// A spec that failed validation, rejected as a whole.
    #[error("{kind} {name:?} is invalid: {errors}")]
    Invalid {
        kind: NodeKind,
        name: String,
        errors: ErrorList,
    },
}
