//! Ethereum 2.0 consensus layer: beacon nodes and validator clients.

pub mod clients;
pub mod defaults;
pub mod spec;
pub mod validation;

pub use spec::{BeaconNodeSpec, Client, Keystore, ValidatorSpec};

use crate::shared::Verbosity as V;
use crate::spec::Feature::*;
use crate::spec::Registry;

pub static BEACON_CAPABILITIES: Registry<Client> = Registry::new(&[
    (
        Client::Teku,
        &[
            Rest,
            CheckpointSync,
            Logging(V::Off),
            Logging(V::Fatal),
            Logging(V::Error),
            Logging(V::Warn),
            Logging(V::Info),
            Logging(V::Debug),
            Logging(V::Trace),
            Logging(V::All),
        ],
    ),
    (
        Client::Prysm,
        &[
            Rpc,
            Grpc,
            Tls,
            CheckpointSync,
            Logging(V::Trace),
            Logging(V::Debug),
            Logging(V::Info),
            Logging(V::Warn),
            Logging(V::Error),
            Logging(V::Fatal),
            Logging(V::Panic),
        ],
    ),
    (
        Client::Lighthouse,
        &[
            Rest,
            CheckpointSync,
            Logging(V::Error),
            Logging(V::Warn),
            Logging(V::Info),
            Logging(V::Debug),
            Logging(V::Trace),
            Logging(V::Crit),
        ],
    ),
    (
        Client::Nimbus,
        &[
            Rest,
            Logging(V::Trace),
            Logging(V::Debug),
            Logging(V::Info),
            Logging(V::Notice),
            Logging(V::Warn),
            Logging(V::Error),
            Logging(V::Fatal),
            Logging(V::None),
        ],
    ),
]);

pub static VALIDATOR_CAPABILITIES: Registry<Client> = Registry::new(&[
    (
        Client::Teku,
        &[
            Logging(V::Off),
            Logging(V::Fatal),
            Logging(V::Error),
            Logging(V::Warn),
            Logging(V::Info),
            Logging(V::Debug),
            Logging(V::Trace),
            Logging(V::All),
        ],
    ),
    (
        Client::Prysm,
        &[
            Tls,
            Logging(V::Trace),
            Logging(V::Debug),
            Logging(V::Info),
            Logging(V::Warn),
            Logging(V::Error),
            Logging(V::Fatal),
            Logging(V::Panic),
        ],
    ),
    (
        Client::Lighthouse,
        &[
            MultipleBeaconEndpoints,
            Logging(V::Error),
            Logging(V::Warn),
            Logging(V::Info),
            Logging(V::Debug),
            Logging(V::Trace),
            Logging(V::Crit),
        ],
    ),
    (
        Client::Nimbus,
        &[
            Logging(V::Trace),
            Logging(V::Debug),
            Logging(V::Info),
            Logging(V::Notice),
            Logging(V::Warn),
            Logging(V::Error),
            Logging(V::Fatal),
            Logging(V::None),
        ],
    ),
]);
