//! Ethereum execution networks: Besu, Geth and OpenEthereum (Parity) nodes.

pub mod clients;
pub mod defaults;
pub mod genesis;
pub mod spec;
pub mod validation;

pub use genesis::{Clique, Ethash, Fork, Forks, Genesis, Ibft2};
pub use spec::{
    Api, Client, Consensus, ImportedAccount, NetworkConfig, NetworkSpec, NodeSpec, PublicNetwork,
    SyncMode,
};

use crate::shared::Verbosity as V;
use crate::spec::Feature::*;
use crate::spec::Registry;

pub static CAPABILITIES: Registry<Client> = Registry::new(&[
    (
        Client::Besu,
        &[
            Rpc,
            Ws,
            GraphQl,
            Mining,
            ProofOfWork,
            ProofOfAuthority,
            IstanbulBft,
            FixedDifficulty,
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
        Client::Geth,
        &[
            Rpc,
            Ws,
            GraphQl,
            Mining,
            ImportAccount,
            ProofOfWork,
            ProofOfAuthority,
            LightSync,
            Logging(V::Off),
            Logging(V::Error),
            Logging(V::Warn),
            Logging(V::Info),
            Logging(V::Debug),
            Logging(V::All),
        ],
    ),
    (
        Client::Parity,
        &[
            Rpc,
            Ws,
            ImportAccount,
            ProofOfWork,
            ProofOfAuthority,
            Logging(V::Error),
            Logging(V::Warn),
            Logging(V::Info),
            Logging(V::Debug),
            Logging(V::Trace),
        ],
    ),
]);
