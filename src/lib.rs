//! chainforge: declarative blockchain node specs, defaulted, validated and compiled
//! into runnable process descriptions (image, command, args, env) per client.
//!
//! Pipeline: raw spec -> defaults -> validation (create/update) -> client compiler
//! -> compiled node handed to an orchestration backend.

/// Parse a client name into the kind's closed client enum, failing with
/// `Error::UnsupportedClient` for anything outside it.
macro_rules! client_try_from {
    ($client:ty, $kind:expr) => {
        impl TryFrom<String> for $client {
            type Error = crate::Error;

            fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
                s.parse::<$client>()
                    .map_err(|_| crate::Error::UnsupportedClient { kind: $kind, client: s })
            }
        }
    };
}

pub mod aptos;
pub mod chainlink;
pub mod compile;
pub mod config;
pub mod error;
pub mod ethereum;
pub mod ethereum2;
pub mod ipfs;
pub mod manifest;
pub mod shared;
pub mod spec;

pub use compile::{ClientCompiler, Compile, CompiledCommand, CompiledNode, EnvValue};
pub use config::ImageConfig;
pub use error::Error;
pub use manifest::Manifest;
pub use spec::{Defaults, ErrorList, FieldError, NodeKind, Object, Validate};

pub type Result<T> = anyhow::Result<T>;
