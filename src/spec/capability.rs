//! Capability Registry: static per-client feature tables.
//!
//! Each node kind owns one `Registry` keyed by its client enum. Lookups are pure;
//! a (client, feature) pair missing from the table is simply unsupported.

use crate::shared::Verbosity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Rpc,
    Ws,
    GraphQl,
    Rest,
    Grpc,
    Tls,
    CheckpointSync,
    MultipleBeaconEndpoints,
    Mining,
    ImportAccount,
    FixedDifficulty,
    ProofOfWork,
    ProofOfAuthority,
    IstanbulBft,
    LightSync,
    Logging(Verbosity),
}

pub struct Registry<C: 'static> {
    entries: &'static [(C, &'static [Feature])],
}

impl<C: Copy + PartialEq> Registry<C> {
    pub const fn new(entries: &'static [(C, &'static [Feature])]) -> Self {
        Self { entries }
    }

    pub fn supports(&self, client: C, feature: Feature) -> bool {
        self.entries
            .iter()
            .find(|(c, _)| *c == client)
            .is_some_and(|(_, features)| features.contains(&feature))
    }

    /// Clients declaring `feature`, in table order.
    pub fn clients_supporting(&self, feature: Feature) -> Vec<C> {
        self.entries
            .iter()
            .filter(|(_, features)| features.contains(&feature))
            .map(|(c, _)| *c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Toy {
        Full,
        Bare,
        Missing,
    }

    static TOY: Registry<Toy> = Registry::new(&[
        (Toy::Full, &[Feature::Rpc, Feature::Logging(Verbosity::Info)]),
        (Toy::Bare, &[]),
    ]);

    #[test]
    fn lookups() {
        assert!(TOY.supports(Toy::Full, Feature::Rpc));
        assert!(TOY.supports(Toy::Full, Feature::Logging(Verbosity::Info)));
        assert!(!TOY.supports(Toy::Full, Feature::Logging(Verbosity::Debug)));
        assert!(!TOY.supports(Toy::Bare, Feature::Rpc));
        // Unknown clients are unsupported, not an error.
        assert!(!TOY.supports(Toy::Missing, Feature::Rpc));
        assert_eq!(TOY.clients_supporting(Feature::Rpc), vec![Toy::Full]);
        assert!(TOY.clients_supporting(Feature::Grpc).is_empty());
    }
}
