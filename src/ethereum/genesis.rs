//! Genesis block of a self-hosted network: chain id, consensus parameters and the
//! fork activation schedule.

use crate::ethereum::spec::Consensus;
use crate::spec::{ErrorList, FieldError, Path};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// Chain id of Ethereum mainnet; reusing it would allow transaction replay.
pub const MAINNET_CHAIN_ID: u64 = 1;

pub const DEFAULT_COINBASE: &str = "0x0000000000000000000000000000000000000000";
pub const DEFAULT_DIFFICULTY: &str = "0x1";
pub const DEFAULT_MIX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";
pub const DEFAULT_GAS_LIMIT: &str = "0x47b760";
pub const DEFAULT_NONCE: &str = "0x0";
pub const DEFAULT_TIMESTAMP: &str = "0x0";

pub const DEFAULT_BLOCK_PERIOD: u32 = 15;
pub const DEFAULT_EPOCH_LENGTH: u64 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT: u32 = 10;
pub const DEFAULT_MESSAGE_QUEUE_LIMIT: u32 = 1000;
pub const DEFAULT_DUPLICATE_MESSAGE_LIMIT: u32 = 100;
pub const DEFAULT_FUTURE_MESSAGES_LIMIT: u32 = 1000;
pub const DEFAULT_FUTURE_MESSAGES_MAX_DISTANCE: u32 = 10;

/// Named forks, in canonical activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Fork {
    Homestead,
    Eip150,
    Eip155,
    Eip158,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    MuirGlacier,
    Berlin,
    London,
    ArrowGlacier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub struct Forks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homestead: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip150: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip155: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip158: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byzantium: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constantinople: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub petersburg: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub istanbul: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muirglacier: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub berlin: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub london: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrowglacier: Option<u64>,
}

impl Forks {
    fn slot(&mut self, fork: Fork) -> &mut Option<u64> {
        match fork {
            Fork::Homestead => &mut self.homestead,
            Fork::Eip150 => &mut self.eip150,
            Fork::Eip155 => &mut self.eip155,
            Fork::Eip158 => &mut self.eip158,
            Fork::Byzantium => &mut self.byzantium,
            Fork::Constantinople => &mut self.constantinople,
            Fork::Petersburg => &mut self.petersburg,
            Fork::Istanbul => &mut self.istanbul,
            Fork::MuirGlacier => &mut self.muirglacier,
            Fork::Berlin => &mut self.berlin,
            Fork::London => &mut self.london,
            Fork::ArrowGlacier => &mut self.arrowglacier,
        }
    }

    pub fn get(&self, fork: Fork) -> Option<u64> {
        match fork {
            Fork::Homestead => self.homestead,
            Fork::Eip150 => self.eip150,
            Fork::Eip155 => self.eip155,
            Fork::Eip158 => self.eip158,
            Fork::Byzantium => self.byzantium,
            Fork::Constantinople => self.constantinople,
            Fork::Petersburg => self.petersburg,
            Fork::Istanbul => self.istanbul,
            Fork::MuirGlacier => self.muirglacier,
            Fork::Berlin => self.berlin,
            Fork::London => self.london,
            Fork::ArrowGlacier => self.arrowglacier,
        }
    }

    pub fn set(&mut self, fork: Fork, block: u64) {
        *self.slot(fork) = Some(block);
    }

    /// An unset fork activates with the highest fork scheduled before it.
    pub fn apply_defaults(&mut self) {
        let mut highest = 0;
        for fork in Fork::iter() {
            let slot = self.slot(fork);
            match *slot {
                Some(block) => highest = highest.max(block),
                None => *slot = Some(highest),
            }
        }
    }

    /// One violation per fork scheduled before a canonically earlier fork.
    /// The violation names the highest such earlier fork.
    pub fn validate_order(&self, path: &Path, errors: &mut ErrorList) {
        let mut highest: Option<(Fork, u64)> = None;
        for fork in Fork::iter() {
            let Some(block) = self.get(fork) else {
                continue;
            };
            match highest {
                Some((prev, prev_block)) if block < prev_block => {
                    errors.push(FieldError::invalid(
                        &path.child(fork.as_ref()),
                        block.to_string(),
                        format!(
                            "Fork {} can't be activated (at block {}) before fork {} (at block {})",
                            fork, block, prev, prev_block
                        ),
                    ));
                }
                Some((_, prev_block)) if block == prev_block => {}
                _ => highest = Some((fork, block)),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clique {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ibft2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_queue_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_message_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_messages_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_messages_max_distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ethash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_difficulty: Option<u64>,
}

/// Prefunded account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    pub chain_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<Forks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clique: Option<Clique>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibft2: Option<Ibft2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethash: Option<Ethash>,
}

impl Genesis {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    fn has_consensus_block(&self) -> bool {
        self.clique.is_some() || self.ibft2.is_some() || self.ethash.is_some()
    }

    pub fn apply_defaults(&mut self, consensus: Option<Consensus>) {
        fn fill(field: &mut Option<String>, value: &str) {
            if field.is_none() {
                *field = Some(value.to_string());
            }
        }

        fill(&mut self.coinbase, DEFAULT_COINBASE);
        fill(&mut self.difficulty, DEFAULT_DIFFICULTY);
        fill(&mut self.mix_hash, DEFAULT_MIX_HASH);
        fill(&mut self.gas_limit, DEFAULT_GAS_LIMIT);
        fill(&mut self.nonce, DEFAULT_NONCE);
        fill(&mut self.timestamp, DEFAULT_TIMESTAMP);

        self.forks.get_or_insert_with(Forks::default).apply_defaults();

        // Only fill the matching block when the user gave none; a mismatch is
        // left for validation to report.
        if !self.has_consensus_block() {
            match consensus {
                Some(Consensus::ProofOfWork) => self.ethash = Some(Ethash::default()),
                Some(Consensus::ProofOfAuthority) => self.clique = Some(Clique::default()),
                Some(Consensus::IstanbulBft) => self.ibft2 = Some(Ibft2::default()),
                None => {}
            }
        }

        if let Some(clique) = &mut self.clique {
            clique.block_period.get_or_insert(DEFAULT_BLOCK_PERIOD);
            clique.epoch_length.get_or_insert(DEFAULT_EPOCH_LENGTH);
        }

        if let Some(ibft2) = &mut self.ibft2 {
            ibft2.block_period.get_or_insert(DEFAULT_BLOCK_PERIOD);
            ibft2.epoch_length.get_or_insert(DEFAULT_EPOCH_LENGTH);
            ibft2.request_timeout.get_or_insert(DEFAULT_REQUEST_TIMEOUT);
            ibft2.message_queue_limit.get_or_insert(DEFAULT_MESSAGE_QUEUE_LIMIT);
            ibft2
                .duplicate_message_limit
                .get_or_insert(DEFAULT_DUPLICATE_MESSAGE_LIMIT);
            ibft2
                .future_messages_limit
                .get_or_insert(DEFAULT_FUTURE_MESSAGES_LIMIT);
            ibft2
                .future_messages_max_distance
                .get_or_insert(DEFAULT_FUTURE_MESSAGES_MAX_DISTANCE);
        }
    }
}
