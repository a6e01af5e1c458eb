//! Ethereum network validation.
//!
//! Network-level rules run first, in dependency order, then the node rules run
//! once per node (node-major: every rule for nodes[0], then nodes[1], ...).

use crate::ethereum::CAPABILITIES;
use crate::ethereum::genesis::MAINNET_CHAIN_ID;
use crate::ethereum::spec::{Client, Consensus, NetworkConfig, NetworkSpec, NodeSpec, SyncMode};
use crate::shared::{is_enode, is_ethereum_address};
use crate::spec::rules::{run_create, run_update, trace_fired};
use crate::spec::{
    ErrorList, Feature, FieldError, Path, Rule, UpdateRule, Validate, gate_logging, one_of,
};
use std::collections::BTreeSet;

impl Consensus {
    pub fn feature(&self) -> Feature {
        match self {
            Consensus::ProofOfWork => Feature::ProofOfWork,
            Consensus::ProofOfAuthority => Feature::ProofOfAuthority,
            Consensus::IstanbulBft => Feature::IstanbulBft,
        }
    }
}

fn spec_path(name: &str) -> Path {
    Path::spec().child(name)
}

const NETWORK_RULES: &[Rule<NetworkSpec>] = &[
    Rule {
        name: "join-excludes-genesis",
        check: |s, errs| {
            if let (Some(join), Some(_)) = (s.network.join, &s.network.genesis) {
                errs.push(FieldError::invalid(
                    &spec_path("join"),
                    join.as_ref(),
                    "must be none if spec.genesis is specified",
                ));
            }
        },
    },
    Rule {
        name: "join-or-genesis",
        check: |s, errs| {
            if s.network.join.is_none() && s.network.genesis.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("genesis"),
                    "",
                    "must be specified if spec.join is none",
                ));
            }
        },
    },
    Rule {
        name: "join-excludes-consensus",
        check: |s, errs| {
            if let (Some(_), Some(consensus)) = (s.network.join, s.network.consensus) {
                errs.push(FieldError::invalid(
                    &spec_path("consensus"),
                    consensus.as_ref(),
                    "must be none while joining a network",
                ));
            }
        },
    },
    Rule {
        name: "join-excludes-id",
        check: |s, errs| {
            if let (Some(_), Some(id)) = (s.network.join, s.network.id) {
                errs.push(FieldError::invalid(
                    &spec_path("id"),
                    id.to_string(),
                    "must be none if spec.join is provided",
                ));
            }
        },
    },
    Rule {
        name: "genesis-requires-id",
        check: |s, errs| {
            if s.network.genesis.is_some() && s.network.id.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("id"),
                    "",
                    "must be specified if spec.join is none",
                ));
            }
        },
    },
    Rule {
        name: "genesis-requires-consensus",
        check: |s, errs| {
            if s.network.genesis.is_some() && s.network.consensus.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("consensus"),
                    "",
                    "must be specified if spec.genesis is provided",
                ));
            }
        },
    },
    Rule {
        name: "consensus-matches-genesis",
        check: |s, errs| {
            let (Some(genesis), Some(consensus)) = (&s.network.genesis, s.network.consensus) else {
                return;
            };
            let blocks = [
                (genesis.clique.is_some(), Consensus::ProofOfAuthority, "clique"),
                (genesis.ibft2.is_some(), Consensus::IstanbulBft, "ibft2"),
                (genesis.ethash.is_some(), Consensus::ProofOfWork, "ethash"),
            ];
            for (present, expected, block) in blocks {
                if present && consensus != expected {
                    errs.push(FieldError::invalid(
                        &spec_path("consensus"),
                        consensus.as_ref(),
                        format!("must be {} if spec.genesis.{} is specified", expected, block),
                    ));
                }
            }
        },
    },
    Rule {
        name: "mainnet-chain-id-reserved",
        check: |s, errs| {
            if let Some(genesis) = &s.network.genesis {
                if genesis.chain_id == MAINNET_CHAIN_ID {
                    errs.push(FieldError::invalid(
                        &spec_path("genesis").child("chainId"),
                        genesis.chain_id.to_string(),
                        "can't use chain id of mainnet network to avoid tx replay",
                    ));
                }
            }
        },
    },
    Rule {
        name: "fork-order",
        check: |s, errs| {
            if let Some(forks) = s.network.genesis.as_ref().and_then(|g| g.forks.as_ref()) {
                forks.validate_order(&spec_path("genesis").child("forks"), errs);
            }
        },
    },
    Rule {
        name: "first-node-bootnode",
        check: |s, errs| {
            if s.nodes.len() > 1 && !s.nodes[0].bootnode {
                errs.push(FieldError::invalid(
                    &spec_path("nodes").index(0).child("bootnode"),
                    false,
                    "first node must be a bootnode if network has multiple nodes",
                ));
            }
        },
    },
    Rule {
        name: "unique-node-names",
        check: |s, errs| {
            let mut seen = BTreeSet::new();
            for (i, node) in s.nodes.iter().enumerate() {
                if !seen.insert(node.name.as_str()) {
                    errs.push(FieldError::duplicate(
                        &spec_path("nodes").index(i).child("name"),
                        &node.name,
                    ));
                }
            }
        },
    },
];

/// A node plus the network it belongs to.
pub struct NodeContext<'a> {
    pub network: &'a NetworkConfig,
    pub node: &'a NodeSpec,
    pub path: Path,
}

struct NodeRule {
    name: &'static str,
    check: fn(&NodeContext<'_>, &mut ErrorList),
}

fn supports(node: &NodeSpec, feature: Feature) -> bool {
    CAPABILITIES.supports(node.client, feature)
}

fn client_error(ctx: &NodeContext<'_>, detail: impl Into<String>) -> FieldError {
    FieldError::invalid(&ctx.path.child("client"), ctx.node.client.as_ref(), detail)
}

const NODE_RULES: &[NodeRule] = &[
    NodeRule {
        name: "bootnode-requires-nodekey",
        check: |ctx, errs| {
            if ctx.node.bootnode && ctx.node.nodekey_secret_name.is_none() {
                errs.push(FieldError::invalid(
                    &ctx.path.child("nodekey"),
                    "",
                    "must provide nodekeySecretName if bootnode is true",
                ));
            }
        },
    },
    NodeRule {
        name: "miner-requires-coinbase",
        check: |ctx, errs| {
            if ctx.node.miner && ctx.node.coinbase.is_none() {
                errs.push(FieldError::invalid(
                    &ctx.path.child("coinbase"),
                    "",
                    "must provide coinbase if miner is true",
                ));
            }
        },
    },
    NodeRule {
        name: "coinbase-requires-miner",
        check: |ctx, errs| {
            if ctx.node.coinbase.is_some() && !ctx.node.miner {
                errs.push(FieldError::invalid(
                    &ctx.path.child("miner"),
                    false,
                    "must set miner to true if coinbase is provided",
                ));
            }
        },
    },
    NodeRule {
        name: "coinbase-format",
        check: |ctx, errs| {
            if let Some(coinbase) = &ctx.node.coinbase {
                if !is_ethereum_address(coinbase) {
                    errs.push(FieldError::invalid(
                        &ctx.path.child("coinbase"),
                        coinbase,
                        "must be a valid ethereum address",
                    ));
                }
            }
        },
    },
    NodeRule {
        name: "consensus-support",
        check: |ctx, errs| {
            if let Some(consensus) = ctx.network.consensus {
                if !supports(ctx.node, consensus.feature()) {
                    errs.push(client_error(
                        ctx,
                        format!("client doesn't support {} consensus", consensus),
                    ));
                }
            }
        },
    },
    NodeRule {
        name: "fixed-difficulty-support",
        check: |ctx, errs| {
            let fixed = ctx
                .network
                .genesis
                .as_ref()
                .and_then(|g| g.ethash.as_ref())
                .and_then(|e| e.fixed_difficulty);
            if fixed.is_some() && !supports(ctx.node, Feature::FixedDifficulty) {
                errs.push(client_error(
                    ctx,
                    "client doesn't support fixed difficulty pow networks",
                ));
            }
        },
    },
    NodeRule {
        name: "mining-support",
        check: |ctx, errs| {
            if ctx.node.miner && !supports(ctx.node, Feature::Mining) {
                errs.push(client_error(ctx, "client doesn't support mining"));
            }
        },
    },
    NodeRule {
        name: "import-support",
        check: |ctx, errs| {
            if ctx.node.import.is_some() && !supports(ctx.node, Feature::ImportAccount) {
                let clients = CAPABILITIES.clients_supporting(Feature::ImportAccount);
                errs.push(client_error(
                    ctx,
                    format!("must be {} if import is provided", one_of(&clients)),
                ));
            }
        },
    },
    NodeRule {
        name: "mining-requires-import",
        check: |ctx, errs| {
            let node = ctx.node;
            // Clients that can import accounts mine only with an imported coinbase.
            if node.miner
                && node.coinbase.is_some()
                && node.import.is_none()
                && supports(node, Feature::Mining)
                && supports(node, Feature::ImportAccount)
            {
                errs.push(FieldError::invalid(
                    &ctx.path.child("import"),
                    "",
                    "must import coinbase account",
                ));
            }
        },
    },
    NodeRule {
        name: "import-excludes-endpoints",
        check: |ctx, errs| {
            if ctx.node.import.is_none() {
                return;
            }
            for (enabled, field) in [
                (ctx.node.rpc, "rpc"),
                (ctx.node.ws, "ws"),
                (ctx.node.graphql, "graphql"),
            ] {
                if enabled {
                    errs.push(FieldError::invalid(
                        &ctx.path.child(field),
                        true,
                        "must be false if import is provided",
                    ));
                }
            }
        },
    },
    NodeRule {
        name: "light-sync-support",
        check: |ctx, errs| {
            if ctx.node.sync_mode == Some(SyncMode::Light)
                && !supports(ctx.node, Feature::LightSync)
            {
                let clients = CAPABILITIES.clients_supporting(Feature::LightSync);
                errs.push(client_error(
                    ctx,
                    format!("must be {} if syncMode is light", one_of(&clients)),
                ));
            }
        },
    },
    NodeRule {
        name: "graphql-support",
        check: |ctx, errs| {
            if ctx.node.graphql && !supports(ctx.node, Feature::GraphQl) {
                errs.push(client_error(ctx, "client doesn't support graphQL"));
            }
        },
    },
    NodeRule {
        name: "geth-graphql-requires-rpc",
        check: |ctx, errs| {
            if ctx.node.client == Client::Geth && ctx.node.graphql && !ctx.node.rpc {
                errs.push(FieldError::invalid(
                    &ctx.path.child("rpc"),
                    false,
                    "must enable rpc if client is geth and graphql is enabled",
                ));
            }
        },
    },
    NodeRule {
        name: "logging-support",
        check: |ctx, errs| {
            gate_logging(
                &CAPABILITIES,
                ctx.node.client,
                ctx.node.logging,
                &ctx.path.child("logging"),
                errs,
            );
        },
    },
    NodeRule {
        name: "bootnode-urls",
        check: |ctx, errs| {
            for (j, url) in ctx.node.bootnodes.iter().enumerate() {
                if !is_enode(url) {
                    errs.push(FieldError::invalid(
                        &ctx.path.child("bootnodes").index(j),
                        url,
                        "must be a valid enode url",
                    ));
                }
            }
        },
    },
    NodeRule {
        name: "resources",
        check: |ctx, errs| {
            errs.append(ctx.node.resources.validate_create(&ctx.path.child("resources")));
        },
    },
];

fn validate_nodes(spec: &NetworkSpec, errors: &mut ErrorList) {
    for (i, node) in spec.nodes.iter().enumerate() {
        let ctx = NodeContext {
            network: &spec.network,
            node,
            path: spec_path("nodes").index(i),
        };
        for rule in NODE_RULES {
            let before = errors.len();
            (rule.check)(&ctx, errors);
            trace_fired(rule.name, errors, before);
        }
    }
}

const UPDATE_RULES: &[UpdateRule<NetworkSpec>] = &[
    UpdateRule {
        name: "join-immutable",
        check: |old, new, errs| {
            if old.network.join != new.network.join {
                let value = new.network.join.map(|j| j.to_string()).unwrap_or_default();
                errs.push(FieldError::immutable(&spec_path("join"), value));
            }
        },
    },
    UpdateRule {
        name: "consensus-immutable",
        check: |old, new, errs| {
            if old.network.consensus != new.network.consensus {
                let value = new
                    .network
                    .consensus
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                errs.push(FieldError::immutable(&spec_path("consensus"), value));
            }
        },
    },
    UpdateRule {
        name: "genesis-immutable",
        check: |old, new, errs| {
            // Compared as one unit; any difference rejects the whole block.
            if old.network.genesis != new.network.genesis {
                errs.push(FieldError::immutable(&spec_path("genesis"), ""));
            }
        },
    },
    UpdateRule {
        name: "id-immutable",
        check: |old, new, errs| {
            if old.network.id != new.network.id {
                let value = new.network.id.map(|id| id.to_string()).unwrap_or_default();
                errs.push(FieldError::immutable(&spec_path("id"), value));
            }
        },
    },
    UpdateRule {
        name: "node-names-immutable",
        check: |old, new, errs| {
            for (i, (prev, node)) in old.nodes.iter().zip(&new.nodes).enumerate() {
                if prev.name != node.name {
                    errs.push(FieldError::immutable(
                        &spec_path("nodes").index(i).child("name"),
                        &node.name,
                    ));
                }
            }
        },
    },
    UpdateRule {
        name: "node-resources",
        check: |old, new, errs| {
            for (i, (prev, node)) in old.nodes.iter().zip(&new.nodes).enumerate() {
                let path = spec_path("nodes").index(i).child("resources");
                errs.append(node.resources.validate_update(&prev.resources, &path));
            }
        },
    },
];

impl Validate for NetworkSpec {
    fn validate_create(&self) -> ErrorList {
        let mut errors = run_create(NETWORK_RULES, self);
        validate_nodes(self, &mut errors);
        errors
    }

    fn validate_update(&self, old: &Self) -> ErrorList {
        let mut errors = self.validate_create();
        errors.append(run_update(UPDATE_RULES, old, self));
        errors
    }
}
