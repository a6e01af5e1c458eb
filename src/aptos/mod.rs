//! Aptos full nodes and validators.

use crate::compile::{ClientCompiler, Compile, CompiledNode, Env, EnvValue};
use crate::config::ImageConfig;
use crate::shared::{
    DEFAULT_HOST, ResourceDefaults, Resources, Verbosity, path_config, path_data,
};
use crate::spec::Feature::Logging;
use crate::spec::rules::{run_create, run_update};
use crate::spec::{
    Defaults, ErrorList, FieldError, NodeKind, Object, Path, Registry, Rule, UpdateRule,
    Validate, gate_logging,
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

pub const IMAGE_ENV: &str = "APTOS_CORE_IMAGE";
pub const DEFAULT_IMAGE: &str = "aptoslabs/validator:testnet_8e3ad2fc";
pub const HOME_DIR: &str = "/opt/aptos";

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case", try_from = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum Client {
    #[default]
    AptosCore,
}

client_try_from!(Client, NodeKind::AptosNode);

pub static CAPABILITIES: Registry<Client> = Registry::new(&[(
    Client::AptosCore,
    &[
        Logging(Verbosity::Error),
        Logging(Verbosity::Warn),
        Logging(Verbosity::Info),
        Logging(Verbosity::Debug),
        Logging(Verbosity::Trace),
    ],
)]);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub client: Client,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub network: Network,

    /// Validator mode; a full node otherwise.
    #[serde(default)]
    pub validator: bool,

    /// Off-chain checkpoint verifying the sync after restart or epoch change.
    #[serde(default)]
    pub waypoint: String,

    /// Config map holding the genesis blob.
    #[serde(default)]
    pub genesis_configmap_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_private_key_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<String>,

    #[serde(default)]
    pub api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default)]
    pub resources: Resources,
}

pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_P2P_PORT: u16 = 6180;
pub const DEFAULT_LOGGING: Verbosity = Verbosity::Info;

pub const DEFAULT_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "8Gi",
    memory_limit: "16Gi",
    storage: "250Gi",
};

impl Defaults for NodeSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        if self.image.is_none() {
            self.image = Some(images.resolve(None, IMAGE_ENV, DEFAULT_IMAGE));
        }

        if self.api {
            self.api_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.api_port.get_or_insert(DEFAULT_API_PORT);
        }

        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);
        self.logging.get_or_insert(DEFAULT_LOGGING);
        self.resources.apply_defaults(&DEFAULT_RESOURCES);
    }
}

fn spec_path(name: &str) -> Path {
    Path::spec().child(name)
}

const RULES: &[Rule<NodeSpec>] = &[
    Rule {
        name: "waypoint-required",
        check: |s, errs| {
            if s.waypoint.is_empty() {
                errs.push(FieldError::required(&spec_path("waypoint"), ""));
            }
        },
    },
    Rule {
        name: "genesis-configmap-required",
        check: |s, errs| {
            if s.genesis_configmap_name.is_empty() {
                errs.push(FieldError::required(&spec_path("genesisConfigmapName"), ""));
            }
        },
    },
    Rule {
        name: "peer-id-requires-key",
        check: |s, errs| {
            if s.peer_id.is_some() && s.node_private_key_secret_name.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("nodePrivateKeySecretName"),
                    "",
                    "must provide nodePrivateKeySecretName if peerId is provided",
                ));
            }
        },
    },
    Rule {
        name: "key-requires-peer-id",
        check: |s, errs| {
            if s.node_private_key_secret_name.is_some() && s.peer_id.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("peerId"),
                    "",
                    "must provide peerId if nodePrivateKeySecretName is provided",
                ));
            }
        },
    },
    Rule {
        name: "logging-support",
        check: |s, errs| {
            gate_logging(&CAPABILITIES, s.client, s.logging, &spec_path("logging"), errs);
        },
    },
    Rule {
        name: "resources",
        check: |s, errs| errs.append(s.resources.validate_create(&spec_path("resources"))),
    },
];

const UPDATE_RULES: &[UpdateRule<NodeSpec>] = &[
    UpdateRule {
        name: "network-immutable",
        check: |old, new, errs| {
            if old.network != new.network {
                errs.push(FieldError::immutable(&spec_path("network"), new.network.as_ref()));
            }
        },
    },
    UpdateRule {
        name: "resources",
        check: |old, new, errs| {
            errs.append(new.resources.validate_update(&old.resources, &spec_path("resources")));
        },
    },
];

impl Validate for NodeSpec {
    fn validate_create(&self) -> ErrorList {
        run_create(RULES, self)
    }

    fn validate_update(&self, old: &Self) -> ErrorList {
        let mut errors = self.validate_create();
        errors.append(run_update(UPDATE_RULES, old, self));
        errors
    }
}

pub const BINARY: &str = "aptos-node";
pub const CONFIG: &str = "--config";
pub const NODE_PRIVATE_KEY_KEY: &str = "key";

pub const ENV_ROLE: &str = "APTOS_NODE_ROLE";
pub const ENV_NETWORK: &str = "APTOS_NETWORK";
pub const ENV_DATA_DIR: &str = "APTOS_DATA_DIR";
pub const ENV_WAYPOINT: &str = "APTOS_WAYPOINT";
pub const ENV_GENESIS_PATH: &str = "APTOS_GENESIS_PATH";
pub const ENV_API_ADDRESS: &str = "APTOS_API_ADDRESS";
pub const ENV_P2P_PORT: &str = "APTOS_P2P_PORT";
pub const ENV_PEER_ID: &str = "APTOS_PEER_ID";
pub const ENV_NODE_PRIVATE_KEY: &str = "APTOS_NODE_PRIVATE_KEY";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";

/// Aptos reads a generated `config.yaml`; the values it is rendered from go
/// through the environment of the config init step.
pub struct AptosCoreClient<'a> {
    pub node: &'a NodeSpec,
}

fn role(node: &NodeSpec) -> &'static str {
    if node.validator { "validator" } else { "full_node" }
}

impl ClientCompiler for AptosCoreClient<'_> {
    fn image(&self) -> String {
        self.node
            .image
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string())
    }

    fn command(&self) -> Vec<String> {
        vec![BINARY.to_string()]
    }

    fn args(&self) -> Vec<String> {
        vec![
            CONFIG.to_string(),
            format!("{}/config.yaml", path_config(HOME_DIR)),
        ]
    }

    fn env(&self) -> Env {
        let node = self.node;
        let mut env = Env::from([
            (ENV_ROLE.to_string(), EnvValue::literal(role(node))),
            (ENV_NETWORK.to_string(), EnvValue::literal(node.network.as_ref())),
            (ENV_DATA_DIR.to_string(), EnvValue::literal(path_data(HOME_DIR))),
            (ENV_WAYPOINT.to_string(), EnvValue::literal(&node.waypoint)),
            (
                ENV_GENESIS_PATH.to_string(),
                EnvValue::literal(format!("{}/genesis.blob", path_config(HOME_DIR))),
            ),
        ]);

        if node.api {
            if let (Some(host), Some(port)) = (&node.api_host, node.api_port) {
                env.insert(
                    ENV_API_ADDRESS.to_string(),
                    EnvValue::literal(format!("{}:{}", host, port)),
                );
            }
        }

        if let Some(port) = node.p2p_port {
            env.insert(ENV_P2P_PORT.to_string(), EnvValue::literal(port.to_string()));
        }

        if let (Some(peer_id), Some(key)) = (&node.peer_id, &node.node_private_key_secret_name) {
            env.insert(ENV_PEER_ID.to_string(), EnvValue::literal(peer_id));
            env.insert(
                ENV_NODE_PRIVATE_KEY.to_string(),
                EnvValue::secret(key, NODE_PRIVATE_KEY_KEY),
            );
        }

        if let Some(level) = node.logging {
            env.insert(ENV_LOG_LEVEL.to_string(), EnvValue::literal(level.as_ref()));
        }

        env
    }

    fn home_dir(&self) -> &'static str {
        HOME_DIR
    }
}

pub fn new_client(node: &NodeSpec) -> Box<dyn ClientCompiler + '_> {
    debug!(client = %node.client, "selected aptos compiler");
    match node.client {
        Client::AptosCore => Box::new(AptosCoreClient { node }),
    }
}

impl Compile for Object<NodeSpec> {
    fn compile(&self) -> Vec<CompiledNode> {
        let command = new_client(&self.spec).compile();
        vec![CompiledNode::new(
            &self.name,
            NodeKind::AptosNode,
            self.spec.client.as_ref(),
            role(&self.spec),
            command,
            self.spec.resources.clone(),
        )]
    }
}
