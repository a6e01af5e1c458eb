//! Ethereum 2.0 beacon node and validator client specs.

use crate::shared::{Resources, Verbosity};
use crate::spec::NodeKind;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use url::Url;

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Client {
    #[default]
    Teku,
    Prysm,
    Lighthouse,
    Nimbus,
}

// Beacon nodes and validators share one client set; an unknown name is
// reported against the kind being decoded.
fn client_of<'de, D: Deserializer<'de>>(kind: NodeKind, d: D) -> Result<Client, D::Error> {
    let client = String::deserialize(d)?;
    client
        .parse()
        .map_err(|_| D::Error::custom(crate::Error::UnsupportedClient { kind, client }))
}

fn beacon_node_client<'de, D: Deserializer<'de>>(d: D) -> Result<Client, D::Error> {
    client_of(NodeKind::BeaconNode, d)
}

fn validator_client<'de, D: Deserializer<'de>>(d: D) -> Result<Client, D::Error> {
    client_of(NodeKind::Validator, d)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconNodeSpec {
    #[serde(default, deserialize_with = "beacon_node_client")]
    pub client: Client,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Public network name, e.g. mainnet, prater, sepolia.
    pub network: String,

    /// Engine API endpoint of the paired execution client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_engine_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_sync_url: Option<String>,

    #[serde(default)]
    pub rest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_port: Option<u16>,

    #[serde(default)]
    pub rpc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    #[serde(default)]
    pub grpc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    /// TLS certificate and key for the RPC/gRPC endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors_domains: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default)]
    pub resources: Resources,
}

impl BeaconNodeSpec {
    pub fn new(client: Client, network: &str) -> Self {
        Self {
            client,
            network: network.to_string(),
            ..Default::default()
        }
    }

    pub fn serves_api(&self) -> bool {
        self.rest || self.rpc || self.grpc
    }
}

/// A validator keystore and the secret holding it with its password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keystore {
    pub secret_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSpec {
    #[serde(default, deserialize_with = "validator_client")]
    pub client: Client,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub network: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beacon_endpoints: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graffiti: Option<String>,

    /// Address receiving priority fees of proposed blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_recipient: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keystores: Vec<Keystore>,

    /// Prysm wallet password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_password_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default)]
    pub resources: Resources,
}

impl ValidatorSpec {
    pub fn new(client: Client, network: &str) -> Self {
        Self {
            client,
            network: network.to_string(),
            ..Default::default()
        }
    }

    /// Beacon endpoints that parse as URLs, in declaration order.
    pub fn beacon_urls(&self) -> Vec<Url> {
        self.beacon_endpoints
            .iter()
            .filter_map(|endpoint| Url::parse(endpoint).ok())
            .collect()
    }
}
