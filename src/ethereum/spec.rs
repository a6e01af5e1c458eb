//! Ethereum network spec (JSON shape).
//!
//! {
//!   "id": 77777,                       // network id, only with genesis
//!   "join": "rinkeby",                 // OR a self-hosted genesis
//!   "consensus": "poa",
//!   "genesis": { "chainId": 55555, ... },
//!   "nodes": [ { "name": "node-1", "client": "besu", "bootnode": true, ... } ]
//! }

use crate::ethereum::genesis::Genesis;
use crate::shared::{Resources, Verbosity};
use crate::spec::NodeKind;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

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
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Client {
    #[default]
    Besu,
    Geth,
    Parity,
}

client_try_from!(Client, NodeKind::Network);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
pub enum Consensus {
    #[serde(rename = "pow")]
    #[strum(serialize = "pow")]
    ProofOfWork,
    #[serde(rename = "poa")]
    #[strum(serialize = "poa")]
    ProofOfAuthority,
    #[serde(rename = "ibft2")]
    #[strum(serialize = "ibft2")]
    IstanbulBft,
}

/// Public networks a node can join instead of bootstrapping a genesis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PublicNetwork {
    Mainnet,
    Ropsten,
    Rinkeby,
    Goerli,
    Sepolia,
    Classic,
    Mordor,
    Kotti,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SyncMode {
    Fast,
    Full,
    Light,
}

/// JSON-RPC API namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Api {
    Admin,
    Clique,
    Debug,
    Eea,
    Eth,
    Ibft,
    Miner,
    Net,
    Perm,
    Plugins,
    Priv,
    Txpool,
    Web3,
}

/// Externally stored key material for an account the node should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedAccount {
    pub private_key_secret_name: String,
    pub password_secret_name: String,
}

/// Join target or self-hosted genesis, exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<PublicNetwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<Consensus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis: Option<Genesis>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub name: String,

    #[serde(default)]
    pub client: Client,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub bootnode: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodekey_secret_name: Option<String>,

    /// Static enode URLs to discover the network through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bootnodes: Vec<String>,

    #[serde(default)]
    pub miner: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportedAccount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<SyncMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default)]
    pub rpc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,
    #[serde(default, rename = "rpcAPI", skip_serializing_if = "Vec::is_empty")]
    pub rpc_apis: Vec<Api>,

    #[serde(default)]
    pub ws: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_port: Option<u16>,
    #[serde(default, rename = "wsAPI", skip_serializing_if = "Vec::is_empty")]
    pub ws_apis: Vec<Api>,

    #[serde(default)]
    pub graphql: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_port: Option<u16>,

    /// Virtual hosts allowed to reach the enabled endpoints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors_domains: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default)]
    pub resources: Resources,
}

impl NodeSpec {
    pub fn new(name: &str, client: Client) -> Self {
        Self {
            name: name.to_string(),
            client,
            ..Default::default()
        }
    }

    /// Any of RPC, WS or GraphQL exposed.
    pub fn serves_api(&self) -> bool {
        self.rpc || self.ws || self.graphql
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    #[serde(flatten)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_network_json() {
        let spec: NetworkSpec = serde_json::from_str(
            r#"{
                "join": "rinkeby",
                "nodes": [
                    { "name": "node-1", "client": "geth", "rpc": true, "rpcAPI": ["eth", "web3"] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.network.join, Some(PublicNetwork::Rinkeby));
        assert_eq!(spec.nodes[0].client, Client::Geth);
        assert_eq!(spec.nodes[0].rpc_apis, vec![Api::Eth, Api::Web3]);
    }

    #[test]
    fn unknown_client_is_unsupported() {
        let err = serde_json::from_str::<NetworkSpec>(
            r#"{ "join": "rinkeby", "nodes": [ { "name": "n", "client": "nethermind" } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported client \"nethermind\""));

        let err = Client::try_from("erigon".to_string()).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::UnsupportedClient { kind: NodeKind::Network, .. }
        ));
    }
}
