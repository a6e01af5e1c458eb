//! Ethereum network defaulting.

use crate::config::ImageConfig;
use crate::ethereum::clients;
use crate::ethereum::spec::{Api, NetworkSpec, NodeSpec, SyncMode};
use crate::shared::{DEFAULT_HOST, ResourceDefaults, Verbosity};
use crate::spec::Defaults;

pub const DEFAULT_P2P_PORT: u16 = 30303;
pub const DEFAULT_RPC_PORT: u16 = 8545;
pub const DEFAULT_WS_PORT: u16 = 8546;
pub const DEFAULT_GRAPHQL_PORT: u16 = 8547;
pub const DEFAULT_LOGGING: Verbosity = Verbosity::Info;
pub const DEFAULT_SYNC_MODE: SyncMode = SyncMode::Fast;
pub const DEFAULT_APIS: &[Api] = &[Api::Web3, Api::Eth, Api::Net];
pub const DEFAULT_ORIGINS: &str = "*";

pub const DEFAULT_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "2",
    cpu_limit: "3",
    memory: "4Gi",
    memory_limit: "6Gi",
    storage: "100Gi",
};

impl Defaults for NodeSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        if self.image.is_none() {
            let (key, default) = clients::image_defaults(self.client);
            self.image = Some(images.resolve(None, key, default));
        }

        self.logging.get_or_insert(DEFAULT_LOGGING);
        self.sync_mode.get_or_insert(DEFAULT_SYNC_MODE);
        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);

        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(DEFAULT_RPC_PORT);
            if self.rpc_apis.is_empty() {
                self.rpc_apis = DEFAULT_APIS.to_vec();
            }
        }

        if self.ws {
            self.ws_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.ws_port.get_or_insert(DEFAULT_WS_PORT);
            if self.ws_apis.is_empty() {
                self.ws_apis = DEFAULT_APIS.to_vec();
            }
        }

        if self.graphql {
            self.graphql_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.graphql_port.get_or_insert(DEFAULT_GRAPHQL_PORT);
        }

        if self.serves_api() {
            if self.hosts.is_empty() {
                self.hosts = vec![DEFAULT_ORIGINS.to_string()];
            }
            if self.cors_domains.is_empty() {
                self.cors_domains = vec![DEFAULT_ORIGINS.to_string()];
            }
        }

        self.resources.apply_defaults(&DEFAULT_RESOURCES);
    }
}

impl Defaults for NetworkSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        let consensus = self.network.consensus;
        if let Some(genesis) = &mut self.network.genesis {
            genesis.apply_defaults(consensus);
        }

        for node in &mut self.nodes {
            node.apply_defaults(images);
        }
    }
}
