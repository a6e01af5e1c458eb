//! IPFS cluster peer spec, defaults and rules.

use crate::config::ImageConfig;
use crate::ipfs::CLUSTER_PEER_CAPABILITIES;
use crate::ipfs::cluster_service;
use crate::shared::{ResourceDefaults, Resources, Verbosity, is_multiaddr};
use crate::spec::rules::{run_create, run_update};
use crate::spec::{
    Defaults, ErrorList, FieldError, NodeKind, Path, Rule, UpdateRule, Validate, gate_logging,
};
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
#[serde(rename_all = "kebab-case", try_from = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum ClusterPeerClient {
    #[default]
    IpfsClusterService,
}

client_try_from!(ClusterPeerClient, NodeKind::ClusterPeer);

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
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClusterConsensus {
    #[default]
    Crdt,
    Raft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPeerSpec {
    #[serde(default)]
    pub client: ClusterPeerClient,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub consensus: ClusterConsensus,

    /// Multiaddress of the IPFS peer this cluster peer pins to.
    #[serde(default)]
    pub peer_endpoint: String,

    /// Shared cluster secret, key `secret`.
    #[serde(default)]
    pub cluster_secret_name: String,

    /// Cluster peer identity; comes with its private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privatekey_secret_name: Option<String>,

    /// Peers allowed to modify the pinset. CRDT only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trusted_peers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bootstrap_peers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default)]
    pub resources: Resources,
}

pub const DEFAULT_LOGGING: Verbosity = Verbosity::Info;
/// Trust every peer unless told otherwise.
pub const DEFAULT_TRUSTED_PEER: &str = "*";

pub const DEFAULT_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "1",
    cpu_limit: "1",
    memory: "1Gi",
    memory_limit: "2Gi",
    storage: "5Gi",
};

impl Defaults for ClusterPeerSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        if self.image.is_none() {
            self.image = Some(images.resolve(
                None,
                cluster_service::IMAGE_ENV,
                cluster_service::DEFAULT_IMAGE,
            ));
        }

        if self.consensus == ClusterConsensus::Crdt && self.trusted_peers.is_empty() {
            self.trusted_peers = vec![DEFAULT_TRUSTED_PEER.to_string()];
        }

        self.logging.get_or_insert(DEFAULT_LOGGING);
        self.resources.apply_defaults(&DEFAULT_RESOURCES);
    }
}

fn spec_path(name: &str) -> Path {
    Path::spec().child(name)
}

const RULES: &[Rule<ClusterPeerSpec>] = &[
    Rule {
        name: "peer-endpoint",
        check: |s, errs| {
            let path = spec_path("peerEndpoint");
            if s.peer_endpoint.is_empty() {
                errs.push(FieldError::required(&path, ""));
            } else if !is_multiaddr(&s.peer_endpoint) {
                errs.push(FieldError::invalid(
                    &path,
                    &s.peer_endpoint,
                    "must be a valid multiaddress",
                ));
            }
        },
    },
    Rule {
        name: "cluster-secret-required",
        check: |s, errs| {
            if s.cluster_secret_name.is_empty() {
                errs.push(FieldError::required(&spec_path("clusterSecretName"), ""));
            }
        },
    },
    Rule {
        name: "id-requires-privatekey",
        check: |s, errs| {
            if s.id.is_some() && s.privatekey_secret_name.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("privatekeySecretName"),
                    "",
                    "must be provided if id is provided",
                ));
            }
        },
    },
    Rule {
        name: "privatekey-requires-id",
        check: |s, errs| {
            if s.privatekey_secret_name.is_some() && s.id.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("id"),
                    "",
                    "must be provided if privatekeySecretName is provided",
                ));
            }
        },
    },
    Rule {
        name: "trusted-peers-crdt-only",
        check: |s, errs| {
            if s.consensus != ClusterConsensus::Crdt && !s.trusted_peers.is_empty() {
                errs.push(FieldError::invalid(
                    &spec_path("trustedPeers"),
                    s.trusted_peers.join(","),
                    "must be none if consensus is not crdt",
                ));
            }
        },
    },
    Rule {
        name: "bootstrap-peers-format",
        check: |s, errs| {
            for (i, peer) in s.bootstrap_peers.iter().enumerate() {
                if !is_multiaddr(peer) {
                    errs.push(FieldError::invalid(
                        &spec_path("bootstrapPeers").index(i),
                        peer,
                        "must be a valid multiaddress",
                    ));
                }
            }
        },
    },
    Rule {
        name: "logging-support",
        check: |s, errs| {
            gate_logging(
                &CLUSTER_PEER_CAPABILITIES,
                s.client,
                s.logging,
                &spec_path("logging"),
                errs,
            );
        },
    },
    Rule {
        name: "resources",
        check: |s, errs| errs.append(s.resources.validate_create(&spec_path("resources"))),
    },
];

const UPDATE_RULES: &[UpdateRule<ClusterPeerSpec>] = &[
    UpdateRule {
        name: "consensus-immutable",
        check: |old, new, errs| {
            if old.consensus != new.consensus {
                errs.push(FieldError::immutable(
                    &spec_path("consensus"),
                    new.consensus.as_ref(),
                ));
            }
        },
    },
    UpdateRule {
        name: "id-immutable",
        check: |old, new, errs| {
            if old.id != new.id {
                errs.push(FieldError::immutable(
                    &spec_path("id"),
                    new.id.clone().unwrap_or_default(),
                ));
            }
        },
    },
    UpdateRule {
        name: "privatekey-immutable",
        check: |old, new, errs| {
            if old.privatekey_secret_name != new.privatekey_secret_name {
                errs.push(FieldError::immutable(
                    &spec_path("privatekeySecretName"),
                    new.privatekey_secret_name.clone().unwrap_or_default(),
                ));
            }
        },
    },
    UpdateRule {
        name: "cluster-secret-immutable",
        check: |old, new, errs| {
            if old.cluster_secret_name != new.cluster_secret_name {
                errs.push(FieldError::immutable(
                    &spec_path("clusterSecretName"),
                    &new.cluster_secret_name,
                ));
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

impl Validate for ClusterPeerSpec {
    fn validate_create(&self) -> ErrorList {
        run_create(RULES, self)
    }

    fn validate_update(&self, old: &Self) -> ErrorList {
        let mut errors = self.validate_create();
        errors.append(run_update(UPDATE_RULES, old, self));
        errors
    }
}
