//! IPFS peer spec, defaults and rules.

use crate::config::ImageConfig;
use crate::ipfs::PEER_CAPABILITIES;
use crate::ipfs::go_ipfs;
use crate::shared::{DEFAULT_HOST, ResourceDefaults, Resources, Verbosity};
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
pub enum PeerClient {
    #[default]
    GoIpfs,
}

client_try_from!(PeerClient, NodeKind::Peer);

/// Configuration profiles understood by `ipfs init --profile` and `ipfs config profile apply`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Profile {
    Server,
    Randomports,
    DefaultDatastore,
    LocalDiscovery,
    Test,
    DefaultNetworking,
    Flatfs,
    Badgerds,
    Lowpower,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Routing {
    None,
    Dht,
    Dhtclient,
    Dhtserver,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSpec {
    #[serde(default)]
    pub client: PeerClient,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Applied once when the repo is initialized.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_profiles: Vec<Profile>,

    /// Applied on every start.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Routing>,

    /// Private swarm key; joins a private network when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swarm_key_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default)]
    pub resources: Resources,
}

pub const DEFAULT_API_PORT: u16 = 5001;
pub const DEFAULT_GATEWAY_PORT: u16 = 8080;
pub const DEFAULT_ROUTING: Routing = Routing::Dht;
pub const DEFAULT_LOGGING: Verbosity = Verbosity::Info;
pub const DEFAULT_INIT_PROFILES: &[Profile] = &[Profile::DefaultDatastore];

pub const DEFAULT_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "1",
    cpu_limit: "1",
    memory: "2Gi",
    memory_limit: "4Gi",
    storage: "10Gi",
};

impl Defaults for PeerSpec {
    fn apply_defaults(&mut self, images: &ImageConfig) {
        if self.image.is_none() {
            self.image = Some(images.resolve(None, go_ipfs::IMAGE_ENV, go_ipfs::DEFAULT_IMAGE));
        }

        if self.init_profiles.is_empty() {
            self.init_profiles = DEFAULT_INIT_PROFILES.to_vec();
        }

        self.api_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.api_port.get_or_insert(DEFAULT_API_PORT);
        self.gateway_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.gateway_port.get_or_insert(DEFAULT_GATEWAY_PORT);
        self.routing.get_or_insert(DEFAULT_ROUTING);
        self.logging.get_or_insert(DEFAULT_LOGGING);
        self.resources.apply_defaults(&DEFAULT_RESOURCES);
    }
}

fn spec_path(name: &str) -> Path {
    Path::spec().child(name)
}

const RULES: &[Rule<PeerSpec>] = &[
    Rule {
        name: "logging-support",
        check: |s, errs| {
            gate_logging(&PEER_CAPABILITIES, s.client, s.logging, &spec_path("logging"), errs);
        },
    },
    Rule {
        name: "resources",
        check: |s, errs| errs.append(s.resources.validate_create(&spec_path("resources"))),
    },
];

fn profile_list(profiles: &[Profile]) -> String {
    let names: Vec<&str> = profiles.iter().map(AsRef::as_ref).collect();
    names.join(",")
}

const UPDATE_RULES: &[UpdateRule<PeerSpec>] = &[
    UpdateRule {
        name: "init-profiles-immutable",
        check: |old, new, errs| {
            if old.init_profiles != new.init_profiles {
                errs.push(FieldError::immutable(
                    &spec_path("initProfiles"),
                    profile_list(&new.init_profiles),
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

impl Validate for PeerSpec {
    fn validate_create(&self) -> ErrorList {
        run_create(RULES, self)
    }

    fn validate_update(&self, old: &Self) -> ErrorList {
        let mut errors = self.validate_create();
        errors.append(run_update(UPDATE_RULES, old, self));
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaulted(spec: PeerSpec) -> PeerSpec {
        let mut spec = spec;
        spec.apply_defaults(&ImageConfig::new());
        spec
    }

    #[test]
    fn defaults() {
        let spec = defaulted(PeerSpec::default());
        assert_eq!(spec.image.as_deref(), Some(go_ipfs::DEFAULT_IMAGE));
        assert_eq!(spec.api_host.as_deref(), Some("0.0.0.0"));
        assert_eq!(spec.api_port, Some(5001));
        assert_eq!(spec.gateway_port, Some(8080));
        assert_eq!(spec.routing, Some(Routing::Dht));
        assert_eq!(spec.init_profiles, vec![Profile::DefaultDatastore]);

        let again = defaulted(spec.clone());
        assert_eq!(again, spec);
    }

    #[test]
    fn decodes_kebab_case_profiles() {
        let spec: PeerSpec = serde_json::from_str(
            r#"{ "client": "go-ipfs", "initProfiles": ["server", "default-networking"], "routing": "dhtclient" }"#,
        )
        .unwrap();
        assert_eq!(spec.init_profiles, vec![Profile::Server, Profile::DefaultNetworking]);
        assert_eq!(spec.routing, Some(Routing::Dhtclient));

        let err = serde_json::from_str::<PeerSpec>(r#"{ "client": "js-ipfs" }"#).unwrap_err();
        assert!(err.to_string().contains("js-ipfs"), "{}", err);
    }

    #[test]
    fn unsupported_logging_level() {
        let spec = defaulted(PeerSpec {
            logging: Some(Verbosity::Trace),
            ..Default::default()
        });
        assert_eq!(
            spec.validate_create().as_slice(),
            &[FieldError::invalid(
                &spec_path("logging"),
                "trace",
                "not supported by client go-ipfs"
            )]
        );
    }

    #[test]
    fn init_profiles_are_immutable() {
        let old = defaulted(PeerSpec {
            init_profiles: vec![Profile::Server],
            ..Default::default()
        });
        let new = PeerSpec {
            init_profiles: vec![Profile::Server, Profile::Flatfs],
            ..old.clone()
        };
        assert_eq!(
            new.validate_update(&old).as_slice(),
            &[FieldError::immutable(&spec_path("initProfiles"), "server,flatfs")]
        );

        // Runtime profiles may change freely.
        let new = PeerSpec {
            profiles: vec![Profile::Lowpower],
            ..old.clone()
        };
        assert!(new.validate_update(&old).is_empty());
    }
}
