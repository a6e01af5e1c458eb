//! Beacon node and validator client rules.

use crate::ethereum2::spec::{BeaconNodeSpec, Client, ValidatorSpec};
use crate::ethereum2::{BEACON_CAPABILITIES, VALIDATOR_CAPABILITIES};
use crate::shared::is_ethereum_address;
use crate::spec::rules::{run_create, run_update};
use crate::spec::{
    BadValue, ErrorList, Feature, FieldError, Path, Rule, UpdateRule, Validate, gate_logging,
};
use url::Url;

fn spec_path(name: &str) -> Path {
    Path::spec().child(name)
}

fn unsupported(field: &str, value: impl Into<BadValue>, client: Client) -> FieldError {
    FieldError::invalid(
        &spec_path(field),
        value,
        format!("not supported by client {}", client),
    )
}

fn check_url(field: &str, value: &str, errs: &mut ErrorList) {
    if Url::parse(value).is_err() {
        errs.push(FieldError::invalid(&spec_path(field), value, "must be a valid url"));
    }
}

const BEACON_NODE_RULES: &[Rule<BeaconNodeSpec>] = &[
    Rule {
        name: "network-required",
        check: |s, errs| {
            if s.network.is_empty() {
                errs.push(FieldError::required(&spec_path("network"), ""));
            }
        },
    },
    Rule {
        name: "execution-engine-endpoint",
        check: |s, errs| match &s.execution_engine_endpoint {
            None => errs.push(FieldError::required(&spec_path("executionEngineEndpoint"), "")),
            Some(endpoint) => check_url("executionEngineEndpoint", endpoint, errs),
        },
    },
    Rule {
        name: "jwt-secret-required",
        check: |s, errs| {
            if s.jwt_secret_name.is_none() {
                errs.push(FieldError::required(&spec_path("jwtSecretName"), ""));
            }
        },
    },
    Rule {
        name: "rest-support",
        check: |s, errs| {
            if s.rest && !BEACON_CAPABILITIES.supports(s.client, Feature::Rest) {
                errs.push(unsupported("rest", true, s.client));
            }
        },
    },
    Rule {
        name: "rpc-support",
        check: |s, errs| {
            if s.rpc && !BEACON_CAPABILITIES.supports(s.client, Feature::Rpc) {
                errs.push(unsupported("rpc", true, s.client));
            }
        },
    },
    Rule {
        name: "grpc-support",
        check: |s, errs| {
            if s.grpc && !BEACON_CAPABILITIES.supports(s.client, Feature::Grpc) {
                errs.push(unsupported("grpc", true, s.client));
            }
        },
    },
    Rule {
        name: "tls-support",
        check: |s, errs| {
            if let Some(cert) = &s.cert_secret_name {
                if !BEACON_CAPABILITIES.supports(s.client, Feature::Tls) {
                    errs.push(unsupported("certSecretName", cert, s.client));
                }
            }
        },
    },
    Rule {
        name: "checkpoint-sync",
        check: |s, errs| {
            let Some(url) = &s.checkpoint_sync_url else {
                return;
            };
            if !BEACON_CAPABILITIES.supports(s.client, Feature::CheckpointSync) {
                errs.push(unsupported("checkpointSyncUrl", url, s.client));
            } else {
                check_url("checkpointSyncUrl", url, errs);
            }
        },
    },
    Rule {
        name: "logging-support",
        check: |s, errs| {
            gate_logging(&BEACON_CAPABILITIES, s.client, s.logging, &spec_path("logging"), errs);
        },
    },
    Rule {
        name: "resources",
        check: |s, errs| errs.append(s.resources.validate_create(&spec_path("resources"))),
    },
];

const BEACON_NODE_UPDATE_RULES: &[UpdateRule<BeaconNodeSpec>] = &[
    UpdateRule {
        name: "network-immutable",
        check: |old, new, errs| {
            if old.network != new.network {
                errs.push(FieldError::immutable(&spec_path("network"), &new.network));
            }
        },
    },
    UpdateRule {
        name: "client-immutable",
        check: |old, new, errs| {
            if old.client != new.client {
                errs.push(FieldError::immutable(&spec_path("client"), new.client.as_ref()));
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

impl Validate for BeaconNodeSpec {
    fn validate_create(&self) -> ErrorList {
        run_create(BEACON_NODE_RULES, self)
    }

    fn validate_update(&self, old: &Self) -> ErrorList {
        let mut errors = self.validate_create();
        errors.append(run_update(BEACON_NODE_UPDATE_RULES, old, self));
        errors
    }
}

const VALIDATOR_RULES: &[Rule<ValidatorSpec>] = &[
    Rule {
        name: "network-required",
        check: |s, errs| {
            if s.network.is_empty() {
                errs.push(FieldError::required(&spec_path("network"), ""));
            }
        },
    },
    Rule {
        name: "beacon-endpoints-required",
        check: |s, errs| {
            if s.beacon_endpoints.is_empty() {
                errs.push(FieldError::required(&spec_path("beaconEndpoints"), ""));
            }
        },
    },
    Rule {
        name: "beacon-endpoints-format",
        check: |s, errs| {
            for (i, endpoint) in s.beacon_endpoints.iter().enumerate() {
                if Url::parse(endpoint).is_err() {
                    errs.push(FieldError::invalid(
                        &spec_path("beaconEndpoints").index(i),
                        endpoint,
                        "must be a valid url",
                    ));
                }
            }
        },
    },
    Rule {
        name: "multiple-beacon-endpoints",
        check: |s, errs| {
            if s.beacon_endpoints.len() > 1
                && !VALIDATOR_CAPABILITIES.supports(s.client, Feature::MultipleBeaconEndpoints)
            {
                errs.push(FieldError::invalid(
                    &spec_path("beaconEndpoints"),
                    s.beacon_endpoints.join(","),
                    format!("multiple beacon node endpoints not supported by client {}", s.client),
                ));
            }
        },
    },
    Rule {
        name: "prysm-wallet-password",
        check: |s, errs| {
            if s.client == Client::Prysm && s.wallet_password_secret.is_none() {
                errs.push(FieldError::invalid(
                    &spec_path("walletPasswordSecret"),
                    "",
                    "must provide walletPasswordSecret if client is prysm",
                ));
            }
        },
    },
    Rule {
        name: "tls-support",
        check: |s, errs| {
            if let Some(cert) = &s.cert_secret_name {
                if !VALIDATOR_CAPABILITIES.supports(s.client, Feature::Tls) {
                    errs.push(unsupported("certSecretName", cert, s.client));
                }
            }
        },
    },
    Rule {
        name: "fee-recipient-format",
        check: |s, errs| {
            if let Some(recipient) = &s.fee_recipient {
                if !is_ethereum_address(recipient) {
                    errs.push(FieldError::invalid(
                        &spec_path("feeRecipient"),
                        recipient,
                        "must be a valid ethereum address",
                    ));
                }
            }
        },
    },
    Rule {
        name: "logging-support",
        check: |s, errs| {
            gate_logging(
                &VALIDATOR_CAPABILITIES,
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

const VALIDATOR_UPDATE_RULES: &[UpdateRule<ValidatorSpec>] = &[
    UpdateRule {
        name: "network-immutable",
        check: |old, new, errs| {
            if old.network != new.network {
                errs.push(FieldError::immutable(&spec_path("network"), &new.network));
            }
        },
    },
    UpdateRule {
        name: "client-immutable",
        check: |old, new, errs| {
            if old.client != new.client {
                errs.push(FieldError::immutable(&spec_path("client"), new.client.as_ref()));
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

impl Validate for ValidatorSpec {
    fn validate_create(&self) -> ErrorList {
        run_create(VALIDATOR_RULES, self)
    }

    fn validate_update(&self, old: &Self) -> ErrorList {
        let mut errors = self.validate_create();
        errors.append(run_update(VALIDATOR_UPDATE_RULES, old, self));
        errors
    }
}
