//! Types and helpers shared by every node kind.

pub mod logging;
pub mod resources;

pub use logging::Verbosity;
pub use resources::{ResourceDefaults, Resources, parse_quantity};

use regex::Regex;
use std::sync::LazyLock;

/// Wildcard interface used when an endpoint is enabled without a host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Directory layout under a client's home directory.
pub fn path_data(home: &str) -> String {
    format!("{}/kotal-data", home)
}

pub fn path_config(home: &str) -> String {
    format!("{}/kotal-config", home)
}

pub fn path_secrets(home: &str) -> String {
    format!("{}/.kotal-secrets", home)
}

static ETHEREUM_ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is valid"));

static MULTIADDR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/[a-z0-9-]+/[^/\s]+)+(/p2p/[1-9A-HJ-NP-Za-km-z]+)?$")
        .expect("multiaddr pattern is valid")
});

static ENODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^enode://[0-9a-fA-F]{128}@[^:\s]+:[0-9]{1,5}(\?discport=[0-9]{1,5})?$")
        .expect("enode pattern is valid")
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

pub fn is_ethereum_address(s: &str) -> bool {
    ETHEREUM_ADDRESS_RE.is_match(s)
}

pub fn is_multiaddr(s: &str) -> bool {
    MULTIADDR_RE.is_match(s)
}

pub fn is_enode(s: &str) -> bool {
    ENODE_RE.is_match(s)
}

pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// `--flag=value`, the form some clients require.
pub fn arg_with_val(flag: &str, value: impl std::fmt::Display) -> String {
    format!("{}={}", flag, value)
}
