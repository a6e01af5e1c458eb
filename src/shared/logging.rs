//! Logging verbosity shared by every client.
//!
//! The set is the union of what the supported clients accept; whether a level is
//! legal for a given client is decided by that kind's Capability Registry.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum Verbosity {
    Off,
    None,
    Fatal,
    Panic,
    Crit,
    Error,
    Warn,
    Notice,
    Info,
    Debug,
    Trace,
    All,
}

impl Verbosity {
    pub fn upper(&self) -> String {
        self.as_ref().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names() {
        assert_eq!(Verbosity::Warn.as_ref(), "warn");
        assert_eq!(Verbosity::Error.upper(), "ERROR");
        assert_eq!("crit".parse::<Verbosity>().ok(), Some(Verbosity::Crit));
        assert_eq!(
            serde_json::to_string(&Verbosity::All).ok().as_deref(),
            Some(r#""all""#)
        );
    }
}
