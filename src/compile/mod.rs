//! Compiled process descriptions handed to the orchestration backend.
//!
//! Every client compiler maps a defaulted, validated spec into the same shape:
//! image, command, args, env and home directory. Compilers are pure; they never
//! validate and never inline secret material (secrets travel as references).

use crate::shared::Resources;
use crate::spec::NodeKind;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvValue {
    Literal(String),
    SecretRef { name: String, key: String },
}

impl EnvValue {
    pub fn literal(v: impl Into<String>) -> Self {
        EnvValue::Literal(v.into())
    }

    pub fn secret(name: &str, key: &str) -> Self {
        EnvValue::SecretRef {
            name: name.to_string(),
            key: key.to_string(),
        }
    }
}

pub type Env = BTreeMap<String, EnvValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledCommand {
    pub image: String,
    /// Empty means "use the image entrypoint".
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub env: Env,
    pub home_dir: String,
}

/// Uniform contract implemented by one compiler per (node kind, client).
pub trait ClientCompiler {
    fn image(&self) -> String;
    fn command(&self) -> Vec<String>;
    fn args(&self) -> Vec<String>;
    fn env(&self) -> Env;
    fn home_dir(&self) -> &'static str;

    fn compile(&self) -> CompiledCommand {
        CompiledCommand {
            image: self.image(),
            command: self.command(),
            args: self.args(),
            env: self.env(),
            home_dir: self.home_dir().to_string(),
        }
    }
}

pub const LABEL_NAME: &str = "app.kubernetes.io/name";
pub const LABEL_INSTANCE: &str = "app.kubernetes.io/instance";
pub const LABEL_COMPONENT: &str = "app.kubernetes.io/component";
pub const LABEL_PROTOCOL: &str = "kotal.io/protocol";
pub const LABEL_CLIENT: &str = "kotal.io/client";

/// One runnable unit plus what the backend needs to schedule it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledNode {
    pub name: String,
    pub kind: NodeKind,
    pub client: String,
    pub command: CompiledCommand,
    pub resources: Resources,
    pub labels: BTreeMap<String, String>,
}

impl CompiledNode {
    pub fn new(
        name: &str,
        kind: NodeKind,
        client: &str,
        role: &str,
        command: CompiledCommand,
        resources: Resources,
    ) -> Self {
        debug!(%kind, name, client, role, image = %command.image, "compiled node");

        let labels = BTreeMap::from([
            (LABEL_NAME.to_string(), kind.to_string().to_lowercase()),
            (LABEL_INSTANCE.to_string(), name.to_string()),
            (LABEL_COMPONENT.to_string(), role.to_string()),
            (LABEL_PROTOCOL.to_string(), kind.protocol().to_string()),
            (LABEL_CLIENT.to_string(), client.to_string()),
        ]);

        Self {
            name: name.to_string(),
            kind,
            client: client.to_string(),
            command,
            resources,
            labels,
        }
    }
}

/// Compile a defaulted, validated spec into its runnable units.
pub trait Compile {
    fn compile(&self) -> Vec<CompiledNode>;
}
