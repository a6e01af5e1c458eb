//! Compute and storage requests, carried as opaque quantity strings ("500m", "4Gi").
//!
//! Quantities are only parsed to compare them (limit >= request, storage growth);
//! the strings themselves are handed to the orchestration backend untouched.

use crate::spec::{ErrorList, FieldError, Path};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?)(m|k|M|G|T|P|E|Ki|Mi|Gi|Ti|Pi|Ei)?$")
        .expect("quantity pattern is valid")
});

/// Parse a quantity into base units (cores or bytes).
pub fn parse_quantity(s: &str) -> Option<f64> {
    let caps = QUANTITY_RE.captures(s.trim())?;
    let n: f64 = caps.get(1)?.as_str().parse().ok()?;
    let scale = match caps.get(2).map(|m| m.as_str()) {
        None => 1.0,
        Some("m") => 1e-3,
        Some("k") => 1e3,
        Some("M") => 1e6,
        Some("G") => 1e9,
        Some("T") => 1e12,
        Some("P") => 1e15,
        Some("E") => 1e18,
        Some("Ki") => 1024.0,
        Some("Mi") => 1024f64.powi(2),
        Some("Gi") => 1024f64.powi(3),
        Some("Ti") => 1024f64.powi(4),
        Some("Pi") => 1024f64.powi(5),
        Some("Ei") => 1024f64.powi(6),
        Some(_) => return None,
    };
    Some(n * scale)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// Per-kind fallback quantities.
#[derive(Debug, Clone, Copy)]
pub struct ResourceDefaults {
    pub cpu: &'static str,
    pub cpu_limit: &'static str,
    pub memory: &'static str,
    pub memory_limit: &'static str,
    pub storage: &'static str,
}

/// An unset limit takes the larger of the request and the kind's default limit.
fn default_limit(request: &str, fallback: &str) -> String {
    match (parse_quantity(request), parse_quantity(fallback)) {
        (Some(r), Some(f)) if r > f => request.to_string(),
        _ => fallback.to_string(),
    }
}

impl Resources {
    pub fn apply_defaults(&mut self, defaults: &ResourceDefaults) {
        let cpu = self.cpu.get_or_insert_with(|| defaults.cpu.to_string()).clone();
        if self.cpu_limit.is_none() {
            self.cpu_limit = Some(default_limit(&cpu, defaults.cpu_limit));
        }

        let memory = self
            .memory
            .get_or_insert_with(|| defaults.memory.to_string())
            .clone();
        if self.memory_limit.is_none() {
            self.memory_limit = Some(default_limit(&memory, defaults.memory_limit));
        }

        if self.storage.is_none() {
            self.storage = Some(defaults.storage.to_string());
        }
    }

    pub fn validate_create(&self, path: &Path) -> ErrorList {
        let mut errors = ErrorList::new();

        let mut parsed = |name: &str, value: &Option<String>| -> Option<f64> {
            let value = value.as_ref()?;
            let q = parse_quantity(value);
            if q.is_none() {
                errors.push(FieldError::invalid(
                    &path.child(name),
                    value,
                    "must be a valid quantity",
                ));
            }
            q
        };

        let cpu = parsed("cpu", &self.cpu);
        let cpu_limit = parsed("cpuLimit", &self.cpu_limit);
        let memory = parsed("memory", &self.memory);
        let memory_limit = parsed("memoryLimit", &self.memory_limit);
        parsed("storage", &self.storage);

        if let (Some(req), Some(limit)) = (cpu, cpu_limit) {
            if limit < req {
                errors.push(FieldError::invalid(
                    &path.child("cpuLimit"),
                    self.cpu_limit.as_deref().unwrap_or_default(),
                    format!(
                        "must be greater than or equal to cpu {}",
                        self.cpu.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }

        if let (Some(req), Some(limit)) = (memory, memory_limit) {
            if limit < req {
                errors.push(FieldError::invalid(
                    &path.child("memoryLimit"),
                    self.memory_limit.as_deref().unwrap_or_default(),
                    format!(
                        "must be greater than or equal to memory {}",
                        self.memory.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }

        errors
    }

    /// Transition rules only; `self` is the new value.
    pub fn validate_update(&self, old: &Resources, path: &Path) -> ErrorList {
        let mut errors = ErrorList::new();

        if let (Some(new), Some(prev)) = (&self.storage, &old.storage) {
            if let (Some(n), Some(p)) = (parse_quantity(new), parse_quantity(prev)) {
                if n < p {
                    errors.push(FieldError::invalid(
                        &path.child("storage"),
                        new,
                        format!("must be greater than or equal to old storage {}", prev),
                    ));
                }
            }
        }

        if self.storage_class != old.storage_class {
            errors.push(FieldError::immutable(
                &path.child("storageClass"),
                self.storage_class.as_deref().unwrap_or_default(),
            ));
        }

        errors
    }
}
