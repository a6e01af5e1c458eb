//! Field paths and structured violations.
//!
//! Example path: spec.nodes[0].bootnode  =>  Path::spec().child("nodes").index(0).child("bootnode")
//!
//! Every violated rule becomes exactly one `FieldError`; the caller gets the whole
//! `ErrorList` back so all problems can be fixed in one round-trip.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    pub fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    /// Root of every user-facing spec.
    pub fn spec() -> Self {
        Self::new("spec")
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    pub fn index(&self, i: usize) -> Self {
        Self(format!("{}[{}]", self.0, i))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorType {
    Invalid,
    Required,
    Duplicate,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorType::Invalid => "Invalid value",
            ErrorType::Required => "Required value",
            ErrorType::Duplicate => "Duplicate value",
        };
        f.write_str(s)
    }
}

/// The rejected value as reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BadValue {
    Bool(bool),
    Str(String),
}

impl From<bool> for BadValue {
    fn from(v: bool) -> Self {
        BadValue::Bool(v)
    }
}

impl From<&str> for BadValue {
    fn from(v: &str) -> Self {
        BadValue::Str(v.to_string())
    }
}

impl From<String> for BadValue {
    fn from(v: String) -> Self {
        BadValue::Str(v)
    }
}

impl From<&String> for BadValue {
    fn from(v: &String) -> Self {
        BadValue::Str(v.clone())
    }
}

impl fmt::Display for BadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadValue::Bool(b) => write!(f, "{}", b),
            BadValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub field: Path,
    pub bad_value: BadValue,
    pub detail: String,
}

impl FieldError {
    pub fn invalid(field: &Path, value: impl Into<BadValue>, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Invalid,
            field: field.clone(),
            bad_value: value.into(),
            detail: detail.into(),
        }
    }

    pub fn required(field: &Path, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Required,
            field: field.clone(),
            bad_value: BadValue::from(""),
            detail: detail.into(),
        }
    }

    pub fn duplicate(field: &Path, value: impl Into<BadValue>) -> Self {
        Self {
            error_type: ErrorType::Duplicate,
            field: field.clone(),
            bad_value: value.into(),
            detail: String::new(),
        }
    }

    /// Shorthand for the update-time immutability violation.
    pub fn immutable(field: &Path, value: impl Into<BadValue>) -> Self {
        Self::invalid(field, value, "field is immutable")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.field, self.error_type, self.bad_value)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// Ordered, accumulated violations. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    pub fn append(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// Violations reported at exactly `field`.
    pub fn at(&self, field: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.field.as_str() == field).collect()
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paths_render_like_api_errors() {
        let p = Path::spec().child("nodes").index(0).child("bootnode");
        assert_eq!(p.as_str(), "spec.nodes[0].bootnode");
    }

    #[test]
    fn field_error_display() {
        let err = FieldError::invalid(
            &Path::spec().child("consensus"),
            "pow",
            "must be none while joining a network",
        );
        assert_eq!(
            err.to_string(),
            r#"spec.consensus: Invalid value: "pow": must be none while joining a network"#
        );

        let err = FieldError::invalid(&Path::spec().child("rpc"), true, "must be false if import is provided");
        assert_eq!(
            err.to_string(),
            "spec.rpc: Invalid value: true: must be false if import is provided"
        );
    }

    #[test]
    fn error_list_keeps_insertion_order() {
        let mut errors = ErrorList::new();
        errors.push(FieldError::required(&Path::spec().child("b"), "must be specified"));
        errors.push(FieldError::duplicate(&Path::spec().child("a"), "x"));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["spec.b", "spec.a"]);
        assert_eq!(errors.at("spec.a").len(), 1);
    }
}
