//! Vantage Types - Core Data Types
//!
//! Identifiers shared by the selection, metrics and streaming layers.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Selection Option
// =============================================================================

/// An `{id, name}` entry returned by vCenter, cluster and tag sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionOption {
    pub id: String,
    pub name: String,
}

impl SelectionOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Slot Identifier
// =============================================================================

/// Name of a result slot owned by exactly one source task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// Query Key
// =============================================================================

/// One component of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyPart {
    Unset,
    Value(String),
    Set(BTreeSet<String>),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Unset => write!(f, "-"),
            KeyPart::Value(value) => write!(f, "{:?}", value),
            KeyPart::Set(values) => write!(f, "{:?}", values),
        }
    }
}

/// Scope-derived key of a query. Two requests with equal keys are the same
/// query; a result carrying any other key for its slot is stale.
///
/// Keys compare part by part, so ids containing separators never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(vec![KeyPart::Value(name.into())])
    }

    /// Build a key from plain values, e.g. `["clusters", "vc-1"]`.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(|p| KeyPart::Value(p.into())).collect())
    }

    /// Append an optional value; `None` and `Some("")` stay distinct.
    pub fn with_value(mut self, value: Option<&str>) -> Self {
        self.0.push(match value {
            Some(value) => KeyPart::Value(value.to_string()),
            None => KeyPart::Unset,
        });
        self
    }

    pub fn with_set(mut self, values: &BTreeSet<String>) -> Self {
        self.0.push(KeyPart::Set(values.clone()));
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
