// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signals: dotted-key facts accumulated on a job.
//!
//! Signals drive plan gating predicates. Accumulation is monotone within
//! a run: later writes overwrite earlier values for the same key, and
//! nothing is ever deleted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known signal keys.
pub mod keys {
    pub const ROUTING_DOMAIN: &str = "routing.domain";
    pub const ROUTING_PIPELINE_ID: &str = "routing.pipeline_id";
    pub const ROUTING_SCHEMA_ID: &str = "routing.schema_id";
    pub const EXTRACTION_OK: &str = "extraction.ok";
    pub const VERIFICATION_VERDICT: &str = "verification.verdict";
}

/// Ordered map from dotted signal key to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signals(IndexMap<String, Value>);

impl Signals {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Shallow merge: keys from `other` overwrite existing keys in place.
    pub fn merge(&mut self, other: &Signals) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Signals {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Signals {
    fn from(entries: [(&str, Value); N]) -> Self {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
