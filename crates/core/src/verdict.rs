// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Verification verdict.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categorical result of verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

crate::string_enum! {
    Verdict {
        Pass => "PASS",
        Warn => "WARN",
        Fail => "FAIL",
    }
}

impl Verdict {
    /// Parse a verdict out of a signal value.
    ///
    /// Anything other than the three known strings is `None`; the runner
    /// treats an absent or unknown verdict as the lenient fallback.
    pub fn from_signal(value: Option<&Value>) -> Option<Verdict> {
        value.and_then(Value::as_str).and_then(Verdict::parse)
    }
}
