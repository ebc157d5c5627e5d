// file: src/params/verbosity.rs
// version: 1.0.0
// guid: 47cfea53-65f9-42ff-bbb1-7a8566fcfeb6

//! Toolchain verbosity levels

use crate::error::InvokeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity passed to the toolchain with `-v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Minimal,
    Normal,
    Detailed,
    Diagnostic,
}

impl Verbosity {
    /// All levels, least verbose first
    pub const ALL: [Verbosity; 5] = [
        Verbosity::Quiet,
        Verbosity::Minimal,
        Verbosity::Normal,
        Verbosity::Detailed,
        Verbosity::Diagnostic,
    ];

    /// Canonical long-form token; the short aliases are never emitted
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Minimal => "minimal",
            Verbosity::Normal => "normal",
            Verbosity::Detailed => "detailed",
            Verbosity::Diagnostic => "diagnostic",
        }
    }

    /// Short alias accepted on input
    pub fn alias(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "q",
            Verbosity::Minimal => "m",
            Verbosity::Normal => "n",
            Verbosity::Detailed => "d",
            Verbosity::Diagnostic => "diag",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verbosity {
    type Err = InvokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Verbosity::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted || level.alias() == wanted)
            .ok_or_else(|| {
                InvokeError::invalid_argument(format!(
                    "Unknown verbosity '{}' (expected q[uiet], m[inimal], n[ormal], d[etailed] or diag[nostic])",
                    s
                ))
            })
    }
}
