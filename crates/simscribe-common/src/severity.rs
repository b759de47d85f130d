//! ---
//! ssc_section: "01-core-types"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Shared core types for the SimScribe workspace."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered log severity scale.
///
/// The five standard levels are joined by [`Severity::DeepDebug`], which is
/// more verbose than `Debug` and intended for cycle-accurate simulator
/// chatter that would drown ordinary debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    DeepDebug,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Every severity, most verbose first.
    pub const ALL: [Severity; 6] = [
        Severity::DeepDebug,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Canonical upper-case name, as rendered by the `levelname` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::DeepDebug => "DEEP_DEBUG",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEEP_DEBUG" => Ok(Severity::DeepDebug),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}
