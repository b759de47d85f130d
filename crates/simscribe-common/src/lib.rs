//! ---
//! ssc_section: "01-core-types"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Shared core types for the SimScribe workspace."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! Core shared types for the SimScribe logging workspace.
//! This crate exposes the severity scale, simulation-time primitives, the
//! log event model, and configuration loading consumed across the workspace.

pub mod config;
pub mod event;
pub mod severity;
pub mod simtime;

pub use config::{ColourChoice, FormatterConfig, HandlerConfig, LoggingConfig};
pub use event::{CallSite, ExceptionInfo, FieldValue, LogEvent};
pub use severity::Severity;
pub use simtime::{ManualSimClock, SimTimeSource, TimeUnit};
