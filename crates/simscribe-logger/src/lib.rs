//! ---
//! ssc_section: "03-logger-facade"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Logger facade and process registry for SimScribe."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! The public logging surface of the SimScribe workspace.
//!
//! [`SimLogger`] is a facade that exclusively owns one inner [`Logger`] and
//! forwards a small, enumerated set of operations to it; [`registry`] holds
//! the one piece of process-wide state (the top logger, queued init
//! callbacks and level-change notifications) behind an explicit
//! init/teardown lifecycle.
#![warn(missing_docs)]

/// Result alias used throughout the logger crate.
pub type Result<T> = std::result::Result<T, LoggerError>;

/// Error type for the logging surface.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// `init` was called a second time.
    #[error("logging has already been initialized with top logger '{0}'")]
    AlreadyInitialized(String),
    /// An operation requiring the registry ran before `init`.
    #[error("logging has not been initialized")]
    NotInitialized,
    /// The formatter rejected the event or its configuration.
    #[error(transparent)]
    Format(#[from] simscribe_format::FormatterError),
    /// A handler failed to write the rendered block.
    #[error("handler io error: {0}")]
    Io(#[from] std::io::Error),
}

pub mod facade;
pub mod handlers;
pub mod logger;
pub mod macros;
pub mod registry;

pub use facade::{LoggerName, SimLogger};
pub use handlers::{ConsoleHandler, FileHandler, LogHandler, MemoryHandler};
pub use logger::Logger;

pub use simscribe_common::{
    CallSite, ColourChoice, ExceptionInfo, FieldValue, LogEvent, LoggingConfig, ManualSimClock,
    Severity, SimTimeSource, TimeUnit,
};
