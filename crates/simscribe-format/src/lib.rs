//! ---
//! ssc_section: "02-format-engine"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Columnar rendering engine for SimScribe log events."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! Columnar log-line rendering for the SimScribe workspace.
//!
//! The engine turns one [`simscribe_common::LogEvent`] into one
//! width-disciplined, optionally colourized text block: fixed and optional
//! columns compiled from placeholder templates, a sim-time column resolved
//! through a pluggable clock, multi-line continuation padding, and boxed
//! header / centered divider banners.
#![warn(missing_docs)]

use simscribe_common::Severity;

/// Result alias used throughout the formatting crate.
pub type Result<T> = std::result::Result<T, FormatterError>;

/// Error type for formatter construction and rendering.
#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    /// Column template rejected during the construction-time compile pass.
    #[error("invalid column format: {0}")]
    Configuration(String),
    /// Sim-time template carries no recognized resolution unit.
    #[error("invalid sim-time format string: {0:?}")]
    SimTimeFormat(String),
    /// Severity missing from the colour palette.
    #[error("no colour mapping registered for severity {0}")]
    MissingColour(Severity),
}

pub mod banner;
pub mod colour;
pub mod colspec;
pub mod layout;

pub use banner::Banner;
pub use colour::{SeverityPalette, Style};
pub use colspec::{ColumnSpec, FormatSpec, Segment, Template};
pub use layout::{Column, ColumnFormatter};
