//! ---
//! ssc_section: "02-format-engine"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Columnar rendering engine for SimScribe log events."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! Severity-keyed ANSI colour decoration.
//!
//! Colour codes are applied after truncation and padding, so they never
//! count toward any computed column width.

use indexmap::IndexMap;
use simscribe_common::Severity;

use crate::{FormatterError, Result};

/// Raw ANSI escape sequences used by the palette.
pub mod ansi {
    /// Reset the foreground to the terminal default.
    pub const DEFAULT_FG: &str = "\x1b[39m";
    /// Reset the background to the terminal default.
    pub const DEFAULT_BG: &str = "\x1b[49m";
    /// Reset both planes.
    pub const DEFAULT: &str = "\x1b[49m\x1b[39m";
    /// Black foreground.
    pub const BLACK_FG: &str = "\x1b[30m";
    /// Red foreground.
    pub const RED_FG: &str = "\x1b[31m";
    /// Yellow foreground.
    pub const YELLOW_FG: &str = "\x1b[33m";
    /// Blue foreground.
    pub const BLUE_FG: &str = "\x1b[34m";
    /// Red background.
    pub const RED_BG: &str = "\x1b[41m";
}

/// One colour wrapping applied around rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    prefix: String,
    suffix: String,
}

impl Style {
    /// Style from explicit open and close sequences.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Wrap text in the style's open/close sequences.
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.prefix, text, self.suffix)
    }
}

/// Severity→style table consulted by the decorator.
///
/// The standard table maps the five standard severities; `DeepDebug` has no
/// default entry, so colourizing deep-debug records without registering one
/// is a programming error surfaced as
/// [`FormatterError::MissingColour`].
#[derive(Debug, Clone)]
pub struct SeverityPalette {
    styles: IndexMap<Severity, Style>,
}

impl Default for SeverityPalette {
    fn default() -> Self {
        let mut styles = IndexMap::new();
        styles.insert(
            Severity::Debug,
            Style::new(ansi::DEFAULT, ansi::DEFAULT),
        );
        styles.insert(
            Severity::Info,
            Style::new(format!("{}{}", ansi::DEFAULT_BG, ansi::BLUE_FG), ansi::DEFAULT),
        );
        styles.insert(
            Severity::Warning,
            Style::new(
                format!("{}{}", ansi::DEFAULT_BG, ansi::YELLOW_FG),
                ansi::DEFAULT,
            ),
        );
        styles.insert(
            Severity::Error,
            Style::new(format!("{}{}", ansi::DEFAULT_BG, ansi::RED_FG), ansi::DEFAULT),
        );
        styles.insert(
            Severity::Critical,
            Style::new(format!("{}{}", ansi::RED_BG, ansi::BLACK_FG), ansi::DEFAULT),
        );
        Self { styles }
    }
}

impl SeverityPalette {
    /// The standard five-severity table.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Register or replace the style for a severity.
    pub fn insert(&mut self, severity: Severity, style: Style) {
        self.styles.insert(severity, style);
    }

    /// Style for a severity, or [`FormatterError::MissingColour`].
    pub fn style(&self, severity: Severity) -> Result<&Style> {
        self.styles
            .get(&severity)
            .ok_or(FormatterError::MissingColour(severity))
    }

    /// Wrap text in the severity's style.
    pub fn wrap(&self, severity: Severity, text: &str) -> Result<String> {
        Ok(self.style(severity)?.wrap(text))
    }

    /// Wrap every line of a block independently, so colour state never
    /// depends on how a terminal treats raw newlines.
    pub fn wrap_lines(&self, severity: Severity, text: &str) -> Result<String> {
        let style = self.style(severity)?;
        Ok(text
            .split('\n')
            .map(|line| style.wrap(line))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Wrap a blank padding run in reset codes, keeping continuation-line
    /// indents byte-aligned with a colourized severity column.
    pub fn reset_pad(pad: &str) -> String {
        format!("{}{}{}", ansi::DEFAULT, pad, ansi::DEFAULT)
    }
}
