//! ---
//! ssc_section: "01-core-types"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Shared core types for the SimScribe workspace."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Environment variable overriding the configured severity threshold.
pub const ENV_LOG_LEVEL: &str = "SIMSCRIBE_LOG_LEVEL";
/// Environment variable forcing the reduced (no optional columns) layout.
pub const ENV_REDUCED_FMT: &str = "SIMSCRIBE_REDUCED_FMT";

fn default_level() -> Severity {
    Severity::Info
}

fn default_final_format() -> String {
    "{message}".to_owned()
}

fn default_simtime_format() -> String {
    "{:>6.2f}ns".to_owned()
}

fn default_separator() -> String {
    " | ".to_owned()
}

fn default_divider_width() -> usize {
    120
}

fn default_fixed_columns() -> Vec<String> {
    vec!["{simtime:>14s}".to_owned(), "{levelname:<10s}".to_owned()]
}

fn default_optional_columns() -> Vec<String> {
    vec![
        "{name:<35}".to_owned(),
        "{filename:>20}:{lineno:<4}".to_owned(),
        "{funcName:<31}".to_owned(),
    ]
}

fn default_console_enabled() -> bool {
    true
}

/// Colour enablement policy for console output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColourChoice {
    /// Colourize when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always emit colour codes.
    Always,
    /// Never emit colour codes.
    Never,
}

impl ColourChoice {
    /// Resolve the policy against the running environment.
    pub fn enabled(&self) -> bool {
        match self {
            ColourChoice::Always => true,
            ColourChoice::Never => false,
            ColourChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

/// Column templates and layout settings for the formatter.
///
/// Every fixed and optional column template must carry an explicit width in
/// its placeholders; the final `format` template is the only variable-width
/// region of a rendered line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Template for the trailing free-form message region.
    #[serde(default = "default_final_format")]
    pub format: String,
    /// Wall-clock strftime format for the `asctime` field.
    #[serde(default)]
    pub date_format: Option<String>,
    /// Template for the `simtime` field, carrying a resolution unit suffix.
    #[serde(default = "default_simtime_format")]
    pub simtime_format: String,
    /// String separating adjacent columns.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Template prepended to the message region when its fields resolve.
    #[serde(default)]
    pub prefix: String,
    /// Width of header and divider banners.
    #[serde(default = "default_divider_width")]
    pub divider_width: usize,
    /// Always-rendered column templates, in order.
    #[serde(default = "default_fixed_columns")]
    pub fixed: Vec<String>,
    /// Conditionally-rendered column templates, in order.
    #[serde(default = "default_optional_columns")]
    pub optional: Vec<String>,
    /// Force optional columns uniformly on or off; unset leaves the
    /// decision to each event.
    #[serde(default)]
    pub include_optional: Option<bool>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            format: default_final_format(),
            date_format: None,
            simtime_format: default_simtime_format(),
            separator: default_separator(),
            prefix: String::new(),
            divider_width: default_divider_width(),
            fixed: default_fixed_columns(),
            optional: default_optional_columns(),
            include_optional: None,
        }
    }
}

impl FormatterConfig {
    /// Effective process-level optional-column override.
    ///
    /// An explicit `include_optional` in the configuration wins; otherwise a
    /// truthy `SIMSCRIBE_REDUCED_FMT` forces the reduced layout and a falsy
    /// one forces the full layout. Unset (or unrecognized) leaves the
    /// per-event decision in place.
    pub fn optional_override(&self) -> Option<bool> {
        if self.include_optional.is_some() {
            return self.include_optional;
        }
        match std::env::var(ENV_REDUCED_FMT) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(false),
                "0" | "false" | "no" | "off" => Some(true),
                _ => None,
            },
            Err(_) => None,
        }
    }
}

/// Output sink selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Append rendered lines to stdout.
    #[serde(default = "default_console_enabled")]
    pub console: bool,
    /// Append rendered lines to this file, when set.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            console: default_console_enabled(),
            file: None,
        }
    }
}

/// Top-level logging configuration decoded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default severity threshold for new loggers.
    #[serde(default = "default_level")]
    pub level: Severity,
    /// Colour policy for console output.
    #[serde(default)]
    pub colour: ColourChoice,
    /// Output sinks.
    #[serde(default)]
    pub handlers: HandlerConfig,
    /// Formatter layout and templates.
    #[serde(default)]
    pub formatter: FormatterConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            colour: ColourChoice::default(),
            handlers: HandlerConfig::default(),
            formatter: FormatterConfig::default(),
        }
    }
}

impl LoggingConfig {
    /// Environment variable naming an explicit configuration file.
    pub const ENV_CONFIG_PATH: &str = "SIMSCRIBE_CONFIG";

    /// Load configuration from disk, respecting the `SIMSCRIBE_CONFIG`
    /// override, then trying each candidate path in order.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                return Self::from_path(Path::new(&env_path));
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                return Self::from_path(candidate.as_ref());
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<LoggingConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Severity threshold after applying the `SIMSCRIBE_LOG_LEVEL` override.
    pub fn effective_level(&self) -> Severity {
        match std::env::var(ENV_LOG_LEVEL) {
            Ok(directive) => directive.parse().unwrap_or_else(|err| {
                eprintln!(
                    "invalid {} directive ({}); using configured level {}",
                    ENV_LOG_LEVEL, err, self.level
                );
                self.level
            }),
            Err(_) => self.level,
        }
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.formatter.divider_width < 7 {
            return Err(anyhow!(
                "formatter divider_width must be at least 7, got {}",
                self.formatter.divider_width
            ));
        }
        if !self.handlers.console && self.handlers.file.is_none() {
            return Err(anyhow!("at least one handler must be enabled"));
        }
        Ok(())
    }
}

impl std::str::FromStr for LoggingConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: LoggingConfig =
            toml::from_str(content).with_context(|| "failed to parse logging configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_standard_layout() {
        let config = LoggingConfig::default();
        assert_eq!(config.formatter.fixed.len(), 2);
        assert_eq!(config.formatter.optional.len(), 3);
        assert_eq!(config.formatter.separator, " | ");
        assert_eq!(config.formatter.divider_width, 120);
        assert_eq!(config.formatter.simtime_format, "{:>6.2f}ns");
        assert!(config.handlers.console);
    }

    #[test]
    fn full_document_decodes() {
        let config: LoggingConfig = r#"
            level = "DEEP_DEBUG"
            colour = "never"

            [handlers]
            console = true
            file = "target/logs/sim.log"

            [formatter]
            format = "{message}"
            separator = " || "
            prefix = "{phase} "
            divider_width = 80
            simtime_format = "{:>10.3f}ps"
            fixed = ["{simtime:>14s}", "{levelname:<10s}"]
            optional = ["{name:<20}"]
            include_optional = false
        "#
        .parse()
        .expect("decode config");

        assert_eq!(config.level, Severity::DeepDebug);
        assert_eq!(config.colour, ColourChoice::Never);
        assert_eq!(config.formatter.separator, " || ");
        assert_eq!(config.formatter.include_optional, Some(false));
        assert_eq!(
            config.handlers.file.as_deref(),
            Some(Path::new("target/logs/sim.log"))
        );
    }

    #[test]
    fn unknown_level_is_rejected() {
        let result = "level = \"LOUD\"".parse::<LoggingConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn narrow_divider_is_rejected() {
        let result = "[formatter]\ndivider_width = 4".parse::<LoggingConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn explicit_include_optional_wins_over_environment() {
        let mut config = FormatterConfig {
            include_optional: Some(true),
            ..FormatterConfig::default()
        };
        assert_eq!(config.optional_override(), Some(true));
        config.include_optional = Some(false);
        assert_eq!(config.optional_override(), Some(false));
    }
}
