//! ---
//! ssc_section: "02-format-engine"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Columnar rendering engine for SimScribe log events."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! The column layout engine.
//!
//! Owns the compiled fixed and optional column lists and assembles one text
//! block per event: columns, separator runs, the prefixed free-form message
//! region, continuation-line padding, and appended exception/stack blocks.

use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use simscribe_common::config::FormatterConfig;
use simscribe_common::{FieldValue, LogEvent, Severity, SimTimeSource, TimeUnit};

use crate::banner::Banner;
use crate::colour::SeverityPalette;
use crate::colspec::{ColumnSpec, Segment, Template};
use crate::{FormatterError, Result};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const PREFIX_INDENT: &str = "    ";

/// A compiled column bound to its slot in the fixed or optional list.
#[derive(Debug, Clone)]
pub struct Column {
    spec: ColumnSpec,
    uses_time: bool,
    uses_sim_time: bool,
    severity_column: bool,
}

impl Column {
    fn compile(template: &str) -> Result<Self> {
        let spec = ColumnSpec::parse(template)?;
        let mut uses_time = false;
        let mut uses_sim_time = false;
        let mut severity_column = false;
        for segment in spec.segments() {
            if let Segment::Field { name, .. } = segment {
                match name.as_str() {
                    "asctime" => uses_time = true,
                    "simtime" => uses_sim_time = true,
                    "levelname" => severity_column = true,
                    _ => {}
                }
            }
        }
        Ok(Self {
            spec,
            uses_time,
            uses_sim_time,
            severity_column,
        })
    }

    /// Declared column width.
    pub fn width(&self) -> usize {
        self.spec.width()
    }

    /// All-blank stand-in of exactly the column width.
    pub fn pad(&self) -> &str {
        self.spec.pad()
    }
}

/// Immutable formatter state: compiled columns, templates and decoration.
///
/// Built once at logging setup and shared read-only afterwards; the only
/// per-call mutable state lives on the [`LogEvent`] being rendered, which is
/// why [`ColumnFormatter::format`] takes `&mut LogEvent`.
#[derive(Debug)]
pub struct ColumnFormatter {
    final_template: Template,
    prefix_template: Template,
    date_format: String,
    simtime_format: String,
    separator: String,
    banner: Banner,
    fixed: Vec<Column>,
    optional: Vec<Column>,
    fixed_pad: String,
    optional_pad: String,
    uses_time: bool,
    uses_sim_time: bool,
    optional_override: Option<bool>,
    palette: Option<SeverityPalette>,
    clock: Arc<dyn SimTimeSource>,
}

impl ColumnFormatter {
    /// Compile the formatter state from configuration.
    ///
    /// Every column template is parsed exactly once here; any missing width,
    /// unparsable specifier, undersized column or invalid date format aborts
    /// construction with [`FormatterError::Configuration`].
    pub fn new(
        config: &FormatterConfig,
        palette: Option<SeverityPalette>,
        clock: Arc<dyn SimTimeSource>,
    ) -> Result<Self> {
        let final_template = Template::parse(&config.format)?;
        let prefix_template = Template::parse(&config.prefix)?;
        let banner = Banner::new(config.divider_width)?;
        let date_format = config
            .date_format
            .clone()
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_owned());
        validate_date_format(&date_format)?;

        let fixed = config
            .fixed
            .iter()
            .map(|template| Column::compile(template))
            .collect::<Result<Vec<_>>>()?;
        let optional = config
            .optional
            .iter()
            .map(|template| Column::compile(template))
            .collect::<Result<Vec<_>>>()?;

        let mut uses_time =
            final_template.uses_field("asctime") || prefix_template.uses_field("asctime");
        let mut uses_sim_time =
            final_template.uses_field("simtime") || prefix_template.uses_field("simtime");
        for column in fixed.iter().chain(optional.iter()) {
            uses_time = uses_time || column.uses_time;
            uses_sim_time = uses_sim_time || column.uses_sim_time;
        }

        let mut fixed_pad = String::new();
        for column in &fixed {
            if column.severity_column && palette.is_some() {
                fixed_pad.push_str(&SeverityPalette::reset_pad(column.pad()));
            } else {
                fixed_pad.push_str(column.pad());
            }
            fixed_pad.push_str(&config.separator);
        }
        let mut optional_pad = String::new();
        for column in &optional {
            optional_pad.push_str(column.pad());
            optional_pad.push_str(&config.separator);
        }

        Ok(Self {
            final_template,
            prefix_template,
            date_format,
            simtime_format: config.simtime_format.clone(),
            separator: config.separator.clone(),
            banner,
            fixed,
            optional,
            fixed_pad,
            optional_pad,
            uses_time,
            uses_sim_time,
            optional_override: config.optional_override(),
            palette,
            clock,
        })
    }

    /// Always-rendered columns, in order.
    pub fn fixed(&self) -> &[Column] {
        &self.fixed
    }

    /// Conditionally-rendered columns, in order.
    pub fn optional(&self) -> &[Column] {
        &self.optional
    }

    /// Column separator string.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Whether any template consumes wall-clock time.
    pub fn uses_time(&self) -> bool {
        self.uses_time
    }

    /// Whether any template consumes simulated time.
    pub fn uses_sim_time(&self) -> bool {
        self.uses_sim_time
    }

    /// Render one event into one (possibly multi-line) text block.
    pub fn format(&self, event: &mut LogEvent) -> Result<String> {
        if event.include_optional.is_none() {
            event.include_optional = self.optional_override;
        }
        if event.header {
            return Ok(self.banner.header(&event.message));
        }
        if event.divider {
            return Ok(self.banner.divider(&event.message));
        }

        let asctime = self
            .uses_time
            .then(|| Local::now().format(&self.date_format).to_string());
        let simtime = if self.uses_sim_time {
            Some(self.format_sim_time()?)
        } else {
            None
        };

        let mut out = self.format_message(event, asctime.as_deref(), simtime.as_deref())?;

        if event.exc_text.is_none() {
            if let Some(exception) = &event.exception {
                event.exc_text = Some(exception.render());
            }
        }
        let include_optional = event.include_optional.unwrap_or(false);
        let has_prefix = event.prefix.as_deref().is_some_and(|p| !p.is_empty());
        if let Some(text) = event.exc_text.clone() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            let decorated = self.colourize(event.severity, &text)?;
            out.push_str(&self.pad_multi_line(&decorated, include_optional, has_prefix, true));
        }
        if let Some(stack) = event.stack.clone() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            let decorated = self.colourize(event.severity, &stack)?;
            out.push_str(&self.pad_multi_line(&decorated, include_optional, has_prefix, true));
        }
        Ok(out)
    }

    /// Render the columnar region plus the padded message region.
    fn format_message(
        &self,
        event: &mut LogEvent,
        asctime: Option<&str>,
        simtime: Option<&str>,
    ) -> Result<String> {
        let mut out = String::new();
        for column in &self.fixed {
            let rendered = self
                .format_column(column, event, asctime, simtime)?
                .unwrap_or_else(|| column.pad().to_owned());
            out.push_str(&rendered);
            out.push_str(&self.separator);
        }

        if event.include_optional.unwrap_or(true) {
            let mut any_rendered = false;
            let mut optional = String::new();
            for column in &self.optional {
                match self.format_column(column, event, asctime, simtime)? {
                    Some(text) => {
                        any_rendered = true;
                        optional.push_str(&text);
                    }
                    None => optional.push_str(column.pad()),
                }
                optional.push_str(&self.separator);
            }
            if event.include_optional.is_none() {
                event.include_optional = Some(any_rendered);
            }
            if event.include_optional == Some(true) {
                out.push_str(&optional);
            }
        }

        if event.prefix.is_none() {
            let rendered = self
                .prefix_template
                .render(|name| self.field_value(event, asctime, simtime, name));
            event.prefix = Some(rendered);
        }
        let prefix = event.prefix.clone().unwrap_or_default();

        let body = self
            .final_template
            .render(|name| self.field_value(event, asctime, simtime, name));
        let message = self.colourize(event.severity, &format!("{}{}", prefix, body))?;
        let include_optional = event.include_optional.unwrap_or(false);
        out.push_str(&self.pad_multi_line(&message, include_optional, !prefix.is_empty(), false));
        Ok(out)
    }

    /// Render one column: `None` means a referenced field was absent.
    fn format_column(
        &self,
        column: &Column,
        event: &LogEvent,
        asctime: Option<&str>,
        simtime: Option<&str>,
    ) -> Result<Option<String>> {
        let rendered = column
            .spec
            .render(|name| self.field_value(event, asctime, simtime, name));
        match rendered {
            None => Ok(None),
            Some(text) => {
                let text = truncate_to(&text, column.width());
                if column.severity_column {
                    if let Some(palette) = &self.palette {
                        return Ok(Some(palette.wrap(event.severity, &text)?));
                    }
                }
                Ok(Some(text))
            }
        }
    }

    fn field_value(
        &self,
        event: &LogEvent,
        asctime: Option<&str>,
        simtime: Option<&str>,
        name: &str,
    ) -> Option<FieldValue> {
        match name {
            "message" => Some(FieldValue::Str(event.message.clone())),
            "levelname" => Some(FieldValue::Str(event.severity.as_str().to_owned())),
            "name" => Some(FieldValue::Str(event.name.clone())),
            "asctime" => asctime.map(|s| FieldValue::Str(s.to_owned())),
            "simtime" => simtime.map(|s| FieldValue::Str(s.to_owned())),
            "filename" => event
                .call_site
                .map(|site| FieldValue::Str(site.filename().to_owned())),
            "lineno" => event
                .call_site
                .map(|site| FieldValue::Int(i64::from(site.line))),
            "funcName" => event
                .call_site
                .and_then(|site| site.function)
                .map(|function| FieldValue::Str(function.to_owned())),
            other => event.attrs.get(other).cloned(),
        }
    }

    /// Resolve the sim-time template: extract the resolution unit, query the
    /// clock, and render the full template with the numeric value.
    fn format_sim_time(&self) -> Result<String> {
        let template = &self.simtime_format;
        let unit = find_time_unit(template)
            .ok_or_else(|| FormatterError::SimTimeFormat(template.clone()))?;
        let value = self.clock.now(unit);
        let parsed =
            Template::parse(template).map_err(|_| FormatterError::SimTimeFormat(template.clone()))?;
        Ok(parsed.render_with(&FieldValue::Float(value)))
    }

    /// Indent string aligning continuation lines under the message column.
    pub fn continuation_indent(&self, include_optional: bool, has_prefix: bool) -> String {
        let mut indent = self.fixed_pad.clone();
        if include_optional {
            indent.push_str(&self.optional_pad);
        }
        if has_prefix {
            indent.push_str(PREFIX_INDENT);
        }
        indent
    }

    fn pad_multi_line(
        &self,
        text: &str,
        include_optional: bool,
        has_prefix: bool,
        pad_first_line: bool,
    ) -> String {
        let indent = self.continuation_indent(include_optional, has_prefix);
        let joined = text
            .split('\n')
            .collect::<Vec<_>>()
            .join(&format!("\n{}", indent));
        if pad_first_line {
            format!("{}{}", indent, joined)
        } else {
            joined
        }
    }

    fn colourize(&self, severity: Severity, text: &str) -> Result<String> {
        match &self.palette {
            Some(palette) => palette.wrap_lines(severity, text),
            None => Ok(text.to_owned()),
        }
    }
}

/// Truncate to `width`, keeping the trailing context behind a 2-character
/// ellipsis marker.
fn truncate_to(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_owned();
    }
    let tail: String = text.chars().skip(len - (width - 2)).collect();
    format!("..{}", tail)
}

fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(FormatterError::Configuration(format!(
            "invalid date format string {:?}",
            format
        )));
    }
    Ok(())
}

fn find_time_unit(template: &str) -> Option<TimeUnit> {
    for (at, _) in template.char_indices() {
        for unit in TimeUnit::ALL {
            if template[at..].starts_with(unit.suffix()) {
                return Some(unit);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use simscribe_common::{CallSite, ExceptionInfo, ManualSimClock};

    fn formatter(config: &FormatterConfig) -> ColumnFormatter {
        let clock = Arc::new(ManualSimClock::starting_at(12_500_000)); // 12.5 ns
        ColumnFormatter::new(config, None, clock).expect("formatter builds")
    }

    fn colour_formatter(config: &FormatterConfig) -> ColumnFormatter {
        let clock = Arc::new(ManualSimClock::starting_at(12_500_000));
        ColumnFormatter::new(config, Some(SeverityPalette::standard()), clock)
            .expect("formatter builds")
    }

    fn bare_config() -> FormatterConfig {
        FormatterConfig {
            optional: Vec::new(),
            ..FormatterConfig::default()
        }
    }

    #[test]
    fn standard_line_matches_the_reference_layout() {
        let fmt = formatter(&bare_config());
        let mut event = LogEvent::new(Severity::Info, "tb", "hello");
        let line = fmt.format(&mut event).expect("format");
        assert_eq!(line, "       12.50ns | INFO       | hello");
    }

    #[test]
    fn sim_time_renders_like_a_plain_numeric_formatter() {
        let clock = Arc::new(ManualSimClock::starting_at(12_250_000)); // 12.25 ns
        let fmt = ColumnFormatter::new(&bare_config(), None, clock).expect("formatter");
        let mut event = LogEvent::new(Severity::Info, "tb", "x");
        let line = fmt.format(&mut event).expect("format");
        assert!(line.starts_with("       12.25ns |"), "got {:?}", line);
    }

    #[test]
    fn sim_time_template_without_unit_is_rejected_at_render() {
        let config = FormatterConfig {
            simtime_format: "{:>6.2f}".to_owned(),
            ..bare_config()
        };
        let fmt = formatter(&config);
        let mut event = LogEvent::new(Severity::Info, "tb", "x");
        let err = fmt.format(&mut event).expect_err("no unit");
        assert!(matches!(err, FormatterError::SimTimeFormat(_)));
    }

    #[test]
    fn over_wide_column_text_keeps_the_tail() {
        let config = FormatterConfig {
            fixed: vec!["{name:<10}".to_owned()],
            optional: Vec::new(),
            ..FormatterConfig::default()
        };
        let fmt = formatter(&config);
        let mut event = LogEvent::new(Severity::Info, "tb.env.agent.monitor", "x");
        let line = fmt.format(&mut event).expect("format");
        assert!(line.starts_with("...monitor | "), "got {:?}", line);
    }

    #[test]
    fn missing_width_fails_before_any_event_is_formatted() {
        let config = FormatterConfig {
            fixed: vec!["{name}".to_owned()],
            ..FormatterConfig::default()
        };
        let clock = Arc::new(ManualSimClock::new());
        let err = ColumnFormatter::new(&config, None, clock).expect_err("must fail");
        assert!(matches!(err, FormatterError::Configuration(_)));
    }

    #[test]
    fn optional_columns_mix_rendered_values_and_blank_padding() {
        let config = FormatterConfig {
            fixed: vec!["{levelname:<10s}".to_owned()],
            optional: vec!["{name:<12}".to_owned(), "{funcName:<8}".to_owned()],
            ..FormatterConfig::default()
        };
        let fmt = formatter(&config);
        // no call site: funcName is absent, name is present
        let mut event = LogEvent::new(Severity::Info, "tb.agent", "go");
        let line = fmt.format(&mut event).expect("format");
        assert_eq!(event.include_optional, Some(true));
        assert_eq!(line, "INFO       | tb.agent     |          | go");
    }

    #[test]
    fn all_optional_fields_absent_collapses_the_optional_region() {
        let config = FormatterConfig {
            fixed: vec!["{levelname:<10s}".to_owned()],
            optional: vec!["{funcName:<8}".to_owned()],
            ..FormatterConfig::default()
        };
        let fmt = formatter(&config);
        let mut event = LogEvent::new(Severity::Info, "tb", "go");
        let line = fmt.format(&mut event).expect("format");
        assert_eq!(event.include_optional, Some(false));
        assert_eq!(line, "INFO       | go");
    }

    #[test]
    fn include_optional_is_sticky_across_renders() {
        let config = FormatterConfig {
            fixed: vec!["{levelname:<10s}".to_owned()],
            optional: vec!["{name:<12}".to_owned()],
            ..FormatterConfig::default()
        };
        let fmt = formatter(&config);
        let mut event = LogEvent::new(Severity::Info, "tb", "go");
        let first = fmt.format(&mut event).expect("format");
        let second = fmt.format(&mut event).expect("format");
        assert_eq!(first, second);

        let mut reduced = LogEvent::new(Severity::Info, "tb", "go").with_optional_columns(false);
        let line = fmt.format(&mut reduced).expect("format");
        assert_eq!(line, "INFO       | go");
        assert_eq!(reduced.include_optional, Some(false));
    }

    #[test]
    fn continuation_lines_start_at_the_message_column() {
        let fmt = formatter(&bare_config());
        let mut event = LogEvent::new(Severity::Warning, "tb", "first\nsecond\nthird");
        let rendered = fmt.format(&mut event).expect("format");
        let indent = fmt.continuation_indent(false, false);
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(&indent));
        assert!(lines[2].starts_with(&indent));
        assert_eq!(lines[1], format!("{}second", indent));
        assert_eq!(lines[2], format!("{}third", indent));
    }

    #[test]
    fn prefix_renders_from_attributes_and_indents_continuations() {
        let config = FormatterConfig {
            prefix: "[{phase}] ".to_owned(),
            ..bare_config()
        };
        let fmt = formatter(&config);
        let mut event =
            LogEvent::new(Severity::Info, "tb", "up\ndown").with_attr("phase", "RESET");
        let rendered = fmt.format(&mut event).expect("format");
        assert_eq!(event.prefix.as_deref(), Some("[RESET] "));
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert!(lines[0].ends_with("| [RESET] up"));
        assert!(lines[1].ends_with("    down"));
    }

    #[test]
    fn exception_text_is_cached_and_padded_with_first_line() {
        let fmt = formatter(&bare_config());
        let mut event = LogEvent::new(Severity::Error, "tb", "boom").with_exception(
            ExceptionInfo::new("BusError", "decode failed").with_trace("at dut.bus"),
        );
        let rendered = fmt.format(&mut event).expect("format");
        let indent = fmt.continuation_indent(false, false);
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("{}BusError: decode failed", indent));
        assert_eq!(lines[2], format!("{}at dut.bus", indent));
        assert_eq!(event.exc_text.as_deref(), Some("BusError: decode failed\nat dut.bus"));
    }

    #[test]
    fn stack_text_is_appended_after_the_exception_block() {
        let fmt = formatter(&bare_config());
        let mut event = LogEvent::new(Severity::Error, "tb", "boom")
            .with_exception(ExceptionInfo::new("BusError", "decode failed"))
            .with_stack("stack (most recent call last):\nscheduler.tick");
        let rendered = fmt.format(&mut event).expect("format");
        let indent = fmt.continuation_indent(false, false);
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], format!("{}BusError: decode failed", indent));
        assert_eq!(lines[2], format!("{}stack (most recent call last):", indent));
        assert_eq!(lines[3], format!("{}scheduler.tick", indent));
    }

    #[test]
    fn call_site_feeds_the_filename_and_lineno_columns() {
        let config = FormatterConfig {
            fixed: vec!["{levelname:<10s}".to_owned()],
            optional: vec!["{filename:>12}:{lineno:<4}".to_owned()],
            ..FormatterConfig::default()
        };
        let fmt = formatter(&config);
        let site = CallSite {
            file: "src/monitor.rs",
            line: 42,
            function: None,
        };
        let mut event = LogEvent::new(Severity::Info, "tb", "seen").with_call_site(site);
        let line = fmt.format(&mut event).expect("format");
        assert!(line.contains("  monitor.rs:42   |"), "got {:?}", line);
    }

    #[test]
    fn headers_and_dividers_are_byte_identical_across_renders() {
        let fmt = formatter(&bare_config());
        let mut header = LogEvent::header("tb", "regression run");
        let mut header_again = LogEvent::header("tb", "regression run");
        assert_eq!(
            fmt.format(&mut header).expect("format"),
            fmt.format(&mut header_again).expect("format")
        );

        let mut divider = LogEvent::divider("tb", "phase boundary");
        let rendered = fmt.format(&mut divider).expect("format");
        assert_eq!(rendered.len(), 120);
        assert!(rendered.contains("phase boundary"));
    }

    #[test]
    fn colour_wraps_the_severity_column_and_each_message_line() {
        use crate::colour::ansi;

        let fmt = colour_formatter(&bare_config());
        let mut event = LogEvent::new(Severity::Warning, "tb", "one\ntwo");
        let rendered = fmt.format(&mut event).expect("format");
        let warn_open = format!("{}{}", ansi::DEFAULT_BG, ansi::YELLOW_FG);
        assert!(rendered.contains(&format!("{}WARNING   {}", warn_open, ansi::DEFAULT)));
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert!(lines[0].ends_with(&format!("{}one{}", warn_open, ansi::DEFAULT)));
        assert!(lines[1].ends_with(&format!("{}two{}", warn_open, ansi::DEFAULT)));
    }

    #[test]
    fn colour_never_disturbs_column_widths() {
        use crate::colour::ansi;

        let fmt = colour_formatter(&bare_config());
        let mut event = LogEvent::new(Severity::Error, "tb", "x");
        let rendered = fmt.format(&mut event).expect("format");
        let stripped = rendered
            .replace(ansi::DEFAULT, "")
            .replace(ansi::DEFAULT_BG, "")
            .replace(ansi::RED_FG, "");
        assert_eq!(stripped, "       12.50ns | ERROR      | x");
    }

    #[test]
    fn deep_debug_with_colour_is_a_missing_mapping_error() {
        let fmt = colour_formatter(&bare_config());
        let mut event = LogEvent::new(Severity::DeepDebug, "tb", "x");
        let err = fmt.format(&mut event).expect_err("no mapping");
        assert!(matches!(err, FormatterError::MissingColour(_)));
    }

    #[test]
    fn process_override_forces_the_optional_layout() {
        let config = FormatterConfig {
            fixed: vec!["{levelname:<10s}".to_owned()],
            optional: vec!["{name:<12}".to_owned()],
            include_optional: Some(false),
            ..FormatterConfig::default()
        };
        let fmt = formatter(&config);
        let mut event = LogEvent::new(Severity::Info, "tb", "go");
        let line = fmt.format(&mut event).expect("format");
        assert_eq!(line, "INFO       | go");
        assert_eq!(event.include_optional, Some(false));
    }
}
