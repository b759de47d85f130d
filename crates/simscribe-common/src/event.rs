//! ---
//! ssc_section: "01-core-types"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Shared core types for the SimScribe workspace."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
use std::panic::Location;

use indexmap::IndexMap;

use crate::severity::Severity;

/// Value shapes a column placeholder can render.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text field, e.g. the logger name.
    Str(String),
    /// Integer field, e.g. a line number.
    Int(i64),
    /// Floating-point field, e.g. a resolved sim time before formatting.
    Float(f64),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// Code location captured at the emit call site.
///
/// Captured through `#[track_caller]` (file and line) plus `module_path!`
/// from the emit macros; there is no runtime stack walking anywhere.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    /// Source file as reported by the compiler.
    pub file: &'static str,
    /// 1-based line number of the emit call.
    pub line: u32,
    /// Module path of the emitting code, when captured by a macro.
    pub function: Option<&'static str>,
}

impl CallSite {
    /// Capture the caller's location.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            function: None,
        }
    }

    /// Attach the emitting module path.
    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// File name without its directory components.
    pub fn filename(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

/// Exception details attached to an event.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionInfo {
    /// Error kind or type name.
    pub kind: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional multi-line trace appended beneath the kind/message line.
    pub trace: Option<String>,
}

impl ExceptionInfo {
    /// Exception with a kind and message only.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: None,
        }
    }

    /// Attach a trace block.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Render the block appended beneath the log line.
    pub fn render(&self) -> String {
        let mut text = format!("{}: {}", self.kind, self.message);
        if let Some(trace) = &self.trace {
            text.push('\n');
            text.push_str(trace.trim_end_matches('\n'));
        }
        text
    }
}

/// One transient log occurrence, consumed by exactly one render pass.
///
/// The `include_optional`, `prefix` and `exc_text` fields are render caches:
/// the first `format` call fills them and every later render of the same
/// event (exception text, stack text) reuses the cached values so the column
/// layout cannot shift mid-event. Events must not be shared across
/// concurrent render calls; the formatter takes `&mut LogEvent` to make that
/// a compile-time guarantee.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Severity of the occurrence.
    pub severity: Severity,
    /// Name of the emitting logger.
    pub name: String,
    /// Rendered message text (may span multiple lines).
    pub message: String,
    /// Emit call site, when captured.
    pub call_site: Option<CallSite>,
    /// Exception attached to the event.
    pub exception: Option<ExceptionInfo>,
    /// Pre-rendered stack text attached to the event.
    pub stack: Option<String>,
    /// Dynamic attributes available to column and prefix templates.
    pub attrs: IndexMap<String, FieldValue>,
    /// Render the message as a boxed header instead of a columnar line.
    pub header: bool,
    /// Render the message as a centered divider instead of a columnar line.
    pub divider: bool,
    /// Tri-state optional-column decision; cached by the first render.
    pub include_optional: Option<bool>,
    /// Rendered prefix cache, filled by the first render.
    pub prefix: Option<String>,
    /// Rendered exception text cache, filled by the first render.
    pub exc_text: Option<String>,
}

impl LogEvent {
    /// Standard columnar event.
    pub fn new(severity: Severity, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            name: name.into(),
            message: message.into(),
            call_site: None,
            exception: None,
            stack: None,
            attrs: IndexMap::new(),
            header: false,
            divider: false,
            include_optional: None,
            prefix: None,
            exc_text: None,
        }
    }

    /// Event rendered as a boxed header.
    pub fn header(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut event = Self::new(Severity::Info, name, message);
        event.header = true;
        event
    }

    /// Event rendered as a centered divider.
    pub fn divider(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut event = Self::new(Severity::Info, name, message);
        event.divider = true;
        event
    }

    /// Attach the emit call site.
    pub fn with_call_site(mut self, site: CallSite) -> Self {
        self.call_site = Some(site);
        self
    }

    /// Attach exception details.
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Attach pre-rendered stack text.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attach a dynamic attribute visible to column and prefix templates.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Force the optional-column decision instead of leaving it per-event.
    pub fn with_optional_columns(mut self, include: bool) -> Self {
        self.include_optional = Some(include);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_site_reports_short_filename() {
        let site = CallSite::here();
        assert!(site.file.ends_with("event.rs"));
        assert_eq!(site.filename(), "event.rs");
        assert!(site.line > 0);
    }

    #[test]
    fn exception_renders_kind_message_and_trace() {
        let exc = ExceptionInfo::new("TimeoutError", "no response after 100ns")
            .with_trace("at dut.axi.read\nat testbench.run\n");
        assert_eq!(
            exc.render(),
            "TimeoutError: no response after 100ns\nat dut.axi.read\nat testbench.run"
        );
    }

    #[test]
    fn builder_attaches_attributes_in_order() {
        let event = LogEvent::new(Severity::Debug, "tb.dut", "sampled")
            .with_attr("channel", "axi0")
            .with_attr("beat", 7u32);
        let keys: Vec<_> = event.attrs.keys().cloned().collect();
        assert_eq!(keys, vec!["channel", "beat"]);
        assert_eq!(event.attrs["beat"], FieldValue::Int(7));
    }
}
