//! ---
//! ssc_section: "03-logger-facade"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Logger facade and process registry for SimScribe."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! The public logging facade.
//!
//! [`SimLogger`] exclusively owns one inner [`Logger`] and exposes an
//! enumerated set of passthroughs: level-gated emit per severity, level
//! mutation with change notification, and an explicit accessor for the inner
//! logger for everything else. There is no attribute-forwarding magic.

use std::fmt;

use simscribe_common::{CallSite, ExceptionInfo, LogEvent, Severity};

use crate::logger::Logger;
use crate::registry;
use crate::Result;

/// Hierarchical name specification for a new logger.
///
/// Resolves to `top[.module][.scope][.name][.0x{ident:x}]`; a `name` that
/// already starts with the top logger's name is taken verbatim.
#[derive(Debug, Default, Clone)]
pub struct LoggerName<'a> {
    module: Option<&'a str>,
    scope: Option<&'a str>,
    name: Option<&'a str>,
    ident: Option<u64>,
}

impl<'a> LoggerName<'a> {
    /// Empty specification, resolving to the top logger's name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the owning module name.
    pub fn with_module(mut self, module: &'a str) -> Self {
        self.module = Some(module);
        self
    }

    /// Attach an enclosing scope (a component or class-like grouping).
    pub fn with_scope(mut self, scope: &'a str) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Attach the leaf name.
    pub fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Attach a disambiguating instance identifier.
    pub fn with_ident(mut self, ident: u64) -> Self {
        self.ident = Some(ident);
        self
    }

    pub(crate) fn resolve(&self, top: &str) -> String {
        let mut resolved = match self.name {
            Some(name) if name.starts_with(top) => name.to_owned(),
            _ => {
                let mut parts = vec![top];
                if let Some(module) = self.module {
                    parts.push(module);
                }
                if let Some(scope) = self.scope {
                    parts.push(scope);
                }
                if let Some(name) = self.name {
                    parts.push(name);
                }
                parts.join(".")
            }
        };
        if let Some(ident) = self.ident {
            resolved.push_str(&format!(".0x{:x}", ident));
        }
        resolved
    }
}

/// Public logging facade owning exactly one inner [`Logger`].
#[derive(Debug)]
pub struct SimLogger {
    inner: Logger,
}

impl SimLogger {
    /// Wrap an explicitly-constructed inner logger.
    pub fn from_logger(inner: Logger) -> Self {
        Self { inner }
    }

    /// Build a logger named under the registry's top logger, inheriting its
    /// formatter, threshold and handlers.
    pub fn build(spec: LoggerName<'_>) -> Result<Self> {
        registry::new_logger(spec)
    }

    /// Fully-qualified logger name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Current severity threshold.
    pub fn level(&self) -> Severity {
        self.inner.level()
    }

    /// Cheap pre-check: would an event of this severity be emitted?
    pub fn will_log(&self, severity: Severity) -> bool {
        self.inner.is_enabled_for(severity)
    }

    /// Replace the threshold, firing level-change notifications when the
    /// effective level actually changes.
    pub fn set_level(&mut self, level: Severity) {
        let previous = self.inner.set_level(level);
        if previous != level {
            registry::notify_level_change(self.inner.name(), level);
        }
    }

    /// The wrapped logger, for operations the facade does not specialize.
    pub fn inner(&self) -> &Logger {
        &self.inner
    }

    /// Mutable access to the wrapped logger.
    pub fn inner_mut(&mut self) -> &mut Logger {
        &mut self.inner
    }

    /// Emit with severity `Critical`.
    #[track_caller]
    pub fn critical(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(Severity::Critical, args)
    }

    /// Emit with severity `Error`.
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(Severity::Error, args)
    }

    /// Emit with severity `Error`, attaching exception details.
    #[track_caller]
    pub fn exception(&self, exception: ExceptionInfo, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.will_log(Severity::Error) {
            return Ok(());
        }
        let site = CallSite::here();
        let mut event = LogEvent::new(Severity::Error, self.name(), args.to_string())
            .with_call_site(site)
            .with_exception(exception);
        self.inner.handle(&mut event)
    }

    /// Emit with severity `Warning`.
    #[track_caller]
    pub fn warning(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(Severity::Warning, args)
    }

    /// Emit with severity `Info`.
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(Severity::Info, args)
    }

    /// Emit with severity `Debug`.
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(Severity::Debug, args)
    }

    /// Emit with severity `DeepDebug`.
    #[track_caller]
    pub fn deep_debug(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(Severity::DeepDebug, args)
    }

    /// Emit at an explicit severity.
    #[track_caller]
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<()> {
        let site = CallSite::here();
        self.log_with_site(severity, site, args)
    }

    /// Emit at an explicit severity with the module path captured by an emit
    /// macro.
    #[track_caller]
    pub fn log_at(
        &self,
        severity: Severity,
        function: &'static str,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        let site = CallSite::here().with_function(function);
        self.log_with_site(severity, site, args)
    }

    /// Emit at an explicit severity with a pre-captured call site.
    pub fn log_with_site(
        &self,
        severity: Severity,
        site: CallSite,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        if !self.will_log(severity) {
            return Ok(());
        }
        let mut event = LogEvent::new(severity, self.name(), args.to_string()).with_call_site(site);
        self.inner.handle(&mut event)
    }

    /// Emit a fully-constructed event (custom attributes, stack text).
    pub fn emit(&self, event: &mut LogEvent) -> Result<()> {
        self.inner.handle(event)
    }

    /// Emit the message as a boxed header, gated at `Info`.
    pub fn header(&self, message: &str) -> Result<()> {
        if !self.will_log(Severity::Info) {
            return Ok(());
        }
        let mut event = LogEvent::header(self.name(), message);
        self.inner.handle(&mut event)
    }

    /// Emit the message as a centered divider, gated at `Info`.
    pub fn divider(&self, message: &str) -> Result<()> {
        if !self.will_log(Severity::Info) {
            return Ok(());
        }
        let mut event = LogEvent::divider(self.name(), message);
        self.inner.handle(&mut event)
    }
}
