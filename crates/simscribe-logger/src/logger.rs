//! ---
//! ssc_section: "03-logger-facade"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Logger facade and process registry for SimScribe."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! The inner logger: a named severity gate in front of a formatter and its
//! handlers.

use std::sync::Arc;

use simscribe_common::{LogEvent, Severity};
use simscribe_format::ColumnFormatter;

use crate::handlers::LogHandler;
use crate::Result;

/// Severity-gated pipeline from one event to every registered handler.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: Severity,
    formatter: Arc<ColumnFormatter>,
    handlers: Vec<Arc<dyn LogHandler>>,
}

impl Logger {
    /// Logger with no handlers attached yet.
    pub fn new(name: impl Into<String>, level: Severity, formatter: Arc<ColumnFormatter>) -> Self {
        Self {
            name: name.into(),
            level,
            formatter,
            handlers: Vec::new(),
        }
    }

    /// Attach a handler, builder style.
    pub fn with_handler(mut self, handler: Arc<dyn LogHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Attach a handler.
    pub fn add_handler(&mut self, handler: Arc<dyn LogHandler>) {
        self.handlers.push(handler);
    }

    /// Fully-qualified logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current severity threshold.
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Replace the severity threshold, returning the previous one.
    pub fn set_level(&mut self, level: Severity) -> Severity {
        std::mem::replace(&mut self.level, level)
    }

    /// Whether an event of this severity would be emitted.
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    /// Shared formatter state.
    pub fn formatter(&self) -> &Arc<ColumnFormatter> {
        &self.formatter
    }

    /// Swap in new formatter state and handlers (reconfiguration path).
    pub fn reconfigure(
        &mut self,
        level: Severity,
        formatter: Arc<ColumnFormatter>,
        handlers: Vec<Arc<dyn LogHandler>>,
    ) {
        self.level = level;
        self.formatter = formatter;
        self.handlers = handlers;
    }

    /// Format the event and append the rendered block to every handler.
    ///
    /// Events below the threshold are dropped before any rendering work.
    pub fn handle(&self, event: &mut LogEvent) -> Result<()> {
        if !self.is_enabled_for(event.severity) {
            return Ok(());
        }
        let block = self.formatter.format(event)?;
        for handler in &self.handlers {
            handler.emit(&block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::MemoryHandler;
    use simscribe_common::config::FormatterConfig;
    use simscribe_common::ManualSimClock;

    fn test_logger(level: Severity) -> (Logger, MemoryHandler) {
        let config = FormatterConfig {
            fixed: vec!["{levelname:<10s}".to_owned()],
            optional: Vec::new(),
            ..FormatterConfig::default()
        };
        let clock = Arc::new(ManualSimClock::new());
        let formatter = Arc::new(ColumnFormatter::new(&config, None, clock).expect("formatter"));
        let capture = MemoryHandler::new();
        let logger =
            Logger::new("tb", level, formatter).with_handler(Arc::new(capture.clone()));
        (logger, capture)
    }

    #[test]
    fn events_below_the_threshold_are_dropped() {
        let (logger, capture) = test_logger(Severity::Warning);
        let mut event = LogEvent::new(Severity::Info, "tb", "quiet");
        logger.handle(&mut event).expect("handle");
        assert!(capture.blocks().is_empty());

        let mut event = LogEvent::new(Severity::Error, "tb", "loud");
        logger.handle(&mut event).expect("handle");
        assert_eq!(capture.blocks(), vec!["ERROR      | loud"]);
    }

    #[test]
    fn set_level_opens_and_closes_the_gate() {
        let (mut logger, capture) = test_logger(Severity::Info);
        assert!(logger.is_enabled_for(Severity::Info));
        assert!(!logger.is_enabled_for(Severity::Debug));

        let previous = logger.set_level(Severity::DeepDebug);
        assert_eq!(previous, Severity::Info);
        let mut event = LogEvent::new(Severity::DeepDebug, "tb", "chatty");
        logger.handle(&mut event).expect("handle");
        assert_eq!(capture.blocks().len(), 1);
    }
}
