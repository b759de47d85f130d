//! ---
//! ssc_section: "03-logger-facade"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Logger facade and process registry for SimScribe."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! The process-scoped logging registry.
//!
//! One explicit state object with an init/teardown lifecycle: the top
//! logger, the shared formatter and handlers, callbacks queued before init
//! (flushed exactly once, in registration order), and level-change
//! notification records. A second `init` call fails with
//! [`LoggerError::AlreadyInitialized`].

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use simscribe_common::config::LoggingConfig;
use simscribe_common::{CallSite, ExceptionInfo, Severity, SimTimeSource};
use simscribe_format::{ColumnFormatter, SeverityPalette};

use crate::facade::{LoggerName, SimLogger};
use crate::handlers::{ConsoleHandler, FileHandler, LogHandler};
use crate::logger::Logger;
use crate::{LoggerError, Result};

type InitCallback = Box<dyn FnOnce() + Send>;
type LevelCallback = Arc<dyn Fn(Severity) + Send + Sync>;

struct NotifyRecord {
    logger: String,
    level: Severity,
    callback: LevelCallback,
}

struct RegistryState {
    top_name: Option<String>,
    top: Option<Arc<Mutex<SimLogger>>>,
    formatter: Option<Arc<ColumnFormatter>>,
    level: Severity,
    handlers: Vec<Arc<dyn LogHandler>>,
    init_cbs: Vec<InitCallback>,
    notify_cbs: Vec<NotifyRecord>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            top_name: None,
            top: None,
            formatter: None,
            level: Severity::Info,
            handlers: Vec::new(),
            init_cbs: Vec::new(),
            notify_cbs: Vec::new(),
        }
    }
}

// Callbacks always run with the registry lock released, so they are free to
// create loggers or emit through the top logger.
static STATE: Lazy<Mutex<RegistryState>> = Lazy::new(|| Mutex::new(RegistryState::default()));

fn build_stack(
    config: &LoggingConfig,
    clock: Arc<dyn SimTimeSource>,
) -> Result<(Arc<ColumnFormatter>, Vec<Arc<dyn LogHandler>>, Severity)> {
    let palette = config.colour.enabled().then(SeverityPalette::standard);
    let formatter = Arc::new(ColumnFormatter::new(&config.formatter, palette, clock)?);
    let mut handlers: Vec<Arc<dyn LogHandler>> = Vec::new();
    if config.handlers.console {
        handlers.push(Arc::new(ConsoleHandler::new()));
    }
    if let Some(path) = &config.handlers.file {
        handlers.push(Arc::new(FileHandler::open(path)?));
    }
    Ok((formatter, handlers, config.effective_level()))
}

/// Initialize process-wide logging and return the top logger.
///
/// Fails with [`LoggerError::AlreadyInitialized`] on a second call; the
/// configuration is compiled fail-fast before any state changes, so a
/// rejected setup leaves the registry untouched. Callbacks queued with
/// [`on_init`] run exactly once, in registration order, before this
/// returns.
pub fn init(
    top: &str,
    config: &LoggingConfig,
    clock: Arc<dyn SimTimeSource>,
) -> Result<Arc<Mutex<SimLogger>>> {
    let (formatter, handlers, level) = build_stack(config, clock)?;

    let (top_logger, pending) = {
        let mut state = STATE.lock();
        if let Some(existing) = &state.top_name {
            return Err(LoggerError::AlreadyInitialized(existing.clone()));
        }
        let mut logger = Logger::new(top, level, formatter.clone());
        for handler in &handlers {
            logger.add_handler(handler.clone());
        }
        let top_logger = Arc::new(Mutex::new(SimLogger::from_logger(logger)));
        state.top_name = Some(top.to_owned());
        state.top = Some(top_logger.clone());
        state.formatter = Some(formatter);
        state.level = level;
        state.handlers = handlers;
        (top_logger, std::mem::take(&mut state.init_cbs))
    };

    for callback in pending {
        callback();
    }
    Ok(top_logger)
}

/// Replace the formatter, handlers and threshold of the running registry.
///
/// Fails with [`LoggerError::NotInitialized`] before [`init`].
pub fn configure(config: &LoggingConfig, clock: Arc<dyn SimTimeSource>) -> Result<()> {
    let (formatter, handlers, level) = build_stack(config, clock)?;

    let top = {
        let mut state = STATE.lock();
        if state.top_name.is_none() {
            return Err(LoggerError::NotInitialized);
        }
        state.formatter = Some(formatter.clone());
        state.level = level;
        state.handlers = handlers.clone();
        state.top.clone()
    };
    if let Some(top) = top {
        top.lock()
            .inner_mut()
            .reconfigure(level, formatter, handlers);
    }
    Ok(())
}

/// Tear the registry down, dropping the top logger and every callback.
///
/// Primarily for tests and embedding hosts that restart the simulator
/// in-process; idempotent.
pub fn teardown() {
    let mut state = STATE.lock();
    *state = RegistryState::default();
}

/// Whether `init` has completed.
pub fn is_initialized() -> bool {
    STATE.lock().top_name.is_some()
}

/// Name passed to `init`, when initialized.
pub fn top_name() -> Option<String> {
    STATE.lock().top_name.clone()
}

/// The top logger, shared process-wide.
pub fn top_logger() -> Result<Arc<Mutex<SimLogger>>> {
    STATE.lock().top.clone().ok_or(LoggerError::NotInitialized)
}

/// Build a logger named under the top logger, inheriting the registry's
/// formatter, threshold and handlers.
pub fn new_logger(spec: LoggerName<'_>) -> Result<SimLogger> {
    let state = STATE.lock();
    let top = state.top_name.as_deref().ok_or(LoggerError::NotInitialized)?;
    let formatter = state.formatter.clone().ok_or(LoggerError::NotInitialized)?;
    let mut logger = Logger::new(spec.resolve(top), state.level, formatter);
    for handler in &state.handlers {
        logger.add_handler(handler.clone());
    }
    Ok(SimLogger::from_logger(logger))
}

/// Run a callback once logging is initialized.
///
/// Registered before [`init`], the callback is queued and flushed during
/// `init` in registration order; afterwards it runs immediately.
pub fn on_init<F>(callback: F)
where
    F: FnOnce() + Send + 'static,
{
    let immediate = {
        let mut state = STATE.lock();
        if state.top_name.is_some() {
            Some(callback)
        } else {
            state.init_cbs.push(Box::new(callback));
            None
        }
    };
    if let Some(callback) = immediate {
        callback();
    }
}

/// Register a callback fired whenever the named logger's effective level
/// changes.
pub fn on_level_change<F>(logger: &SimLogger, callback: F)
where
    F: Fn(Severity) + Send + Sync + 'static,
{
    let mut state = STATE.lock();
    state.notify_cbs.push(NotifyRecord {
        logger: logger.name().to_owned(),
        level: logger.level(),
        callback: Arc::new(callback),
    });
}

/// Fire registered callbacks for a logger whose level moved to `level`.
pub(crate) fn notify_level_change(name: &str, level: Severity) {
    let to_fire: Vec<LevelCallback> = {
        let mut state = STATE.lock();
        state
            .notify_cbs
            .iter_mut()
            .filter(|record| record.logger == name && record.level != level)
            .map(|record| {
                record.level = level;
                record.callback.clone()
            })
            .collect()
    };
    for callback in to_fire {
        callback(level);
    }
}

/// Replace the top logger's threshold, firing change notifications.
pub fn set_top_level(level: Severity) -> Result<()> {
    let top = top_logger()?;
    top.lock().set_level(level);
    Ok(())
}

#[track_caller]
fn emit_top(severity: Severity, args: fmt::Arguments<'_>) -> Result<()> {
    let site = CallSite::here();
    let top = top_logger()?;
    let guard = top.lock();
    guard.log_with_site(severity, site, args)
}

/// Emit through the top logger with severity `Critical`.
#[track_caller]
pub fn critical(args: fmt::Arguments<'_>) -> Result<()> {
    emit_top(Severity::Critical, args)
}

/// Emit through the top logger with severity `Error`.
#[track_caller]
pub fn error(args: fmt::Arguments<'_>) -> Result<()> {
    emit_top(Severity::Error, args)
}

/// Emit through the top logger with severity `Error` plus exception details.
#[track_caller]
pub fn exception(exception: ExceptionInfo, args: fmt::Arguments<'_>) -> Result<()> {
    let top = top_logger()?;
    let guard = top.lock();
    guard.exception(exception, args)
}

/// Emit through the top logger with severity `Warning`.
#[track_caller]
pub fn warning(args: fmt::Arguments<'_>) -> Result<()> {
    emit_top(Severity::Warning, args)
}

/// Emit through the top logger with severity `Info`.
#[track_caller]
pub fn info(args: fmt::Arguments<'_>) -> Result<()> {
    emit_top(Severity::Info, args)
}

/// Emit through the top logger with severity `Debug`.
#[track_caller]
pub fn debug(args: fmt::Arguments<'_>) -> Result<()> {
    emit_top(Severity::Debug, args)
}

/// Emit through the top logger with severity `DeepDebug`.
#[track_caller]
pub fn deep_debug(args: fmt::Arguments<'_>) -> Result<()> {
    emit_top(Severity::DeepDebug, args)
}
