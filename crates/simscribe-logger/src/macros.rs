//! ---
//! ssc_section: "03-logger-facade"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Logger facade and process registry for SimScribe."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! Emit macros capturing the caller's module path into the event call site.
//!
//! Each macro evaluates to the emit `Result`, so callers decide whether to
//! propagate or ignore handler failures.

/// Emit a critical line through a [`crate::SimLogger`].
#[macro_export]
macro_rules! sim_critical {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at($crate::Severity::Critical, module_path!(), format_args!($($arg)+))
    };
}

/// Emit an error line through a [`crate::SimLogger`].
#[macro_export]
macro_rules! sim_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at($crate::Severity::Error, module_path!(), format_args!($($arg)+))
    };
}

/// Emit a warning line through a [`crate::SimLogger`].
#[macro_export]
macro_rules! sim_warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at($crate::Severity::Warning, module_path!(), format_args!($($arg)+))
    };
}

/// Emit an informational line through a [`crate::SimLogger`].
#[macro_export]
macro_rules! sim_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at($crate::Severity::Info, module_path!(), format_args!($($arg)+))
    };
}

/// Emit a debug line through a [`crate::SimLogger`].
#[macro_export]
macro_rules! sim_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at($crate::Severity::Debug, module_path!(), format_args!($($arg)+))
    };
}

/// Emit a deep-debug line through a [`crate::SimLogger`].
#[macro_export]
macro_rules! sim_deep_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at($crate::Severity::DeepDebug, module_path!(), format_args!($($arg)+))
    };
}
