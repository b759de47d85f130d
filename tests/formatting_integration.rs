//! ---
//! ssc_section: "05-integration-tests"
//! ssc_subsection: "integration-tests"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "End-to-end rendering tests through the public logging surface."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
use std::sync::Arc;

use simscribe_common::config::FormatterConfig;
use simscribe_common::{ExceptionInfo, ManualSimClock, Severity};
use simscribe_format::{ColumnFormatter, SeverityPalette};
use simscribe_logger::facade::SimLogger;
use simscribe_logger::{Logger, MemoryHandler};

fn build_facade(
    name: &str,
    palette: Option<SeverityPalette>,
    femtos: u64,
) -> (SimLogger, MemoryHandler) {
    let config = FormatterConfig::default();
    let clock = Arc::new(ManualSimClock::starting_at(femtos));
    let formatter = Arc::new(ColumnFormatter::new(&config, palette, clock).expect("formatter"));
    let capture = MemoryHandler::new();
    let logger =
        Logger::new(name, Severity::DeepDebug, formatter).with_handler(Arc::new(capture.clone()));
    (SimLogger::from_logger(logger), capture)
}

/// Drop ANSI escape sequences, keeping only the visible text.
fn strip_ansi(text: &str) -> String {
    let mut visible = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for inner in chars.by_ref() {
                if inner == 'm' {
                    break;
                }
            }
        } else {
            visible.push(c);
        }
    }
    visible
}

#[test]
fn sim_time_column_matches_a_plain_numeric_render() {
    let (logger, capture) = build_facade("sim.tb", None, 12_250_000); // 12.25 ns
    logger.info(format_args!("hello")).expect("emit");
    let block = capture.last().expect("block");
    // {:>6.2f}ns applied to 12.25, then right-aligned into the 14-wide column
    assert!(block.starts_with("       12.25ns | INFO       | "), "got {:?}", block);
    assert!(block.ends_with("| hello"));
}

#[test]
fn optional_columns_blank_pad_absent_fields_to_their_full_width() {
    let (logger, capture) = build_facade("sim.tb.monitor", None, 0);
    // no call site: filename/lineno and funcName stay absent while name renders
    let mut event = simscribe_common::LogEvent::new(Severity::Info, "sim.tb.monitor", "go");
    logger.emit(&mut event).expect("emit");
    let block = capture.last().expect("block");

    let parts: Vec<&str> = block.split(" | ").collect();
    assert_eq!(parts.len(), 6, "got {:?}", block);
    assert_eq!(parts[2].len(), 35);
    assert!(parts[2].starts_with("sim.tb.monitor"));
    assert_eq!(parts[3], " ".repeat(25), "filename:lineno column blank-pads");
    assert_eq!(parts[4], " ".repeat(31), "funcName column blank-pads");
    assert_eq!(parts[5], "go");
}

#[test]
fn emit_macros_fill_the_call_site_columns() {
    let (logger, capture) = build_facade("sim.tb", None, 0);
    simscribe_logger::sim_info!(logger, "beat {}", 7).expect("emit");
    let block = capture.last().expect("block");
    assert!(block.contains("integration.rs:"), "got {:?}", block);
    assert!(block.ends_with("| beat 7"));
}

#[test]
fn exception_blocks_align_under_the_message_column() {
    let (logger, capture) = build_facade("sim.tb", None, 0);
    logger
        .exception(
            ExceptionInfo::new("TimeoutError", "no response").with_trace("at dut.bus.read"),
            format_args!("transfer failed"),
        )
        .expect("emit");
    let block = capture.last().expect("block");
    let lines: Vec<&str> = block.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("| transfer failed"));

    let indent = logger
        .inner()
        .formatter()
        .continuation_indent(true, false);
    assert_eq!(lines[1], format!("{}TimeoutError: no response", indent));
    assert_eq!(lines[2], format!("{}at dut.bus.read", indent));
}

#[test]
fn colour_decoration_never_changes_the_visible_layout() {
    let (plain, plain_capture) = build_facade("sim.tb", None, 5_000_000);
    let (coloured, coloured_capture) =
        build_facade("sim.tb", Some(SeverityPalette::standard()), 5_000_000);

    for severity in [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ] {
        // identical events (no call site) so only the decoration differs
        let mut plain_event = simscribe_common::LogEvent::new(severity, "sim.tb", "multi\nline payload");
        plain.emit(&mut plain_event).expect("emit");
        let mut coloured_event =
            simscribe_common::LogEvent::new(severity, "sim.tb", "multi\nline payload");
        coloured.emit(&mut coloured_event).expect("emit");

        let plain_block = plain_capture.last().expect("plain block");
        let coloured_block = coloured_capture.last().expect("coloured block");
        assert_ne!(plain_block, coloured_block);
        assert_eq!(strip_ansi(&coloured_block), plain_block);
    }
}

#[test]
fn second_render_of_one_event_reuses_the_cached_layout() {
    let config = FormatterConfig::default();
    let clock = Arc::new(ManualSimClock::new());
    let formatter = Arc::new(ColumnFormatter::new(&config, None, clock).expect("formatter"));
    let mut event = simscribe_common::LogEvent::new(Severity::Info, "sim.tb", "steady");
    let first = formatter.format(&mut event).expect("format");
    let decided = event.include_optional;
    let second = formatter.format(&mut event).expect("format");
    assert_eq!(first, second);
    assert_eq!(event.include_optional, decided);
}

#[test]
fn headers_and_dividers_render_deterministically_through_the_facade() {
    let (logger, capture) = build_facade("sim.tb", None, 0);
    logger.header("nightly regression").expect("emit");
    logger.header("nightly regression").expect("emit");
    let blocks = capture.blocks();
    assert_eq!(blocks[0], blocks[1]);
    for line in blocks[0].split('\n').skip(1) {
        assert!(line.len() <= 120, "banner line too wide: {:?}", line);
    }

    logger.divider("end of run").expect("emit");
    let divider = capture.last().expect("divider");
    assert_eq!(divider.len(), 120);
    assert!(divider.starts_with('-') && divider.ends_with('-'));
    assert!(divider.contains("end of run"));
}
