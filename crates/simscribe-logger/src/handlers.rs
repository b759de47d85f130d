//! ---
//! ssc_section: "03-logger-facade"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Logger facade and process registry for SimScribe."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! Output sinks receiving rendered event blocks.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Sink receiving one rendered block per event.
///
/// Handlers are shared between loggers, so emission takes `&self`; each
/// implementation guards its own writer.
pub trait LogHandler: Send + Sync + std::fmt::Debug {
    /// Append one rendered event block, followed by a line break.
    fn emit(&self, block: &str) -> io::Result<()>;
}

/// Writes rendered blocks to stdout.
#[derive(Debug, Default)]
pub struct ConsoleHandler;

impl ConsoleHandler {
    /// Handler bound to the process stdout.
    pub fn new() -> Self {
        Self
    }
}

impl LogHandler for ConsoleHandler {
    fn emit(&self, block: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", block)
    }
}

/// Appends rendered blocks to a log file.
#[derive(Debug)]
pub struct FileHandler {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileHandler {
    /// Open (or create) the log file for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogHandler for FileHandler {
    fn emit(&self, block: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", block)?;
        writer.flush()
    }
}

/// Captures rendered blocks in memory; intended for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHandler {
    blocks: Arc<Mutex<Vec<String>>>,
}

impl MemoryHandler {
    /// Empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured block, in emission order.
    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().clone()
    }

    /// Most recently captured block.
    pub fn last(&self) -> Option<String> {
        self.blocks.lock().last().cloned()
    }

    /// Drop every captured block.
    pub fn clear(&self) {
        self.blocks.lock().clear();
    }
}

impl LogHandler for MemoryHandler {
    fn emit(&self, block: &str) -> io::Result<()> {
        self.blocks.lock().push(block.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_handler_captures_blocks_in_order() {
        let handler = MemoryHandler::new();
        handler.emit("first").expect("emit");
        handler.emit("second").expect("emit");
        assert_eq!(handler.blocks(), vec!["first", "second"]);
        assert_eq!(handler.last().as_deref(), Some("second"));
        handler.clear();
        assert!(handler.blocks().is_empty());
    }

    #[test]
    fn file_handler_appends_one_block_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs").join("sim.log");
        let handler = FileHandler::open(&path).expect("open");
        handler.emit("line one").expect("emit");
        handler.emit("line two\ncontinued").expect("emit");

        let contents = std::fs::read_to_string(handler.path()).expect("read back");
        assert_eq!(contents, "line one\nline two\ncontinued\n");
    }
}
