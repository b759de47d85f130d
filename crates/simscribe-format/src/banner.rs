//! ---
//! ssc_section: "02-format-engine"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Columnar rendering engine for SimScribe log events."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! Boxed headers and centered dividers — the two non-columnar record kinds.

use crate::{FormatterError, Result};

/// Renderer for header and divider records.
#[derive(Debug, Clone)]
pub struct Banner {
    width: usize,
    chunk_width: usize,
    rule: String,
}

impl Banner {
    /// Build a banner renderer for the given divider width.
    ///
    /// The width must leave room for the `-- ` / ` --` frame around header
    /// chunks, so anything below 7 is a configuration error.
    pub fn new(width: usize) -> Result<Self> {
        if width < 7 {
            return Err(FormatterError::Configuration(format!(
                "divider width must be at least 7, got {}",
                width
            )));
        }
        Ok(Self {
            width,
            chunk_width: width - 6,
            rule: "-".repeat(width),
        })
    }

    /// Configured banner width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Render a message as a boxed header.
    ///
    /// Each message line is word-wrapped into chunks of at most
    /// `width - 6` characters and framed as `-- chunk --`, between two full
    /// divider rules.
    pub fn header(&self, message: &str) -> String {
        let mut out = String::from("\n");
        out.push_str(&self.rule);
        for line in message.split('\n') {
            for chunk in wrap_words(line, self.chunk_width) {
                out.push('\n');
                out.push_str(&format!("-- {:<w$} --", chunk, w = self.chunk_width));
            }
        }
        out.push('\n');
        out.push_str(&self.rule);
        out
    }

    /// Render a message centered inside one divider line.
    pub fn divider(&self, message: &str) -> String {
        format!("{:-^w$}", message, w = self.width)
    }
}

/// Greedy word wrap; words longer than `width` are split hard.
fn wrap_words(line: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        if !current.is_empty() && current.chars().count() + 1 + word_len > width {
            chunks.push(std::mem::take(&mut current));
        }
        if word_len > width {
            // hard-split a word that cannot fit on any line
            let mut rest: Vec<char> = word.chars().collect();
            while !rest.is_empty() {
                let used = current.chars().count() + usize::from(!current.is_empty());
                let room = width.saturating_sub(used);
                if room == 0 {
                    chunks.push(std::mem::take(&mut current));
                    continue;
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                let take = room.min(rest.len());
                current.extend(rest.drain(..take));
                if !rest.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
