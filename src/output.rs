//! Output management module
//!
//! Sinks that receive flushed credential lines, and the in-memory buffer
//! that batches lines between flushes.

use crate::filter::OutputFormat;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default flush threshold for the output buffer (10MB)
pub const DEFAULT_FLUSH_THRESHOLD: usize = 10 * 1024 * 1024;

/// Destination for extracted lines
pub trait OutputSink {
    /// Append bytes to the end of the output
    fn append(&mut self, data: &[u8]) -> io::Result<()>;

    /// Finish writing; called once after the final flush
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Human-readable name for logs and results
    fn identifier(&self) -> String;
}

/// File sink, truncated when opened
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Create the file, or truncate it if it already exists
    pub fn create(path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self { file, path })
    }
}

impl OutputSink for FileSink {
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    fn close(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn identifier(&self) -> String {
        self.path.display().to_string()
    }
}

impl OutputSink for Vec<u8> {
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }

    fn identifier(&self) -> String {
        "<memory>".to_string()
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).append(data)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn identifier(&self) -> String {
        (**self).identifier()
    }
}

/// Formatted lines waiting to be flushed, in emission order
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: String,
    lines: u64,
}

impl OutputBuffer {
    /// Append one line plus terminator
    pub fn push_line(&mut self, line: &str) {
        self.data.push_str(line);
        self.data.push('\n');
        self.lines += 1;
    }

    /// Buffered size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Buffered line count
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Drop the contents but keep the allocation
    pub fn clear(&mut self) {
        self.data.clear();
        self.lines = 0;
    }
}

/// Generate the result filename for an input: `result_<stem>_<format>.txt`
pub fn generate_output_name(input: &Path, format: OutputFormat) -> String {
    let stem = input.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    format!("result_{}_{}.txt", stem, format)
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
