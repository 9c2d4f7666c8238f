//! Record sinks: console, append-only file, in-memory, and fan-out

use crate::config::OutputConfig;
use crate::model::CompletedRecord;
use crate::output::text::render_text;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tokio::io::AsyncWriteExt;

/// Prints rendered records to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl RecordSink for ConsoleSink {
    async fn emit(&self, record: &CompletedRecord) -> OutputResult<()> {
        let text = render_text(record);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        Ok(())
    }
}

/// Appends rendered records to one file
///
/// All writes to the destination go through this sink's lock, so records are
/// never interleaved.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: tokio::sync::Mutex<tokio::fs::File>,
}

impl FileSink {
    /// Opens `path` for appending, creating it if needed
    pub async fn open(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| OutputError::Write {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self {
            path,
            file: tokio::sync::Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for FileSink {
    async fn emit(&self, record: &CompletedRecord) -> OutputResult<()> {
        let mut text = render_text(record);
        text.push('\n');

        let mut file = self.file.lock().await;
        append(&mut file, text.as_bytes())
            .await
            .map_err(|source| OutputError::Write {
                path: self.path.display().to_string(),
                source,
            })
    }
}

async fn append(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<CompletedRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record received so far
    pub fn records(&self) -> Vec<CompletedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn emit(&self, record: &CompletedRecord) -> OutputResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Forwards each record to every inner sink
///
/// A failing sink does not stop the others; the first error is returned.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl RecordSink for FanoutSink {
    async fn emit(&self, record: &CompletedRecord) -> OutputResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.emit(record).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Builds the sinks named by the output configuration
pub async fn build_sink(config: &OutputConfig) -> OutputResult<FanoutSink> {
    let mut sink = FanoutSink::new();
    if config.console {
        sink = sink.with(ConsoleSink);
    }
    if let Some(path) = &config.file_path {
        sink = sink.with(FileSink::open(path).await?);
    }
    if sink.is_empty() {
        tracing::warn!("No output sinks configured, records will be discarded");
    }
    Ok(sink)
}
