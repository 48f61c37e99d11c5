// Append-only CSV logger for prediction + feedback events

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::record::{Record, COLUMNS};

/// Writes records to the shared monitoring table
pub struct PredictionLogger {
    log_path: PathBuf,
}

impl PredictionLogger {
    /// Create a logger; ensures the parent directory exists
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self { log_path })
    }

    /// Log one event. Validation failures surface as `MonitorError`.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        model_version: &str,
        model_type: &str,
        input_summary: &str,
        prediction: f64,
        latency_ms: Option<f64>,
        feedback_score: Option<i64>,
        feedback_text: Option<&str>,
    ) -> Result<()> {
        let record = Record::new(
            model_version,
            model_type,
            input_summary,
            prediction,
            latency_ms,
            feedback_score,
            feedback_text,
        )?;
        self.append(&record)
    }

    /// Append exactly one row, writing the header first if the file is empty.
    /// On an existing file the cells follow that file's header by name.
    pub fn append(&self, record: &Record) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open monitoring log: {}", self.log_path.display()))?;

        FileExt::lock_exclusive(&file)
            .with_context(|| format!("Failed to lock monitoring log: {}", self.log_path.display()))?;

        let written = write_locked(&self.log_path, &file, record);
        let unlocked = FileExt::unlock(&file);

        written?;
        unlocked.context("Failed to unlock monitoring log")?;

        debug!(
            model_version = %record.model_version,
            path = %self.log_path.display(),
            "Appended monitoring record"
        );
        Ok(())
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

// Header decision happens under the lock so two first writers can't both add one
fn write_locked(path: &Path, file: &File, record: &Record) -> Result<()> {
    let len = file
        .metadata()
        .context("Failed to stat monitoring log")?
        .len();

    let row = if len == 0 {
        None
    } else {
        let header = existing_header(path)?;
        let row = record.to_row_for(header.iter())?;
        if !ends_with_newline(path, len)? {
            debug!(path = %path.display(), "Monitoring log lacks a final newline; terminating last row");
            let mut out = file;
            out.write_all(b"\n")
                .context("Failed to terminate last monitoring row")?;
        }
        Some(row)
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    let written = match row {
        Some(row) => writer.write_record(&row),
        None => {
            writer
                .write_record(COLUMNS)
                .context("Failed to write log header")?;
            writer.write_record(record.to_row())
        }
    };
    written.context("Failed to write monitoring record")?;
    writer.flush().context("Failed to flush monitoring log")?;

    file.sync_data().context("Failed to sync monitoring log")?;
    Ok(())
}

// Appends keep whatever header the file was created with
fn existing_header(path: &Path) -> Result<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open monitoring log: {}", path.display()))?;

    let header = reader
        .headers()
        .with_context(|| format!("Failed to read log header: {}", path.display()))?
        .clone();
    Ok(header)
}

fn ends_with_newline(path: &Path, len: u64) -> Result<bool> {
    let mut tail = File::open(path)
        .with_context(|| format!("Failed to open monitoring log: {}", path.display()))?;
    tail.seek(SeekFrom::Start(len - 1))
        .context("Failed to seek monitoring log")?;

    let mut last = [0u8; 1];
    tail.read_exact(&mut last)
        .context("Failed to read monitoring log")?;
    Ok(last[0] == b'\n')
}
