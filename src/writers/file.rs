//! File writer implementation

use crate::core::{Encoder, Filter, LoggerError, Result, Writer};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Appends payloads to a file through a buffered handle
///
/// The file is locked exclusively for the writer's lifetime so two
/// processes never interleave lines in the same log.
pub struct FileWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    encoder: Option<Arc<dyn Encoder>>,
    filter: Option<Arc<dyn Filter>>,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            encoder: None,
            filter: None,
        })
    }

    /// Attach the encoder an [`AsyncWriter`](crate::AsyncWriter) applies
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_pattern_logger::{FileWriter, PatternEncoder};
    ///
    /// let writer = FileWriter::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_encoder(PatternEncoder::new("#date{2006-01-02T15:04:05} #level #message").unwrap());
    /// ```
    #[must_use]
    pub fn with_encoder<E: Encoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    #[must_use]
    pub fn with_filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Writer for FileWriter {
    fn write(&mut self, payload: &[u8]) -> Result<usize> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;
        writer.write_all(payload)?;
        Ok(payload.len())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn encoder(&self) -> Option<Arc<dyn Encoder>> {
        self.encoder.clone()
    }

    fn filter(&self) -> Option<Arc<dyn Filter>> {
        self.filter.clone()
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        let _ = self.flush();
        if let Some(writer) = self.writer.take() {
            let _ = writer.get_ref().unlock();
        }
    }
}
