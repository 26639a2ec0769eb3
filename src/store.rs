//! # Store
//!
//! Owns the on-disk representation of one entity collection: a UTF-8 text
//! file with a header line followed by one encoded record per line.
//!
//! Loading is tolerant: a line that fails to decode is logged and skipped,
//! never aborting the rest of the file, and a missing file reads as empty.
//! Saving is a full rewrite of the whole collection, inactive records
//! included, staged through a temp file and renamed into place so a crash
//! leaves either the old file or the new one, not a torn write.

use crate::codec::Record;
use crate::error::Result;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct CsvStore<R: Record> {
    path: PathBuf,
    _kind: PhantomData<R>,
}

impl<R: Record> CsvStore<R> {
    /// Opens the store at `path`, creating the file with a header line if
    /// it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            _kind: PhantomData,
        };
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the backing file with only the header line if absent. Never
    /// truncates an existing file.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, format!("{}\n", R::HEADER))?;
        debug!(path = %self.path.display(), "created backing file");
        Ok(())
    }

    /// Reads every record from the backing file. The header line is
    /// discarded; each subsequent line decodes independently, and a line
    /// that fails to decode is logged and skipped. A read failure of any
    /// kind yields an empty collection, not an error: a missing or
    /// unreadable file means starting over empty, and in-memory state is
    /// the source of truth from then on.
    pub fn load_all(&self) -> Result<Vec<R>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "backing file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read backing file, starting empty");
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            match R::decode(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = line_no + 1,
                        error = %e,
                        "skipping undecodable line"
                    );
                }
            }
        }
        debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    /// Rewrites the whole file: header plus one line per record, inactive
    /// ones included, so soft-deletes survive a restart.
    pub fn save_all(&self, records: &[R]) -> Result<()> {
        let mut content = String::with_capacity(64 * (records.len() + 1));
        content.push_str(R::HEADER);
        content.push('\n');
        for record in records {
            content.push_str(&record.encode());
            content.push('\n');
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &content)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = records.len(), "saved records");
        Ok(())
    }

    /// Deletes the backing file and recreates it empty with its header.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.ensure_initialized()
    }
}
