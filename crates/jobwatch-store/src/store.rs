//! The jobs file: one JSON array, rewritten in full after every insertion.

use crate::error::{Result, StoreError};
use jobwatch_core::JobRecord;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ordered, append-only list of job records mirrored to a JSON file.
///
/// The file is replaced atomically (temporary sibling + rename), so it holds a
/// complete JSON array after every successful [`JobStore::append`].
#[derive(Debug)]
pub struct JobStore {
    path: PathBuf,
    records: Vec<JobRecord>,
}

impl JobStore {
    /// Open the store at `path`, loading any records already on disk.
    ///
    /// A missing file starts an empty store. A file that cannot be read or
    /// parsed is logged, renamed to `<name>.corrupt` and replaced by an empty
    /// store.
    ///
    /// # Errors
    /// Returns error if an unreadable file cannot be moved aside.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "no existing jobs file, starting empty");
            return Ok(Self {
                path,
                records: Vec::new(),
            });
        }

        let loaded = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|contents| {
                serde_json::from_str::<Vec<JobRecord>>(&contents).map_err(|e| e.to_string())
            });

        match loaded {
            Ok(records) => {
                info!(
                    path = %path.display(),
                    count = records.len(),
                    "Existing job details loaded successfully."
                );
                Ok(Self { path, records })
            }
            Err(e) => {
                let quarantine = Self::quarantine_path(&path);
                warn!(
                    path = %path.display(),
                    error = %e,
                    moved_to = %quarantine.display(),
                    "Error reading or parsing JSON file, starting empty"
                );
                fs::rename(&path, &quarantine).map_err(|e| StoreError::io(&path, e))?;
                Ok(Self {
                    path,
                    records: Vec::new(),
                })
            }
        }
    }

    /// Append a record and rewrite the file.
    ///
    /// If the write fails the record is dropped again, so memory never holds
    /// records the file does not.
    pub fn append(&mut self, record: JobRecord) -> Result<()> {
        self.records.push(record);

        if let Err(e) = self.flush() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// All records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Location of the jobs file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp = Self::temp_path(&self.path);
        let mut file = fs::File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn temp_path(path: &Path) -> PathBuf {
        Self::with_suffix(path, "tmp")
    }

    fn quarantine_path(path: &Path) -> PathBuf {
        Self::with_suffix(path, "corrupt")
    }

    fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        path.with_file_name(name)
    }
}
