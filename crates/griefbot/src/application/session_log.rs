//! Session log export
//!
//! Writes one pretty-printed JSON document per completed session.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::domain::entities::SessionLog;
use crate::domain::errors::DomainError;

/// Writes session logs into a directory under a file name prefix
#[derive(Debug, Clone)]
pub struct SessionLogWriter {
    dir: PathBuf,
    prefix: String,
}

impl SessionLogWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Write `log` and return the path it landed at
    ///
    /// Never overwrites: a second log within the same second gets a
    /// numeric suffix.
    pub fn write(&self, log: &SessionLog) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(log)?;

        let base = log.file_name(&self.prefix);
        let stem = base.trim_end_matches(".json").to_string();
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{}_{}.json", stem, attempt)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    tracing::debug!(path = %path.display(), "Session log written");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
