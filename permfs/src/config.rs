//! On-device configuration files.
//!
//! Small settings (the device API password, its port) live in plain text
//! files. The writable `/perm` overlay wins over the image's `/etc`, which in
//! turn wins over the root of the image.

use crate::errors::{PermfsError, PermfsResult};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    overlay: PathBuf,
    system: PathBuf,
    root: PathBuf,
}

impl Default for ConfigFiles {
    fn default() -> Self {
        Self::with_roots("/perm", "/etc", "/")
    }
}

impl ConfigFiles {
    pub fn with_roots(
        overlay: impl Into<PathBuf>,
        system: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            overlay: overlay.into(),
            system: system.into(),
            root: root.into(),
        }
    }

    /// Reads `file_name` and returns its content with surrounding whitespace trimmed.
    ///
    /// Any failure on the overlay falls through to the system directory; the
    /// root is only consulted when the system copy does not exist.
    pub fn read(&self, file_name: &str) -> PermfsResult<String> {
        let result = fs::read_to_string(self.overlay.join(file_name))
            .or_else(|_| fs::read_to_string(self.system.join(file_name)))
            .or_else(|err| match err.kind() {
                io::ErrorKind::NotFound => fs::read_to_string(self.root.join(file_name)),
                _ => Err(err),
            });

        match result {
            Ok(content) => Ok(content.trim().to_string()),
            Err(source) => Err(PermfsError::Config {
                file: file_name.to_string(),
                source,
            }),
        }
    }

    /// Like [`ConfigFiles::read`], but a file missing everywhere yields `None`.
    pub fn read_optional(&self, file_name: &str) -> PermfsResult<Option<String>> {
        match self.read(file_name) {
            Ok(content) => Ok(Some(content)),
            Err(PermfsError::Config { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
