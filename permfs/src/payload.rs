//! The bundled formatter toolchain and its unpacking into a scratch directory.
//!
//! A [`Payload`] is a flat name → bytes mapping. Production code uses the
//! files baked into the binary from `payload/`; tests build synthetic ones.

use crate::errors::{PermfsError, PermfsResult};
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const UNPACK_PREFIX: &str = "permfs-bcachefs-";
const EXECUTABLE_MODE: u32 = 0o755;

#[derive(RustEmbed)]
#[folder = "payload/"]
#[exclude = "*.md"]
struct BundledTools;

#[derive(Debug, Clone, Default)]
pub struct Payload {
    files: BTreeMap<String, Cow<'static, [u8]>>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// The files embedded into this binary at build time.
    pub fn embedded() -> Self {
        let mut payload = Self::new();
        for name in BundledTools::iter() {
            if let Some(file) = BundledTools::get(&name) {
                payload.files.insert(name.into_owned(), file.data);
            }
        }
        payload
    }

    pub fn with_file(
        mut self,
        name: impl Into<String>,
        data: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.files.insert(name.into(), data.into());
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn require(&self, name: &str) -> PermfsResult<()> {
        if self.files.contains_key(name) {
            Ok(())
        } else {
            Err(PermfsError::MissingPayloadFile(name.to_string()))
        }
    }

    /// Writes every file, executable, into a fresh directory under `parent`.
    ///
    /// On any failure the directory and whatever was already written is removed.
    pub fn unpack_into(&self, parent: &Path) -> PermfsResult<UnpackedTools> {
        for name in self.files.keys() {
            validate_name(name)?;
        }

        let dir = tempfile::Builder::new()
            .prefix(UNPACK_PREFIX)
            .tempdir_in(parent)?;
        for (name, data) in &self.files {
            write_executable(&dir.path().join(name), data)?;
        }
        Ok(UnpackedTools::new(dir))
    }
}

fn validate_name(name: &str) -> PermfsResult<()> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\0');
    if plain {
        Ok(())
    } else {
        Err(PermfsError::InvalidPayloadName(name.to_string()))
    }
}

fn write_executable(path: &Path, data: &[u8]) -> PermfsResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(EXECUTABLE_MODE)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

/// A scratch directory holding an unpacked [`Payload`]. Removed on drop.
#[derive(Debug)]
pub struct UnpackedTools {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl UnpackedTools {
    fn new(dir: TempDir) -> Self {
        Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for UnpackedTools {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        if let Err(err) = dir.close() {
            log::warn!("failed to remove {}: {}", self.path.display(), err);
        }
    }
}
