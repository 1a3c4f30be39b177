//! File-backed token slot.
//!
//! The token is a single line in `<home>/token`. Writes go through a temp
//! file in the same directory and are renamed into place while holding an
//! exclusive lock on `<home>/token.lock`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use super::{AuthToken, CredentialProvider};
use crate::core::error::ContentError;

/// Token slot persisted to disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token slot at the configured location
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(crate::config::paths::token_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> std::io::Result<T>) -> Result<T, ContentError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(io_error)?;
        FileExt::lock_exclusive(&lock).map_err(io_error)?;

        let result = f();
        let _ = FileExt::unlock(&lock);
        result.map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> ContentError {
    ContentError::Credentials(e.to_string())
}

impl CredentialProvider for FileTokenStore {
    fn get(&self) -> Result<Option<AuthToken>, ContentError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| AuthToken::new(token)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    fn set(&self, token: &AuthToken) -> Result<(), ContentError> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        self.with_lock(|| {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            writeln!(tmp, "{}", token.as_str())?;
            tmp.as_file().sync_all()?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
            }

            tmp.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        })?;

        tracing::debug!(path = %self.path.display(), "Stored session token");
        Ok(())
    }

    fn clear(&self) -> Result<(), ContentError> {
        self.with_lock(|| match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        })?;

        tracing::debug!(path = %self.path.display(), "Cleared session token");
        Ok(())
    }
}
