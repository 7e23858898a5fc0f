//! Cross-process locking for file-backed stores.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Access mode used when acquiring a store lock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LockMode {
    Read,
    Write,
}

/// Held advisory lock on a store's sibling `.lock` file. Released on drop.
pub struct StoreLockGuard {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl StoreLockGuard {
    /// Block until the lock guarding `store_path` is held in `mode`.
    pub fn acquire(store_path: &Path, mode: LockMode) -> io::Result<Self> {
        let path = lock_path(store_path);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        match mode {
            LockMode::Read => fs2::FileExt::lock_shared(&file)?,
            LockMode::Write => fs2::FileExt::lock_exclusive(&file)?,
        }
        Ok(Self { file, path, mode })
    }
}

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs2::FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), mode = ?self.mode, %err, "Failed to release store lock");
        }
    }
}

fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    name.push(".lock");
    store_path.with_file_name(name)
}
