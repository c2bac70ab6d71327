//! APK asset-directory management.
//!
//! Optimization passes that emit auxiliary artifacts (metadata files, secondary dex
//! listings) write them into the unpacked APK's asset tree. [`ApkManager`] owns that
//! boundary: it opens named files under a namespaced asset directory, creating
//! subdirectories on demand, and keeps every opened file alive until the manager itself
//! is dropped, so passes can hand out cheap handles without worrying about closure order.
//!
//! A target directory that is missing or not writable is unrecoverable operator error:
//! the process terminates with a nonzero status rather than limping on with half-written
//! outputs.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use log::error;

use crate::Result;

/// Relative path of the asset directory that holds secondary dex metadata.
const SECONDARY_DEX_ASSET_DIR: &str = "assets/secondary-program-dex-jars";

/// Terminates the process if `dir` is not an existing directory.
fn check_directory(dir: &Path) {
    if !dir.is_dir() {
        error!("not a writable directory: {}", dir.display());
        process::exit(1);
    }
}

/// Manages asset files under an unpacked APK directory.
///
/// Opened files are shared handles ([`Arc<File>`]); the manager retains a reference to
/// each, so every asset file stays open until the manager is dropped and closure happens
/// in one place.
#[derive(Debug)]
pub struct ApkManager {
    apk_dir: PathBuf,
    files: Vec<Arc<File>>,
}

impl ApkManager {
    /// Creates a manager rooted at an unpacked APK directory.
    #[must_use]
    pub fn new(apk_dir: impl Into<PathBuf>) -> Self {
        ApkManager {
            apk_dir: apk_dir.into(),
            files: Vec::new(),
        }
    }

    /// Returns `true` if the APK carries a secondary-dex asset directory.
    ///
    /// Terminates the process if the APK directory itself is missing or not a directory.
    #[must_use]
    pub fn has_asset_dir(&self) -> bool {
        check_directory(&self.apk_dir);
        self.apk_dir.join(SECONDARY_DEX_ASSET_DIR).is_dir()
    }

    /// Opens a new asset file `filename` under `dir_path` (relative to the APK root).
    ///
    /// With `create_dir` set, missing intermediate directories are created; otherwise a
    /// missing directory terminates the process like any other unwritable target.
    ///
    /// The returned handle stays open until this manager is dropped, even if the caller
    /// drops its copy first.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file creation fails for reasons other
    /// than the target not being a directory.
    pub fn new_asset_file(
        &mut self,
        filename: &str,
        dir_path: &str,
        create_dir: bool,
    ) -> Result<Arc<File>> {
        check_directory(&self.apk_dir);

        let asset_dir = self.apk_dir.join(dir_path.trim_start_matches('/'));
        if create_dir {
            if !asset_dir.exists() {
                fs::create_dir_all(&asset_dir)?;
            }
        } else {
            check_directory(&asset_dir);
        }

        let file = Arc::new(File::create(asset_dir.join(filename))?);
        self.files.push(Arc::clone(&file));
        Ok(file)
    }

    /// Returns the number of asset files this manager holds open.
    #[must_use]
    pub fn open_files(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_has_asset_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ApkManager::new(dir.path());
        assert!(!manager.has_asset_dir());

        fs::create_dir_all(dir.path().join(SECONDARY_DEX_ASSET_DIR)).unwrap();
        assert!(manager.has_asset_dir());

        // Creating an unrelated asset file does not disturb the answer.
        manager
            .new_asset_file("list.txt", "assets/other/", true)
            .unwrap();
        assert!(manager.has_asset_dir());
    }

    #[test]
    fn test_new_asset_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ApkManager::new(dir.path());

        let file = manager
            .new_asset_file("metadata.txt", "assets/nested/deep/", true)
            .unwrap();
        (&*file).write_all(b"payload").unwrap();

        let written = dir.path().join("assets/nested/deep/metadata.txt");
        assert!(written.is_file());
        assert_eq!(manager.open_files(), 1);
    }

    #[test]
    fn test_files_outlive_caller_handles() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ApkManager::new(dir.path());

        {
            let file = manager.new_asset_file("a.txt", "assets/", true).unwrap();
            drop(file);
        }
        // The manager still owns the handle.
        assert_eq!(manager.open_files(), 1);
    }
}
