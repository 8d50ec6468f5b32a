//! Model Asset Installer
//!
//! Guarantees the bundled starter model exists at a known path under the
//! application's private storage, copying it from the embedded asset on
//! first use. The copy is a plain sequential stream: 1 MiB chunks until the
//! source is exhausted, flush, then a postcondition check that the
//! destination exists and is non-empty.
//!
//! The installer is synchronous and blocking by contract; async callers
//! offload it with `tokio::task::spawn_blocking`.

use crate::asset::BundledAsset;
use crate::errors::{BenchError, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Copy buffer size: 1 MiB chunks
const COPY_CHUNK_SIZE: usize = 1024 * 1024;

/// Subdirectory of the storage root holding model files
const MODELS_SUBDIR: &str = "models";

/// Installs the bundled model asset into local storage
///
/// The destination path is fixed at construction:
/// `<storage_root>/models/<asset name>`. A model counts as available only
/// when the file exists and its length is strictly greater than zero, so a
/// truncated or empty file from a failed copy is retried by the next
/// `install` call.
#[derive(Debug, Clone)]
pub struct ModelInstaller {
    asset: BundledAsset,
    models_dir: PathBuf,
    model_path: PathBuf,
}

impl ModelInstaller {
    /// Create an installer rooted at `storage_root`
    ///
    /// Creates `<storage_root>/models` (and parents) if absent. Directory
    /// creation failure is reported as `BenchError::StorageInit` rather than
    /// deferred to the first file write.
    pub fn new(storage_root: impl AsRef<Path>, asset: BundledAsset) -> Result<Self> {
        let models_dir = storage_root.as_ref().join(MODELS_SUBDIR);
        fs::create_dir_all(&models_dir).map_err(|source| BenchError::StorageInit {
            path: models_dir.clone(),
            source,
        })?;

        let model_path = models_dir.join(asset.name);
        Ok(Self {
            asset,
            models_dir,
            model_path,
        })
    }

    /// Check if the model file is available locally
    ///
    /// Pure query: true iff the file exists and its length is strictly
    /// greater than zero.
    pub fn is_available(&self) -> bool {
        fs::metadata(&self.model_path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Deterministic absolute path of the installed model
    ///
    /// Does not imply the file exists.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Directory the installer writes into
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Installed model size in bytes, if available
    pub fn installed_size(&self) -> Option<u64> {
        fs::metadata(&self.model_path).ok().map(|meta| meta.len())
    }

    /// Copy the bundled asset into local storage
    ///
    /// If the model is already available the copy is skipped and the
    /// existing path is returned; the asset is not read and the file is not
    /// touched. Otherwise the asset streams to the destination and the
    /// result is verified.
    ///
    /// # Returns
    /// Absolute path of the installed model on success
    pub fn install(&self) -> Result<PathBuf> {
        self.install_from(self.asset.bytes)
    }

    /// Copy model content from an arbitrary byte stream
    ///
    /// Same contract as `install`; the source is injectable so tests can
    /// exercise mid-copy failures. A failure may leave a zero-length or
    /// partial file behind; no cleanup is attempted, and `is_available`
    /// reports such a file as not available so a later call retries.
    pub fn install_from<R: Read>(&self, mut source: R) -> Result<PathBuf> {
        if self.is_available() {
            return Ok(self.model_path.clone());
        }

        {
            let mut dest = File::create(&self.model_path)?;
            let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
            loop {
                let read = source.read(&mut buffer)?;
                if read == 0 {
                    break;
                }
                dest.write_all(&buffer[..read])?;
            }
            dest.flush()?;
        }

        // The stream reported success; trust only the file system.
        if !self.is_available() {
            return Err(BenchError::InstallIncomplete {
                path: self.model_path.clone(),
            });
        }

        Ok(self.model_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::io;
    use tempfile::TempDir;

    fn test_asset() -> BundledAsset {
        BundledAsset {
            name: "dummy_model.gguf",
            bytes: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        }
    }

    /// Reader that yields `content`, then fails
    struct FailingReader {
        content: io::Cursor<Vec<u8>>,
        done: bool,
    }

    impl FailingReader {
        fn new(content: Vec<u8>) -> Self {
            FailingReader {
                content: io::Cursor::new(content),
                done: false,
            }
        }
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let read = self.content.read(buf)?;
            if read > 0 {
                return Ok(read);
            }
            if self.done {
                return Ok(0);
            }
            self.done = true;
            Err(io::Error::new(io::ErrorKind::Other, "simulated I/O failure"))
        }
    }

    #[test]
    fn test_new_creates_models_dir() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();
        assert!(installer.models_dir().is_dir());
        assert_eq!(installer.models_dir(), tmp.path().join("models"));
    }

    #[test]
    fn test_model_path_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();
        assert_eq!(
            installer.model_path(),
            tmp.path().join("models").join("dummy_model.gguf")
        );
        // Path query makes no existence claim
        assert!(!installer.model_path().exists());
    }

    #[test]
    fn test_not_available_before_install() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();
        assert!(!installer.is_available());
        assert_eq!(installer.installed_size(), None);
    }

    #[test]
    fn test_install_copies_content_exactly() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        let path = installer.install().unwrap();
        assert_eq!(path, installer.model_path());
        assert!(installer.is_available());

        let written = fs::read(&path).unwrap();
        assert_eq!(written, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(installer.installed_size(), Some(10));
    }

    #[test]
    fn test_install_short_circuits_when_available() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        // Pre-existing non-empty file with different content
        fs::write(installer.model_path(), b"already here").unwrap();

        let path = installer.install().unwrap();
        assert_eq!(path, installer.model_path());
        // Content untouched: the asset was never read
        assert_eq!(fs::read(&path).unwrap(), b"already here");
    }

    #[test]
    fn test_zero_length_file_is_not_available() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        fs::write(installer.model_path(), b"").unwrap();
        assert!(!installer.is_available());

        // A zero-length leftover does not short-circuit the copy
        let path = installer.install().unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(installer.is_available());
    }

    #[test]
    fn test_failed_copy_leaves_model_unavailable() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        let result = installer.install_from(FailingReader::new(vec![]));
        assert!(matches!(result, Err(BenchError::IoError(_))));
        assert!(!installer.is_available());
    }

    #[test]
    fn test_empty_source_is_integrity_error() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        // Stream ends immediately without error: copy "succeeds" but the
        // postcondition catches the empty destination.
        let result = installer.install_from(io::empty());
        assert!(matches!(result, Err(BenchError::InstallIncomplete { .. })));
        assert!(!installer.is_available());
    }

    #[test]
    fn test_retry_after_failure_succeeds() {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        let _ = installer.install_from(FailingReader::new(vec![]));
        assert!(!installer.is_available());

        let path = installer.install().unwrap();
        assert!(installer.is_available());
        assert_eq!(fs::read(&path).unwrap(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_storage_init_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        // Occupy the models path with a file so create_dir_all fails
        fs::write(tmp.path().join("models"), b"not a directory").unwrap();

        let result = ModelInstaller::new(tmp.path(), test_asset());
        assert!(matches!(result, Err(BenchError::StorageInit { .. })));
    }

    #[quickcheck]
    fn prop_install_preserves_content(content: Vec<u8>) -> bool {
        let tmp = TempDir::new().unwrap();
        let installer = ModelInstaller::new(tmp.path(), test_asset()).unwrap();

        match installer.install_from(io::Cursor::new(content.clone())) {
            Ok(path) => !content.is_empty() && fs::read(&path).unwrap() == content,
            // Empty sources must fail the postcondition, never "succeed" empty
            Err(BenchError::InstallIncomplete { .. }) => content.is_empty(),
            Err(_) => false,
        }
    }
}
