//! Integration tests for the model asset installer
//!
//! Exercises the full install flow against a real temporary storage root
//! without requiring the engine running.

use modelbench::asset::BundledAsset;
use modelbench::installer::ModelInstaller;
use modelbench::BenchError;
use std::fs;
use std::io;
use std::time::Duration;
use tempfile::TempDir;

const DUMMY_ASSET: BundledAsset = BundledAsset {
    name: "dummy_model.gguf",
    bytes: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
};

#[test]
fn test_first_install_copies_asset_exactly() {
    let tmp = TempDir::new().unwrap();
    let installer = ModelInstaller::new(tmp.path(), DUMMY_ASSET).unwrap();

    assert!(!installer.is_available());

    let path = installer.install().unwrap();
    assert_eq!(path, tmp.path().join("models").join("dummy_model.gguf"));
    assert!(installer.is_available());

    let written = fs::read(&path).unwrap();
    assert_eq!(written.len() as u64, DUMMY_ASSET.len());
    assert_eq!(written, DUMMY_ASSET.bytes);
}

#[test]
fn test_second_install_skips_copy_and_keeps_mtime() {
    let tmp = TempDir::new().unwrap();
    let installer = ModelInstaller::new(tmp.path(), DUMMY_ASSET).unwrap();

    let path = installer.install().unwrap();
    assert!(installer.is_available());
    let first_mtime = fs::metadata(&path).unwrap().modified().unwrap();

    // Let the clock advance past filesystem timestamp granularity so a
    // rewrite would be observable.
    std::thread::sleep(Duration::from_millis(50));

    let second_path = installer.install().unwrap();
    assert_eq!(second_path, path);

    let second_mtime = fs::metadata(&path).unwrap().modified().unwrap();
    assert_eq!(first_mtime, second_mtime, "second install must not rewrite the file");
}

#[test]
fn test_preexisting_file_short_circuits_without_reading_asset() {
    let tmp = TempDir::new().unwrap();
    let installer = ModelInstaller::new(tmp.path(), DUMMY_ASSET).unwrap();

    fs::write(installer.model_path(), b"user-provided model").unwrap();

    let path = installer.install().unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"user-provided model");
}

#[test]
fn test_zero_length_file_is_retried() {
    let tmp = TempDir::new().unwrap();
    let installer = ModelInstaller::new(tmp.path(), DUMMY_ASSET).unwrap();

    fs::write(installer.model_path(), b"").unwrap();
    assert!(!installer.is_available());

    let path = installer.install().unwrap();
    assert!(installer.is_available());
    assert_eq!(fs::read(&path).unwrap(), DUMMY_ASSET.bytes);
}

#[test]
fn test_interrupted_copy_reports_failure_and_stays_unavailable() {
    /// Reader failing after a partial payload
    struct InterruptedReader {
        sent: bool,
    }

    impl io::Read for InterruptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "simulated interruption",
                ));
            }
            self.sent = true;
            // First chunk succeeds; this is smaller than the copy buffer so
            // the next read hits the failure mid-copy.
            buf[..4].copy_from_slice(&[9, 9, 9, 9]);
            Ok(4)
        }
    }

    let tmp = TempDir::new().unwrap();
    let installer = ModelInstaller::new(tmp.path(), DUMMY_ASSET).unwrap();

    let result = installer.install_from(InterruptedReader { sent: false });
    assert!(matches!(result, Err(BenchError::IoError(_))));

    // The partial file on disk must not count as an installed model.
    assert!(!installer.is_available());

    // A later install starts over and succeeds.
    let path = installer.install().unwrap();
    assert_eq!(fs::read(&path).unwrap(), DUMMY_ASSET.bytes);
}

#[test]
fn test_bundled_starter_model_installs() {
    let tmp = TempDir::new().unwrap();
    let asset = BundledAsset::starter_model();
    let installer = ModelInstaller::new(tmp.path(), asset).unwrap();

    let path = installer.install().unwrap();
    assert!(path.ends_with("models/starter.gguf"));
    assert_eq!(installer.installed_size(), Some(asset.len()));
    assert_eq!(fs::read(&path).unwrap(), asset.bytes);
}

#[test]
fn test_separate_roots_are_independent() {
    let tmp_a = TempDir::new().unwrap();
    let tmp_b = TempDir::new().unwrap();

    let a = ModelInstaller::new(tmp_a.path(), DUMMY_ASSET).unwrap();
    let b = ModelInstaller::new(tmp_b.path(), DUMMY_ASSET).unwrap();

    a.install().unwrap();
    assert!(a.is_available());
    assert!(!b.is_available());
}
