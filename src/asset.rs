//! Bundled starter model asset
//!
//! A small model file is shipped inside the binary so the harness can seed
//! local storage without any network access. The installer streams it into
//! the models directory on first use.

/// File name the starter model is installed under
pub const STARTER_MODEL_NAME: &str = "starter.gguf";

/// Starter model bytes, embedded at compile time.
///
/// The checked-in asset is a stub GGUF shell; a release build swaps in a
/// real quantized model by replacing `assets/starter.gguf`.
pub const STARTER_MODEL_BYTES: &[u8] = include_bytes!("../assets/starter.gguf");

/// A read-only asset bundled with the application
#[derive(Debug, Clone, Copy)]
pub struct BundledAsset {
    /// File name used for the installed copy
    pub name: &'static str,
    /// Raw asset bytes
    pub bytes: &'static [u8],
}

impl BundledAsset {
    /// The starter model shipped with this build
    pub fn starter_model() -> Self {
        BundledAsset {
            name: STARTER_MODEL_NAME,
            bytes: STARTER_MODEL_BYTES,
        }
    }

    /// Asset size in bytes
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// True when the build carries no real asset payload
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
