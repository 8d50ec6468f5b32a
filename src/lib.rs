//! modelbench - Engine Test Harness
//!
//! A terminal harness that exercises a local AI inference engine: it seeds a
//! bundled starter model into private storage, reports connectivity and
//! status, downloads the engine model with live progress, and forwards
//! prompts for text generation.
//!
//! # Architecture
//!
//! - `installer`: copies the bundled model asset into local storage
//! - `sdk`: engine client, initialize task, wire types
//! - `console`: interactive controller (input, commands, display, history)
//! - `doctor`: connectivity and storage diagnostics

pub mod asset;
pub mod errors;
pub mod installer;

// Re-export commonly used types
pub use errors::{BenchError, Result};

pub mod cli;
pub mod config;
pub mod console;
pub mod doctor;
pub mod sdk;
