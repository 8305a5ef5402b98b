//! Progress-callback trait for per-notebook conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the directory. The CLI uses it to drive a
//! terminal progress bar and to echo the converter's output.
//!
//! # Example
//!
//! ```rust
//! use nb2html::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_notebook_complete(&self, index: usize, total: usize, name: &str, bytes_saved: u64) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{index}/{total} {name}: saved {bytes_saved} bytes");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each notebook.
///
/// Notebooks are processed one at a time, so calls never overlap within a
/// run; the `Send + Sync` bound lets the callback live inside a config that
/// is shared with spawned tasks. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the directory scan.
    ///
    /// # Arguments
    /// * `total` — number of notebooks that will be processed
    fn on_conversion_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before the converter is launched for a notebook.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in the run
    /// * `total` — notebooks in the run
    /// * `name`  — notebook file name
    fn on_notebook_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called with the converter's combined stdout/stderr once it exits,
    /// whether it succeeded or not.
    fn on_converter_output(&self, name: &str, output: &str) {
        let _ = (name, output);
    }

    /// Called when a notebook was converted and minified.
    ///
    /// # Arguments
    /// * `bytes_saved` — size reduction achieved by the minifier
    fn on_notebook_complete(&self, index: usize, total: usize, name: &str, bytes_saved: u64) {
        let _ = (index, total, name, bytes_saved);
    }

    /// Called when the converter failed for a notebook.
    ///
    /// The pipeline still attempts the minify step afterwards.
    fn on_notebook_error(&self, index: usize, total: usize, name: &str, error: &str) {
        let _ = (index, total, name, error);
    }

    /// Called once after every notebook has been attempted.
    ///
    /// # Arguments
    /// * `total`         — notebooks in the run
    /// * `success_count` — notebooks whose converter exited successfully
    fn on_conversion_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
