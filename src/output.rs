//! Result types returned by the conversion entry points.

use crate::error::NotebookError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of converting and minifying one notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookResult {
    /// Notebook file name, e.g. `analysis.ipynb`.
    pub notebook: String,
    /// Full path of the notebook that was handed to the converter.
    pub notebook_path: PathBuf,
    /// Path of the HTML file that was minified in place.
    pub html_path: PathBuf,
    /// Combined stdout + stderr of the converter.
    pub converter_output: String,
    /// Converter exit code; `None` if it never ran or was killed by a signal.
    pub exit_code: Option<i32>,
    /// Set when the converter failed. The minify step still ran.
    pub error: Option<NotebookError>,
    /// Minifier statistics for the HTML file.
    pub minify: MinifyStats,
    /// Wall-clock time spent in the converter.
    pub convert_duration_ms: u64,
    /// Wall-clock time spent minifying.
    pub minify_duration_ms: u64,
}

impl NotebookResult {
    /// `true` when the converter exited successfully.
    pub fn converted(&self) -> bool {
        self.error.is_none()
    }
}

/// Size of an HTML file before and after minification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyStats {
    pub lines_before: usize,
    pub lines_after: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl MinifyStats {
    pub fn bytes_saved(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}

/// Totals for a directory run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Notebooks found by the scan.
    pub total_notebooks: usize,
    /// Notebooks whose converter exited successfully.
    pub converted: usize,
    /// Notebooks whose converter failed (their HTML was still minified).
    pub failed: usize,
    pub total_bytes_before: u64,
    pub total_bytes_after: u64,
    pub total_duration_ms: u64,
}

impl ConversionStats {
    /// Aggregate per-notebook results into run totals.
    pub fn from_results(results: &[NotebookResult], total_duration_ms: u64) -> Self {
        Self {
            total_notebooks: results.len(),
            converted: results.iter().filter(|r| r.converted()).count(),
            failed: results.iter().filter(|r| !r.converted()).count(),
            total_bytes_before: results.iter().map(|r| r.minify.bytes_before).sum(),
            total_bytes_after: results.iter().map(|r| r.minify.bytes_after).sum(),
            total_duration_ms,
        }
    }

    pub fn bytes_saved(&self) -> u64 {
        self.total_bytes_before.saturating_sub(self.total_bytes_after)
    }
}

/// Everything a directory run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The normalised directory that was scanned.
    pub directory: PathBuf,
    /// One entry per notebook, in processing order.
    pub notebooks: Vec<NotebookResult>,
    pub stats: ConversionStats,
}
