//! Eager (whole-directory) conversion entry points.
//!
//! [`convert_dir`] scans the directory, then converts and minifies each
//! notebook in turn, returning once every notebook has been handled. Use
//! [`crate::stream::convert_stream`] to receive results one notebook at a
//! time instead.
//!
//! ## Failure policy
//!
//! * Scan errors are fatal before any notebook is touched.
//! * Converter errors are recorded on the [`NotebookResult`] and reported
//!   through the progress callback; the run moves on to the minify step.
//! * Minify errors are fatal and stop the run. That includes a missing HTML
//!   file, which is what a failed converter usually leaves behind.

use crate::config::ConversionConfig;
use crate::error::Nb2HtmlError;
use crate::output::{ConversionOutput, ConversionStats, NotebookResult};
use crate::pipeline::{minify, nbconvert, scan};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert every notebook directly inside `dir` to minified HTML.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `dir` — Directory to scan; a trailing separator is ignored
/// * `config` — Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` once every notebook was handled, even if some
/// converter runs failed (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(Nb2HtmlError)` only for fatal errors:
/// - Directory not found / not a directory / unreadable
/// - An HTML file missing, unreadable or unwritable in the minify step
pub async fn convert_dir(
    dir: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Nb2HtmlError> {
    let total_start = Instant::now();
    let dir = scan::normalize_dir(dir.as_ref());
    info!("Starting conversion: {}", dir.display());

    // ── Step 1: Scan ─────────────────────────────────────────────────────
    let names = scan::list_notebooks(&dir, &config.notebook_suffix()).await?;
    let total = names.len();
    info!("Found {} notebooks", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    // ── Step 2: Convert + minify, one notebook at a time ─────────────────
    let mut notebooks = Vec::with_capacity(total);
    for (i, name) in names.iter().enumerate() {
        notebooks.push(process_notebook(&dir, name, i + 1, total, config).await?);
    }

    // ── Step 3: Stats ────────────────────────────────────────────────────
    let stats =
        ConversionStats::from_results(&notebooks, total_start.elapsed().as_millis() as u64);

    info!(
        "Conversion complete: {}/{} notebooks, {} bytes saved, {}ms total",
        stats.converted,
        total,
        stats.bytes_saved(),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, stats.converted);
    }

    Ok(ConversionOutput {
        directory: dir,
        notebooks,
        stats,
    })
}

/// Synchronous wrapper around [`convert_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_dir_sync(
    dir: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Nb2HtmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Nb2HtmlError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_dir(dir, config))
}

/// Convert and minify a single notebook file.
///
/// The HTML file is written next to the notebook.
pub async fn convert_notebook(
    notebook_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<NotebookResult, Nb2HtmlError> {
    let path = notebook_path.as_ref();
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    let name = path.file_name().and_then(|n| n.to_str());
    let (Some(name), true) = (name, is_file) else {
        return Err(Nb2HtmlError::NotebookNotFound {
            path: path.to_path_buf(),
        });
    };
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    process_notebook(dir, name, 1, 1, config).await
}

/// List the notebooks a run over `dir` would convert, without running
/// anything.
pub async fn inspect(
    dir: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<Vec<String>, Nb2HtmlError> {
    let dir = scan::normalize_dir(dir.as_ref());
    scan::list_notebooks(&dir, &config.notebook_suffix()).await
}

/// Convert notebook bytes in memory to minified HTML.
///
/// The notebook is written to a managed [`tempfile::TempDir`] which is
/// removed on return, so the caller never sees a file on disk.
///
/// Unlike the directory entry points, a converter failure is an error here:
/// there is no HTML file to fall back on.
///
/// # Example
/// ```rust,no_run
/// use nb2html::{convert_from_bytes, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("analysis.ipynb")?;
/// let html = convert_from_bytes(&bytes, &ConversionConfig::default()).await?;
/// println!("{html}");
/// # Ok(())
/// # }
/// ```
pub async fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<String, Nb2HtmlError> {
    let tmp = tempfile::TempDir::new().map_err(|e| Nb2HtmlError::Internal(format!("tempdir: {e}")))?;
    let name = format!("notebook{}", config.notebook_suffix());
    let notebook_path = tmp.path().join(&name);
    tokio::fs::write(&notebook_path, bytes)
        .await
        .map_err(|e| Nb2HtmlError::Internal(format!("tempfile write: {e}")))?;

    let run = nbconvert::run_converter(&name, &notebook_path, config).await;
    if let Some(error) = run.error {
        return Err(error.into());
    }

    let html_path = scan::html_path_for(&notebook_path, config);
    minify::minify_file(&html_path, config.minify_mode, &config.footnote_marker).await?;
    tokio::fs::read_to_string(&html_path)
        .await
        .map_err(|e| Nb2HtmlError::ReadFailed {
            path: html_path,
            source: e,
        })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run the converter and the minifier for one notebook in `dir`.
///
/// `index` is 1-based and only used for progress events.
pub(crate) async fn process_notebook(
    dir: &Path,
    name: &str,
    index: usize,
    total: usize,
    config: &ConversionConfig,
) -> Result<NotebookResult, Nb2HtmlError> {
    let notebook_path = dir.join(name);
    debug!("Processing notebook {}/{}: {}", index, total, name);

    if let Some(ref cb) = config.progress_callback {
        cb.on_notebook_start(index, total, name);
    }

    let run = nbconvert::run_converter(name, &notebook_path, config).await;

    if let Some(ref cb) = config.progress_callback {
        cb.on_converter_output(name, &run.output);
        if let Some(ref e) = run.error {
            cb.on_notebook_error(index, total, name, &e.to_string());
        }
    }

    let html_path = scan::html_path_for(&notebook_path, config);
    let minify_start = Instant::now();
    let stats = minify::minify_file(&html_path, config.minify_mode, &config.footnote_marker).await?;
    let minify_duration_ms = minify_start.elapsed().as_millis() as u64;

    if run.error.is_none() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_notebook_complete(index, total, name, stats.bytes_saved());
        }
    }

    Ok(NotebookResult {
        notebook: name.to_string(),
        notebook_path,
        html_path,
        converter_output: run.output,
        exit_code: run.exit_code,
        error: run.error,
        minify: stats,
        convert_duration_ms: run.duration_ms,
        minify_duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_inspect_normalises_trailing_slash() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.ipynb"), b"{}").unwrap();
        std::fs::write(tmp.path().join("readme.txt"), b"").unwrap();

        let dir = format!("{}/", tmp.path().display());
        let names = inspect(&dir, &ConversionConfig::default()).await.unwrap();
        assert_eq!(names, vec!["a.ipynb"]);
    }

    #[tokio::test]
    async fn test_convert_dir_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let err = convert_dir(missing.to_str().unwrap(), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Nb2HtmlError::DirectoryNotFound { .. }));
    }

    #[tokio::test]
    async fn test_convert_dir_empty_directory_is_ok() {
        let tmp = TempDir::new().unwrap();
        let out = convert_dir(tmp.path().to_str().unwrap(), &ConversionConfig::default())
            .await
            .unwrap();
        assert!(out.notebooks.is_empty());
        assert_eq!(out.stats.total_notebooks, 0);
    }

    #[tokio::test]
    async fn test_convert_notebook_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = convert_notebook(tmp.path().join("nope.ipynb"), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Nb2HtmlError::NotebookNotFound { .. }));
    }

    #[test]
    fn test_convert_dir_sync_propagates_errors() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.ipynb");
        std::fs::write(&file, b"{}").unwrap();
        let err = convert_dir_sync(file.to_str().unwrap(), &ConversionConfig::default())
            .unwrap_err();
        assert!(matches!(err, Nb2HtmlError::NotADirectory { .. }));
    }
}
