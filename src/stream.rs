//! Streaming conversion API: emit notebooks as they finish.
//!
//! Unlike the eager [`crate::convert::convert_dir`], which returns only
//! after every notebook is done, [`convert_stream`] yields one
//! `NotebookResult` per notebook in scan order, so callers can report or
//! publish each page as soon as it is ready.
//!
//! The stream ends after the first `Err` item: a minify failure halts the
//! run exactly as it does for the eager API.

use crate::config::ConversionConfig;
use crate::convert::process_notebook;
use crate::error::Nb2HtmlError;
use crate::output::NotebookResult;
use crate::pipeline::scan;
use futures::stream;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of notebook results.
pub type NotebookStream = Pin<Box<dyn Stream<Item = Result<NotebookResult, Nb2HtmlError>> + Send>>;

/// Convert the notebooks in `dir`, streaming results as each one completes.
///
/// Nothing runs until the stream is polled; notebooks are processed one at
/// a time.
///
/// # Returns
/// - `Ok(NotebookStream)` — a stream of `Result<NotebookResult, Nb2HtmlError>`
/// - `Err(Nb2HtmlError)` — the directory could not be scanned
///
/// # Example
/// ```rust,no_run
/// use nb2html::{convert_stream, ConversionConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut results = convert_stream("notebooks/", &ConversionConfig::default()).await?;
/// while let Some(result) = results.next().await {
///     let nb = result?;
///     println!("{} → {}", nb.notebook, nb.html_path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn convert_stream(
    dir: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<NotebookStream, Nb2HtmlError> {
    let dir = scan::normalize_dir(dir.as_ref());
    info!("Starting streaming conversion: {}", dir.display());

    let names = scan::list_notebooks(&dir, &config.notebook_suffix()).await?;
    let total = names.len();
    let config = config.clone();

    let state = (names.into_iter().enumerate(), false);
    let s = stream::unfold(state, move |(mut pending, halted)| {
        let dir = dir.clone();
        let cfg = config.clone();
        async move {
            if halted {
                return None;
            }
            let (i, name) = pending.next()?;
            let result = process_notebook(&dir, &name, i + 1, total, &cfg).await;
            let halted = result.is_err();
            Some((result, (pending, halted)))
        }
    });

    Ok(Box::pin(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_error_is_immediate() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let result = convert_stream(missing.to_str().unwrap(), &ConversionConfig::default()).await;
        assert!(matches!(result, Err(Nb2HtmlError::DirectoryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let s = convert_stream(tmp.path().to_str().unwrap(), &ConversionConfig::default())
            .await
            .unwrap();
        let items: Vec<_> = s.collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_stops_after_first_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.ipynb"), b"{}").unwrap();
        std::fs::write(tmp.path().join("b.ipynb"), b"{}").unwrap();
        let config = ConversionConfig::builder()
            .converter("nb2html-no-such-converter-5f1c")
            .build()
            .unwrap();

        let s = convert_stream(tmp.path().to_str().unwrap(), &config)
            .await
            .unwrap();
        let items: Vec<_> = s.collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Nb2HtmlError::HtmlNotFound { .. })));
    }
}
