//! Error types for the nb2html library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Nb2HtmlError`] — **Fatal**: the run cannot proceed (target directory
//!   missing, HTML output missing or unwritable, bad configuration).
//!   Returned as `Err(Nb2HtmlError)` from the top-level `convert*` functions.
//!
//! * [`NotebookError`] — **Non-fatal**: the external converter could not be
//!   started or exited with a failure for one notebook. Stored inside
//!   [`crate::output::NotebookResult`] together with the converter's output so
//!   the operator can see what went wrong while the run moves on.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the nb2html library.
///
/// Converter failures use [`NotebookError`] and are stored in
/// [`crate::output::NotebookResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Nb2HtmlError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The directory to scan does not exist.
    #[error("Notebook directory not found: '{path}'\nCheck the path exists and is readable.")]
    DirectoryNotFound { path: PathBuf },

    /// The path exists but is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// Process does not have read permission on the directory.
    #[error("Permission denied reading '{path}'\nTry: chmod +rx {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Listing the directory failed for another reason.
    #[error("Failed to list directory '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single notebook passed to `convert_notebook` does not exist.
    #[error("Notebook not found: '{path}'")]
    NotebookNotFound { path: PathBuf },

    /// The converter failed where no partial result can be kept.
    #[error(transparent)]
    Converter(#[from] NotebookError),

    // ── HTML errors ───────────────────────────────────────────────────────
    /// The converter did not leave an HTML file where one was expected.
    #[error("HTML output not found: '{path}'\nThe converter may have failed; see its output above.")]
    HtmlNotFound { path: PathBuf },

    /// The HTML file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not replace the HTML file with its minified contents.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single notebook.
///
/// The run continues with the notebook's minify step; whether that step
/// finds an HTML file decides if the run survives.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum NotebookError {
    /// The converter program is not installed or not on `PATH`.
    #[error("{notebook}: converter '{program}' not found\nInstall it with: pip install nbconvert")]
    ConverterNotFound { notebook: String, program: String },

    /// The converter program exists but could not be started.
    #[error("{notebook}: failed to start converter '{program}': {detail}")]
    SpawnFailed {
        notebook: String,
        program: String,
        detail: String,
    },

    /// The converter ran and reported failure.
    #[error("{notebook}: converter exited with {}", exit_label(.code))]
    ConverterFailed {
        notebook: String,
        /// Exit code, `None` when the process was killed by a signal.
        code: Option<i32>,
        output: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl NotebookError {
    /// Name of the notebook the error belongs to.
    pub fn notebook(&self) -> &str {
        match self {
            NotebookError::ConverterNotFound { notebook, .. }
            | NotebookError::SpawnFailed { notebook, .. }
            | NotebookError::ConverterFailed { notebook, .. } => notebook,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_not_found_display() {
        let e = Nb2HtmlError::DirectoryNotFound {
            path: PathBuf::from("notebooks"),
        };
        assert!(e.to_string().contains("notebooks"), "got: {e}");
    }

    #[test]
    fn html_not_found_display() {
        let e = Nb2HtmlError::HtmlNotFound {
            path: PathBuf::from("notebooks/a.html"),
        };
        let msg = e.to_string();
        assert!(msg.contains("notebooks/a.html"), "got: {msg}");
        assert!(msg.contains("converter"), "got: {msg}");
    }

    #[test]
    fn converter_failed_display_with_code() {
        let e = NotebookError::ConverterFailed {
            notebook: "a.ipynb".into(),
            code: Some(1),
            output: "Traceback ...".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("a.ipynb"));
        assert!(msg.contains("status 1"));
    }

    #[test]
    fn converter_failed_display_without_code() {
        let e = NotebookError::ConverterFailed {
            notebook: "b.ipynb".into(),
            code: None,
            output: String::new(),
        };
        assert!(e.to_string().contains("signal"));
    }

    #[test]
    fn converter_error_is_transparent() {
        let inner = NotebookError::SpawnFailed {
            notebook: "a.ipynb".into(),
            program: "jupyter".into(),
            detail: "permission denied".into(),
        };
        let expected = inner.to_string();
        let e: Nb2HtmlError = inner.into();
        assert_eq!(e.to_string(), expected);
    }

    #[test]
    fn converter_not_found_names_program() {
        let e = NotebookError::ConverterNotFound {
            notebook: "a.ipynb".into(),
            program: "jupyter".into(),
        };
        assert!(e.to_string().contains("'jupyter'"));
        assert_eq!(e.notebook(), "a.ipynb");
    }
}
