//! Directory scan: find the notebooks a run will convert.
//!
//! Only the direct children of the directory are considered. An entry
//! qualifies when its name ends with the notebook suffix and it resolves
//! (following symlinks) to a regular file; a directory called `x.ipynb`
//! or a dangling symlink does not.

use crate::config::ConversionConfig;
use crate::error::Nb2HtmlError;
use std::io::ErrorKind;
use std::path::{is_separator, Path, PathBuf};
use tracing::{debug, warn};

/// Strip trailing path separators from a user-supplied directory.
///
/// `"notebooks/"` becomes `"notebooks"`. A path made only of separators is
/// the filesystem root and keeps a single one.
pub fn normalize_dir(dir: &str) -> PathBuf {
    let trimmed = dir.trim_end_matches(is_separator);
    if trimmed.is_empty() && !dir.is_empty() {
        PathBuf::from(&dir[..1])
    } else {
        PathBuf::from(trimmed)
    }
}

/// List the notebook file names (not paths) directly inside `dir`.
///
/// Names are returned sorted so that runs are reproducible.
///
/// # Errors
/// Fatal when the directory is missing, is not a directory, or cannot be
/// listed.
pub async fn list_notebooks(dir: &Path, suffix: &str) -> Result<Vec<String>, Nb2HtmlError> {
    let meta = tokio::fs::metadata(dir)
        .await
        .map_err(|e| dir_error(dir, e))?;
    if !meta.is_dir() {
        return Err(Nb2HtmlError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| dir_error(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| dir_error(dir, e))? {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("Skipping non-UTF-8 file name {:?}", raw);
                continue;
            }
        };
        if !name.ends_with(suffix) {
            continue;
        }

        match tokio::fs::metadata(entry.path()).await {
            Ok(m) if m.is_file() => names.push(name),
            Ok(_) => debug!("Skipping {}: not a regular file", name),
            Err(e) => debug!("Skipping {}: {}", name, e),
        }
    }

    names.sort();
    debug!("Found {} notebooks in {}", names.len(), dir.display());
    Ok(names)
}

/// Path of the HTML file the converter writes for `notebook_path`.
///
/// Only the trailing notebook extension of the file name is replaced.
pub fn html_path_for(notebook_path: &Path, config: &ConversionConfig) -> PathBuf {
    match notebook_path.file_name().and_then(|n| n.to_str()) {
        Some(name) => {
            let suffix = config.notebook_suffix();
            let stem = name.strip_suffix(suffix.as_str()).unwrap_or(name);
            notebook_path.with_file_name(format!("{stem}.{}", config.html_extension))
        }
        None => notebook_path.with_extension(&config.html_extension),
    }
}

fn dir_error(dir: &Path, e: std::io::Error) -> Nb2HtmlError {
    let path = dir.to_path_buf();
    match e.kind() {
        ErrorKind::NotFound => Nb2HtmlError::DirectoryNotFound { path },
        ErrorKind::PermissionDenied => Nb2HtmlError::PermissionDenied { path },
        _ => Nb2HtmlError::ReadDirFailed { path, source: e },
    }
}
