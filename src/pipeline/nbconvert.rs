//! Converter invocation: run nbconvert (or a stand-in) on one notebook.
//!
//! The command is built as an argument vector and executed directly, never
//! through a shell, so notebook names containing spaces, quotes or `;` reach
//! the converter as a single literal argument.
//!
//! A converter failure never aborts the run. The outcome, including the
//! captured output, is returned as a [`ConverterRun`] and the caller decides
//! how to surface it.

use crate::config::ConversionConfig;
use crate::error::NotebookError;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, warn};

/// What happened when the converter ran for one notebook.
#[derive(Debug, Clone)]
pub struct ConverterRun {
    /// Combined stdout + stderr, or the spawn error text.
    pub output: String,
    /// `None` when the process could not be started or died from a signal.
    pub exit_code: Option<i32>,
    pub error: Option<NotebookError>,
    pub duration_ms: u64,
}

/// Arguments passed to the converter program, in order.
///
/// `[converter_args…] --to html --template <template> <notebook_path>`
pub fn build_args(notebook_path: &Path, config: &ConversionConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = config.converter_args.iter().map(OsString::from).collect();
    args.extend(
        ["--to", "html", "--template", config.template.as_str()]
            .into_iter()
            .map(OsString::from),
    );
    args.push(notebook_path.as_os_str().to_os_string());
    args
}

/// Human-readable rendering of the full command line, for logs.
pub fn describe_command(notebook_path: &Path, config: &ConversionConfig) -> String {
    std::iter::once(config.converter.clone())
        .chain(
            build_args(notebook_path, config)
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        )
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the converter to completion for `notebook_path`.
///
/// Waits for the process to exit; there is no timeout.
pub async fn run_converter(
    notebook: &str,
    notebook_path: &Path,
    config: &ConversionConfig,
) -> ConverterRun {
    let start = Instant::now();
    debug!("Running: {}", describe_command(notebook_path, config));

    let result = Command::new(&config.converter)
        .args(build_args(notebook_path, config))
        .stdin(Stdio::null())
        .output()
        .await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(out) => {
            let output = combine_output(&out.stdout, &out.stderr);
            let exit_code = out.status.code();
            let error = if out.status.success() {
                None
            } else {
                warn!("Converter failed for {} ({})", notebook, out.status);
                Some(NotebookError::ConverterFailed {
                    notebook: notebook.to_string(),
                    code: exit_code,
                    output: output.clone(),
                })
            };
            ConverterRun {
                output,
                exit_code,
                error,
                duration_ms,
            }
        }
        Err(e) => {
            warn!("Could not start '{}' for {}: {}", config.converter, notebook, e);
            let error = if e.kind() == ErrorKind::NotFound {
                NotebookError::ConverterNotFound {
                    notebook: notebook.to_string(),
                    program: config.converter.clone(),
                }
            } else {
                NotebookError::SpawnFailed {
                    notebook: notebook.to_string(),
                    program: config.converter.clone(),
                    detail: e.to_string(),
                }
            };
            ConverterRun {
                output: error.to_string(),
                exit_code: None,
                error: Some(error),
                duration_ms,
            }
        }
    }
}

/// Join stdout and stderr into one diagnostic text, stdout first.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&err);
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_args() {
        let config = ConversionConfig::default();
        let args = build_args(Path::new("notebooks/a.ipynb"), &config);
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["nbconvert", "--to", "html", "--template", "full", "notebooks/a.ipynb"]
        );
    }

    #[test]
    fn test_hostile_name_is_one_argument() {
        let config = ConversionConfig::default();
        let path = PathBuf::from("nb/x; rm -rf ~.ipynb");
        let args = build_args(&path, &config);
        assert_eq!(args.last().unwrap(), path.as_os_str());
        assert_eq!(args.len(), 6);
    }

    #[test]
    fn test_describe_command() {
        let config = ConversionConfig::builder().template("lab").build().unwrap();
        assert_eq!(
            describe_command(Path::new("a.ipynb"), &config),
            "jupyter nbconvert --to html --template lab a.ipynb"
        );
    }

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output(b"out", b"err"), "out\nerr");
        assert_eq!(combine_output(b"out\n", b"err"), "out\nerr");
        assert_eq!(combine_output(b"", b"err"), "err");
        assert_eq!(combine_output(b"out", b""), "out");
    }

    #[tokio::test]
    async fn test_missing_converter_is_not_fatal() {
        let config = ConversionConfig::builder()
            .converter("nb2html-no-such-converter-5f1c")
            .build()
            .unwrap();
        let run = run_converter("a.ipynb", Path::new("a.ipynb"), &config).await;
        assert!(matches!(
            run.error,
            Some(NotebookError::ConverterNotFound { .. })
        ));
        assert_eq!(run.exit_code, None);
        assert!(run.output.contains("nb2html-no-such-converter-5f1c"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_both_streams_on_failure() {
        // sh -c SCRIPT --to html --template full FILE  →  $0=--to … $4=FILE
        let config = ConversionConfig::builder()
            .converter("sh")
            .converter_args(["-c", "echo \"converting $4\"; echo boom >&2; exit 3"])
            .build()
            .unwrap();
        let run = run_converter("a.ipynb", Path::new("a.ipynb"), &config).await;
        assert_eq!(run.exit_code, Some(3));
        assert_eq!(run.output, "converting a.ipynb\nboom\n");
        match run.error {
            Some(NotebookError::ConverterFailed { code, ref output, .. }) => {
                assert_eq!(code, Some(3));
                assert!(output.contains("boom"));
            }
            ref other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_has_no_error() {
        let config = ConversionConfig::builder()
            .converter("sh")
            .converter_args(["-c", "echo \"$1 $3\""])
            .build()
            .unwrap();
        let run = run_converter("a.ipynb", Path::new("a.ipynb"), &config).await;
        assert!(run.error.is_none());
        assert_eq!(run.exit_code, Some(0));
        assert_eq!(run.output, "html full\n");
    }
}
