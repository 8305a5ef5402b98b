//! # nb2html
//!
//! Convert a directory of Jupyter notebooks to compact, standalone HTML.
//!
//! ## Why this crate?
//!
//! `jupyter nbconvert --to html` produces pages padded with blank lines and
//! indentation, plus a redundant `<title>` line and a `&#182;` anchor after
//! every heading. When those pages are embedded in a static site the noise
//! shows up in diffs and page weight. This crate drives nbconvert over a
//! whole directory and rewrites every page as trimmed, non-empty lines.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory
//!  │
//!  ├─ 1. Scan      list *.ipynb regular files (non-recursive)
//!  ├─ 2. Convert   jupyter nbconvert --to html --template full <file>
//!  └─ 3. Minify    trim lines, drop blanks, strip <title> and &#182;
//! ```
//!
//! Notebooks are processed one at a time. A failing converter is reported
//! and the run continues; a missing or unwritable HTML file stops it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nb2html::{convert_dir, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_dir("notebooks/", &config).await?;
//!     for nb in &output.notebooks {
//!         println!("{} → {}", nb.notebook, nb.html_path.display());
//!     }
//!     eprintln!("saved {} bytes", output.stats.bytes_saved());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `nb2html` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! nb2html = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, MinifyMode};
pub use convert::{convert_dir, convert_dir_sync, convert_from_bytes, convert_notebook, inspect};
pub use error::{Nb2HtmlError, NotebookError};
pub use output::{ConversionOutput, ConversionStats, MinifyStats, NotebookResult};
pub use pipeline::minify::{minify, minify_file};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, NotebookStream};
