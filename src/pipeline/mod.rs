//! Pipeline stages for notebook-to-HTML conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ nbconvert ──▶ minify
//! (dir)    (subprocess)  (in-place rewrite)
//! ```
//!
//! 1. [`scan`]      — normalise the directory and list its notebooks
//! 2. [`nbconvert`] — run the external converter and capture its output
//! 3. [`minify`]    — strip blank lines and nbconvert artifacts from the HTML

pub mod minify;
pub mod nbconvert;
pub mod scan;
