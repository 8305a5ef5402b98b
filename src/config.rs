//! Configuration types for notebook-to-HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the classic
//! invocation `jupyter nbconvert --to html --template full <file>` followed
//! by the artifact-stripping minify pass.

use crate::error::Nb2HtmlError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a directory conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use nb2html::{ConversionConfig, MinifyMode};
///
/// let config = ConversionConfig::builder()
///     .template("lab")
///     .minify_mode(MinifyMode::Plain)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Converter program. Default: `jupyter`.
    pub converter: String,

    /// Arguments placed between the program and `--to html`. Default: `["nbconvert"]`.
    ///
    /// Set to an empty list when `converter` points straight at a
    /// `jupyter-nbconvert` executable.
    pub converter_args: Vec<String>,

    /// nbconvert template name passed as `--template`. Default: `full`.
    ///
    /// nbconvert 6+ renamed the standalone template to `lab` / `classic`;
    /// older installs only know `full`.
    pub template: String,

    /// Extension (without the dot) that marks a notebook. Default: `ipynb`.
    pub notebook_extension: String,

    /// Extension (without the dot) of the converter's output. Default: `html`.
    pub html_extension: String,

    /// Which minify variant to run on each HTML file. Default: [`MinifyMode::StripArtifacts`].
    pub minify_mode: MinifyMode,

    /// Literal sequence removed from every line in [`MinifyMode::StripArtifacts`].
    /// Default: `&#182;`, the pilcrow nbconvert emits for heading anchor links.
    pub footnote_marker: String,

    /// Optional per-notebook progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            converter: "jupyter".to_string(),
            converter_args: vec!["nbconvert".to_string()],
            template: "full".to_string(),
            notebook_extension: "ipynb".to_string(),
            html_extension: "html".to_string(),
            minify_mode: MinifyMode::default(),
            footnote_marker: "&#182;".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("converter", &self.converter)
            .field("converter_args", &self.converter_args)
            .field("template", &self.template)
            .field("notebook_extension", &self.notebook_extension)
            .field("html_extension", &self.html_extension)
            .field("minify_mode", &self.minify_mode)
            .field("footnote_marker", &self.footnote_marker)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// `.ipynb`-style suffix used when matching file names.
    pub fn notebook_suffix(&self) -> String {
        format!(".{}", self.notebook_extension)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn converter(mut self, program: impl Into<String>) -> Self {
        self.config.converter = program.into();
        self
    }

    pub fn converter_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.converter_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.config.template = template.into();
        self
    }

    pub fn notebook_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.config.notebook_extension = strip_dot(ext.as_ref());
        self
    }

    pub fn html_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.config.html_extension = strip_dot(ext.as_ref());
        self
    }

    pub fn minify_mode(mut self, mode: MinifyMode) -> Self {
        self.config.minify_mode = mode;
        self
    }

    pub fn footnote_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.footnote_marker = marker.into();
        self
    }

    /// Receive per-notebook events while the run progresses.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Nb2HtmlError> {
        let c = &self.config;
        if c.converter.trim().is_empty() {
            return Err(Nb2HtmlError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        if c.template.trim().is_empty() {
            return Err(Nb2HtmlError::InvalidConfig(
                "Template name must not be empty".into(),
            ));
        }
        if c.notebook_extension.is_empty() || c.html_extension.is_empty() {
            return Err(Nb2HtmlError::InvalidConfig(
                "Notebook and HTML extensions must not be empty".into(),
            ));
        }
        if c.notebook_extension == c.html_extension {
            return Err(Nb2HtmlError::InvalidConfig(format!(
                "Notebook and HTML extensions must differ, both are '{}'",
                c.html_extension
            )));
        }
        Ok(self.config)
    }
}

fn strip_dot(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which cleanup the minifier applies after dropping blank lines.
///
/// | Mode | Trims lines | Drops blank lines | Drops `<title>` line | Removes footnote marker |
/// |------|-------------|-------------------|----------------------|-------------------------|
/// | `Plain` | ✓ | ✓ | | |
/// | `StripArtifacts` | ✓ | ✓ | ✓ | ✓ |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MinifyMode {
    /// Whitespace only.
    Plain,
    /// Whitespace plus the redundant title line and anchor markers. (default)
    #[default]
    StripArtifacts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_invocation() {
        let c = ConversionConfig::default();
        assert_eq!(c.converter, "jupyter");
        assert_eq!(c.converter_args, vec!["nbconvert"]);
        assert_eq!(c.template, "full");
        assert_eq!(c.notebook_suffix(), ".ipynb");
        assert_eq!(c.minify_mode, MinifyMode::StripArtifacts);
        assert_eq!(c.footnote_marker, "&#182;");
    }

    #[test]
    fn builder_strips_leading_dots() {
        let c = ConversionConfig::builder()
            .notebook_extension(".ipynb")
            .html_extension(".htm")
            .build()
            .unwrap();
        assert_eq!(c.notebook_extension, "ipynb");
        assert_eq!(c.html_extension, "htm");
    }

    #[test]
    fn builder_rejects_equal_extensions() {
        let err = ConversionConfig::builder()
            .html_extension("ipynb")
            .build()
            .unwrap_err();
        assert!(matches!(err, Nb2HtmlError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_empty_converter() {
        let err = ConversionConfig::builder().converter("  ").build().unwrap_err();
        assert!(err.to_string().contains("Converter"));
    }

    #[test]
    fn builder_rejects_empty_template() {
        assert!(ConversionConfig::builder().template("").build().is_err());
    }

    #[test]
    fn debug_hides_callback() {
        let c = ConversionConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ConversionProgressCallback>"));
    }
}
