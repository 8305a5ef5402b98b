//! Minification: deterministic line cleanup of converter-generated HTML.
//!
//! nbconvert's standalone template is generous with whitespace: indented
//! `<style>` blocks, blank lines between cells, and a `&#182;` anchor link
//! after every heading. This module rewrites each HTML file as a sequence
//! of trimmed, non-empty lines.
//!
//! ## Rules
//!
//! Applied per line, in order:
//!
//! 1. Trim surrounding whitespace
//! 2. *(StripArtifacts)* Remove every occurrence of the footnote marker, then
//!    trim again
//! 3. *(StripArtifacts)* Blank a line that is exactly one `<title>…</title>`
//!    element, since the page heading already carries the title
//! 4. Drop the line if nothing is left
//!
//! Lines are joined with `\n` and no trailing newline is added. Applying the
//! rules to their own output changes nothing.
//!
//! Titles are matched on the trimmed text by prefix and suffix only; this
//! is not an HTML parser and does not try to be one.

use crate::config::MinifyMode;
use crate::error::Nb2HtmlError;
use crate::output::MinifyStats;
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";

/// Minify HTML text.
///
/// `marker` is only consulted in [`MinifyMode::StripArtifacts`]; an empty
/// marker removes nothing.
pub fn minify(input: &str, mode: MinifyMode, marker: &str) -> String {
    input
        .lines()
        .map(|line| clean_line(line, mode, marker))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_line<'a>(line: &'a str, mode: MinifyMode, marker: &str) -> Cow<'a, str> {
    let s = line.trim();
    if mode == MinifyMode::Plain {
        return s.into();
    }
    // Marker first: a title hidden behind a marker must not survive to a
    // second pass.
    let s: Cow<'a, str> = if !marker.is_empty() && s.contains(marker) {
        let mut owned = s.replace(marker, "");
        while owned.contains(marker) {
            owned = owned.replace(marker, "");
        }
        owned.trim().to_string().into()
    } else {
        s.into()
    };
    if is_title_line(&s) {
        "".into()
    } else {
        s
    }
}

fn is_title_line(trimmed: &str) -> bool {
    trimmed.starts_with(TITLE_OPEN) && trimmed.ends_with(TITLE_CLOSE)
}

/// Minify the HTML file at `path` in place.
///
/// The new contents are written to a sibling temp file which is then renamed
/// over the original, so a crash never leaves a half-written page.
///
/// # Errors
/// * [`Nb2HtmlError::HtmlNotFound`] — the file does not exist (typically the
///   converter failed)
/// * [`Nb2HtmlError::ReadFailed`] — unreadable or not UTF-8
/// * [`Nb2HtmlError::OutputWriteFailed`] — the replacement could not be written
pub async fn minify_file(
    path: &Path,
    mode: MinifyMode,
    marker: &str,
) -> Result<MinifyStats, Nb2HtmlError> {
    let original = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => Nb2HtmlError::HtmlNotFound {
                path: path.to_path_buf(),
            },
            _ => Nb2HtmlError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

    let minified = minify(&original, mode, marker);
    write_replacing(path, &minified).await?;

    let stats = MinifyStats {
        lines_before: original.lines().count(),
        lines_after: minified.lines().count(),
        bytes_before: original.len() as u64,
        bytes_after: minified.len() as u64,
    };
    debug!(
        "Minified {}: {} → {} lines, {} → {} bytes",
        path.display(),
        stats.lines_before,
        stats.lines_after,
        stats.bytes_before,
        stats.bytes_after
    );
    Ok(stats)
}

/// Atomic write: temp file next to `path`, then rename.
async fn write_replacing(path: &Path, contents: &str) -> Result<(), Nb2HtmlError> {
    let write_err = |e| Nb2HtmlError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MARKER: &str = "&#182;";
    const SAMPLE: &str = "<html>\n\n  <title>T</title>\n<body>x</body>\n\n";

    fn plain(s: &str) -> String {
        minify(s, MinifyMode::Plain, MARKER)
    }

    fn strip(s: &str) -> String {
        minify(s, MinifyMode::StripArtifacts, MARKER)
    }

    #[test]
    fn test_plain_sample() {
        assert_eq!(plain(SAMPLE), "<html>\n<title>T</title>\n<body>x</body>");
    }

    #[test]
    fn test_strip_sample() {
        assert_eq!(strip(SAMPLE), "<html>\n<body>x</body>");
    }

    #[test]
    fn test_title_removed_heading_kept() {
        let input = "   <title>Foo</title>   \n<h1>Foo</h1>";
        assert_eq!(strip(input), "<h1>Foo</h1>");
    }

    #[test]
    fn test_title_with_trailing_content_kept() {
        // Not a bare title line, so it stays.
        let input = "<title>Foo</title><meta charset=\"utf-8\">";
        assert_eq!(strip(input), input);
    }

    #[test]
    fn test_marker_removed_and_retrimmed() {
        let input = "<h2 id=\"Intro\">Intro<a class=\"anchor-link\" href=\"#Intro\">&#182;</a></h2>";
        assert_eq!(
            strip(input),
            "<h2 id=\"Intro\">Intro<a class=\"anchor-link\" href=\"#Intro\"></a></h2>"
        );
        assert_eq!(strip("  a &#182; b &#182;  "), "a  b");
        assert_eq!(strip("&#182; tail"), "tail");
    }

    #[test]
    fn test_marker_only_line_disappears() {
        assert_eq!(strip("a\n  &#182;&#182; \nb"), "a\nb");
    }

    #[test]
    fn test_marker_spliced_from_fragments() {
        assert_eq!(strip("a&#1&#182;82;b"), "ab");
    }

    #[test]
    fn test_plain_keeps_marker() {
        assert_eq!(plain("x&#182;"), "x&#182;");
    }

    #[test]
    fn test_crlf_and_tabs() {
        assert_eq!(plain("\ta\r\n\r\n  b  \r\n"), "a\nb");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(plain(""), "");
        assert_eq!(strip(" \n\t\n  "), "");
    }

    #[test]
    fn test_never_emits_blank_lines() {
        let input = "  \n<p>\n\n\n &#182; \n<title>x</title>\n  </p>  \n\t";
        for out in [plain(input), strip(input)] {
            assert!(out.lines().all(|l| !l.trim().is_empty()), "got {out:?}");
            assert!(!out.ends_with('\n'));
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            SAMPLE,
            "  <title>A</title>\n <p> &#182; x </p>\n\n",
            "&#182;<title>B</title>&#182;",
            "x&#1&#182;82;",
            "",
        ];
        for input in inputs {
            for mode in [MinifyMode::Plain, MinifyMode::StripArtifacts] {
                let once = minify(input, mode, MARKER);
                assert_eq!(minify(&once, mode, MARKER), once, "mode {mode:?}");
            }
        }
    }

    #[test]
    fn test_empty_marker_is_ignored() {
        assert_eq!(minify(" a ", MinifyMode::StripArtifacts, ""), "a");
    }

    #[tokio::test]
    async fn test_minify_file_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.html");
        std::fs::write(&path, SAMPLE).unwrap();

        let stats = minify_file(&path, MinifyMode::StripArtifacts, MARKER)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>\n<body>x</body>");
        assert_eq!(stats.lines_before, 5);
        assert_eq!(stats.lines_after, 2);
        assert_eq!(stats.bytes_before, SAMPLE.len() as u64);
        assert!(!tmp.path().join("a.html.tmp").exists());
    }

    #[tokio::test]
    async fn test_minify_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = minify_file(&tmp.path().join("gone.html"), MinifyMode::Plain, MARKER)
            .await
            .unwrap_err();
        assert!(matches!(err, Nb2HtmlError::HtmlNotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_minify_rejects_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.html");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = minify_file(&path, MinifyMode::Plain, MARKER)
            .await
            .unwrap_err();
        assert!(matches!(err, Nb2HtmlError::ReadFailed { .. }), "got {err:?}");
    }
}
