//! CLI binary for nb2html.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nb2html::{
    convert_dir, inspect, ConversionConfig, ConversionOutput, ConversionProgressCallback,
    MinifyMode, ProgressCallback,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback ────────────────────────────────────────────────────

/// Terminal reporter: echoes converter output to stdout and, when enabled,
/// keeps an [indicatif] bar at the bottom of the terminal.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
    /// Skip converter chatter; failures are still reported.
    quiet: bool,
    started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(show_bar: bool, quiet: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS);
            bar.set_style(spinner_style);
            bar.set_prefix("Scanning");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            bar,
            quiet,
            started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let Some(ref bar) = self.bar else { return };
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} notebooks  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_length(total as u64);
        bar.set_style(progress_style);
        bar.set_prefix("Converting");
    }

    /// Print to stdout without tearing the progress bar.
    fn print_stdout(&self, text: &str) {
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{text}")),
            None => println!("{text}"),
        }
    }

    /// Print a status line to stderr.
    fn print_status(&self, line: String) {
        match self.bar {
            Some(ref bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total: usize) {
        self.activate_bar(total);
        if !self.quiet {
            self.print_status(format!(
                "{} {}",
                cyan("◆"),
                bold(&format!("Converting {total} notebooks…"))
            ));
        }
    }

    fn on_notebook_start(&self, _index: usize, _total: usize, name: &str) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        if let Some(ref bar) = self.bar {
            bar.set_message(name.to_string());
        }
    }

    fn on_converter_output(&self, _name: &str, output: &str) {
        let output = output.trim_end();
        if !self.quiet && !output.is_empty() {
            self.print_stdout(output);
        }
    }

    fn on_notebook_complete(&self, index: usize, total: usize, name: &str, bytes_saved: u64) {
        let secs = self.elapsed_secs();
        if !self.quiet {
            self.print_status(format!(
                "  {} {:>3}/{:<3}  {}  {}  {}",
                green("✓"),
                index,
                total,
                name,
                dim(&format!("-{bytes_saved} bytes")),
                dim(&format!("{secs:.1}s")),
            ));
        }
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_notebook_error(&self, index: usize, total: usize, _name: &str, error: &str) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.print_status(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            red(error.lines().next().unwrap_or(error)),
            dim(&format!("{secs:.1}s")),
        ));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_conversion_complete(&self, total: usize, success_count: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        if self.quiet {
            return;
        }

        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!(
                "{} {} notebooks converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} notebooks converted  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every notebook in a directory
  nb2html -d notebooks/

  # Keep <title> lines and anchor markers, only drop blank lines
  nb2html --plain -d notebooks

  # nbconvert 6+ renamed the standalone template
  nb2html --template lab -d notebooks

  # See which notebooks would be converted
  nb2html --list-only -d notebooks

  # Machine-readable report
  nb2html --json -d notebooks > report.json

ENVIRONMENT VARIABLES:
  NB2HTML_DIR         Default for --dir
  NB2HTML_CONVERTER   Converter program (default: jupyter)
  NB2HTML_TEMPLATE    nbconvert template (default: full)
  RUST_LOG            Log filter, overrides --verbose/--quiet

REQUIREMENTS:
  The converter must be installed:  pip install nbconvert
"#;

/// Convert Jupyter notebooks to minified standalone HTML.
#[derive(Parser, Debug)]
#[command(
    name = "nb2html",
    version,
    about = "Convert Jupyter notebooks in a directory to minified standalone HTML",
    long_about = "Run `jupyter nbconvert --to html` on every .ipynb file directly inside a \
directory, then rewrite each HTML file without blank lines, redundant <title> lines \
and &#182; anchor markers.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the notebooks.
    #[arg(short, long, env = "NB2HTML_DIR")]
    dir: String,

    /// Only drop blank lines; keep <title> lines and anchor markers.
    #[arg(long, env = "NB2HTML_PLAIN")]
    plain: bool,

    /// Converter program.
    #[arg(long, env = "NB2HTML_CONVERTER", default_value = "jupyter")]
    converter: String,

    /// nbconvert template (full, lab, classic, …).
    #[arg(long, env = "NB2HTML_TEMPLATE", default_value = "full")]
    template: String,

    /// List the notebooks that would be converted, then exit.
    #[arg(long)]
    list_only: bool,

    /// Output a JSON report (ConversionOutput) on stdout.
    #[arg(long, env = "NB2HTML_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "NB2HTML_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NB2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NB2HTML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.list_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list_only {
        let config = build_config(&cli, None)?;
        let names = inspect(&cli.dir, &config)
            .await
            .context("Failed to scan notebook directory")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&names).context("Failed to serialise list")?
            );
        } else {
            for name in &names {
                println!("{name}");
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    // JSON mode keeps stdout for the report; converter output goes into it.
    let progress_cb: Option<ProgressCallback> = if cli.json {
        None
    } else {
        let cb = CliProgressCallback::new(show_progress, cli.quiet);
        Some(cb as Arc<dyn ConversionProgressCallback>)
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_dir(&cli.dir, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&output);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mode = if cli.plain {
        MinifyMode::Plain
    } else {
        MinifyMode::StripArtifacts
    };

    let mut builder = ConversionConfig::builder()
        .converter(cli.converter.as_str())
        .template(cli.template.as_str())
        .minify_mode(mode);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(output: &ConversionOutput) {
    let stats = &output.stats;
    eprintln!(
        "   {} → {} bytes  ({} saved)  —  {}ms total",
        dim(&stats.total_bytes_before.to_string()),
        dim(&stats.total_bytes_after.to_string()),
        bold(&stats.bytes_saved().to_string()),
        stats.total_duration_ms,
    );
}
