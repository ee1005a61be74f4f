//! CLI binary for edgequake-pdf2doc.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `PdfToDocument` component and prints `{"documents": [...]}` as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2doc::{
    ByteStream, ConversionProgressCallback, ConverterRegistry, DefaultConverter, Meta,
    PageSelection, PdfToDocument, ProgressCallback, Source, SourceError, DEFAULT_PAGE_BREAK,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the sources, one log line per
/// source.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_sources: usize) {
        self.bar.set_length(total_sources as u64);
    }

    fn on_source_complete(&self, source_num: usize, total: usize, content_len: usize) {
        let note = if content_len == 0 {
            red("no text")
        } else {
            dim(&format!("{content_len:>7} chars"))
        };
        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}",
            green("✓"),
            source_num,
            total,
            note
        ));
        self.bar.inc(1);
    }

    fn on_source_skipped(&self, source_num: usize, total: usize, error: &SourceError) {
        // Truncate very long error messages to keep output tidy.
        let msg = error.to_string();
        let msg = match msg.char_indices().nth(79) {
            Some((cut, _)) => format!("{}\u{2026}", &msg[..cut]),
            None => msg,
        };
        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}",
            red("✗"),
            source_num,
            total,
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_sources: usize, converted: usize) {
        let skipped = total_sources.saturating_sub(converted);
        self.bar.finish_and_clear();
        if skipped == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} skipped)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                total_sources,
                red(&skipped.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one file, JSON to stdout
  pdf2doc document.pdf

  # Several files, shared metadata, write to a file
  pdf2doc a.pdf b.pdf --meta language=en --meta batch=7 -o docs.json

  # Read the PDF from stdin
  cat scan.pdf | pdf2doc - --meta source=upload

  # Only pages 1-5, pages separated by newlines instead of form feeds
  pdf2doc --pages 1-5 --page-break '\n' paper.pdf

  # Save the component configuration, then reuse it
  pdf2doc --pages 2 --dump-config > pdf2doc.json
  pdf2doc --config pdf2doc.json report.pdf

OUTPUT:
  {"documents": [{"id": "...", "content": "...", "meta": {...}}]}
  Files that cannot be read are logged and skipped; the run still succeeds.
"#;

/// Convert PDF files into JSON text documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2doc",
    version,
    about = "Convert PDF files into JSON text documents with metadata",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file paths; `-` reads one PDF from stdin.
    inputs: Vec<String>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "PDF2DOC_OUTPUT")]
    output: Option<PathBuf>,

    /// Metadata attached to every document, as key=value (value parsed as JSON if possible).
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    meta: Vec<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2DOC_PAGES", default_value = "all")]
    pages: String,

    /// Page-break marker (a single character; `\f`, `\n` and `\t` escapes accepted).
    #[arg(long, env = "PDF2DOC_PAGE_BREAK")]
    page_break: Option<String>,

    /// Load the component from a saved configuration record.
    #[arg(long, env = "PDF2DOC_CONFIG", conflicts_with_all = ["pages", "page_break"])]
    config: Option<PathBuf>,

    /// Print the configuration record for the given flags and exit.
    #[arg(long)]
    dump_config: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2DOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2DOC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2DOC_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar prints per-file lines itself, so library warnings
    // would only duplicate them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.dump_config;
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

    // ── Build component ──────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let component = build_component(&cli, progress_cb)?;

    if cli.dump_config {
        println!("{}", component.to_json().context("Failed to serialise configuration")?);
        return Ok(());
    }

    if cli.inputs.is_empty() {
        anyhow::bail!("No input files given");
    }

    let sources = collect_sources(&cli.inputs)?;
    let meta = parse_meta(&cli.meta)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = component
            .run_to_file(sources, meta, output_path)
            .context("Conversion failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {}/{} files  {}ms  →  {}",
                if stats.skipped == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                stats.converted,
                stats.total_sources,
                stats.duration_ms,
                bold(&output_path.display().to_string()),
            );
            if stats.empty > 0 {
                eprintln!("   {} without extractable text", dim(&stats.empty.to_string()));
            }
        }
    } else {
        let output = component
            .run_with_meta(sources, meta)
            .context("Conversion failed")?;

        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;

        if !cli.quiet {
            eprintln!(
                "Converted {}/{} files in {}ms",
                output.stats.converted, output.stats.total_sources, output.stats.duration_ms
            );
            if output.stats.skipped > 0 {
                eprintln!("  {} files skipped", output.stats.skipped);
            }
        }
    }

    Ok(())
}

/// Map CLI args to a `PdfToDocument`.
fn build_component(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PdfToDocument> {
    let mut builder = PdfToDocument::builder();

    if let Some(ref path) = cli.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {:?}", path))?;
        let loaded = PdfToDocument::from_json(&json, &ConverterRegistry::default())
            .context("Invalid configuration")?;
        if let Some(conv) = loaded.converter() {
            builder = builder.converter(Arc::clone(conv));
        }
    } else {
        let pages: PageSelection = cli.pages.parse().context("Invalid --pages")?;
        let page_break = match cli.page_break {
            Some(ref s) => parse_page_break(s)?,
            None => DEFAULT_PAGE_BREAK,
        };
        // Only store an explicit strategy when the flags differ from the
        // built-in defaults, so the default config stays `"converter": null`.
        if pages != PageSelection::All || page_break != DEFAULT_PAGE_BREAK {
            let conv = DefaultConverter::default()
                .with_pages(pages)
                .with_page_break(page_break);
            builder = builder.converter(Arc::new(conv));
        }
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    Ok(builder.build())
}

/// Turn CLI inputs into sources; `-` becomes a byte stream read from stdin.
fn collect_sources(inputs: &[String]) -> Result<Vec<Source>> {
    let mut stdin_used = false;
    inputs
        .iter()
        .map(|input| {
            if input == "-" {
                if stdin_used {
                    anyhow::bail!("`-` (stdin) can only be given once");
                }
                stdin_used = true;
                let mut data = Vec::new();
                io::stdin()
                    .read_to_end(&mut data)
                    .context("Failed to read PDF from stdin")?;
                Ok(Source::from(ByteStream::new(data)))
            } else {
                Ok(Source::from(input.as_str()))
            }
        })
        .collect()
}

/// Parse repeated `--meta key=value` flags.
fn parse_meta(pairs: &[String]) -> Result<Meta> {
    let mut meta = Meta::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Invalid --meta '{}': expected KEY=VALUE", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Invalid --meta '{}': empty key", pair);
        }
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        meta.insert(key.to_string(), value);
    }
    Ok(meta)
}

/// Parse `--page-break` into a single character.
fn parse_page_break(s: &str) -> Result<char> {
    let unescaped = match s {
        "\\f" => "\u{000C}",
        "\\n" => "\n",
        "\\t" => "\t",
        other => other,
    };
    let mut chars = unescaped.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => anyhow::bail!("Page break must be a single character, got '{}'", s),
    }
}
