//! CLI binary for marksheet-verify.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `VerifierConfig` and prints reports.

use anyhow::{Context, Result};
use clap::Parser;
use marksheet_verify::verify::write_atomic;
use marksheet_verify::{
    expand_inputs, extract_text, verify_batch, verify_file, verify_to_file, BatchEntry,
    BatchSummary, DocumentReport, DocumentStatus, GradeScale, ProgressCallback, ReportedSource,
    VerificationProgressCallback, VerifierConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
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

fn status_label(status: DocumentStatus) -> String {
    match status {
        DocumentStatus::Verified => green(&format!("✔ {status}")),
        DocumentStatus::Mismatch => red(&format!("✘ {status}")),
        DocumentStatus::NoTextExtracted | DocumentStatus::NoCoursesFound => {
            cyan(&format!("⚠ {status}"))
        }
    }
}

fn truncate(msg: &str, max: usize) -> String {
    if msg.chars().count() > max {
        let head: String = msg.chars().take(max - 1).collect();
        format!("{head}\u{2026}")
    } else {
        msg.to_string()
    }
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar over the batch plus one log line
/// per finished document. Documents finish out of order when run
/// concurrently, so start times are keyed by document number.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, doc_num: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&doc_num)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl VerificationProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Verifying");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Verifying {total} transcripts…"))
        ));
    }

    fn on_document_start(&self, doc_num: usize, _total: usize, name: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(doc_num, Instant::now());
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(
        &self,
        doc_num: usize,
        total: usize,
        name: &str,
        status: DocumentStatus,
    ) {
        let secs = self.elapsed_secs(doc_num);
        self.bar.println(format!(
            "  {:>3}/{:<3}  {:<32}  {}  {}",
            doc_num,
            total,
            truncate(name, 32),
            status_label(status),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, doc_num: usize, total: usize, name: &str, error: &str) {
        let secs = self.elapsed_secs(doc_num);
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {:>3}/{:<3}  {:<32}  {} {}  {}",
            doc_num,
            total,
            truncate(name, 32),
            red("✗"),
            red(&truncate(error, 80)),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        if failed > 0 {
            eprintln!(
                "{} {}/{} transcripts read  ({} unreadable)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Verify one transcript
  marksheet-verify semester3.pdf

  # Verify every .pdf / .txt in a directory, 8 at a time
  marksheet-verify -c 8 transcripts/

  # Machine-readable output, non-zero exit unless every transcript checks out
  marksheet-verify --json --strict transcripts/ > report.json

  # Write the JSON report to a file
  marksheet-verify semester3.pdf -o semester3.json

  # Show the text the extractors see
  marksheet-verify --dump-text semester3.pdf

  # Institution-specific grade points
  marksheet-verify --grade-scale scale.json semester3.pdf

GRADE SCALE FILE:
  A JSON object mapping grade symbols to points (0-10), e.g.
    {"O": 10, "A+": 9, "A": 8, "B+": 7, "B": 6, "C": 5, "P": 4, "F": 0}

ENVIRONMENT VARIABLES:
  MARKSHEET_OUTPUT        Default for --output
  MARKSHEET_CONCURRENCY   Default for --concurrency
  MARKSHEET_PASSWORD      Default for --password
  MARKSHEET_TOLERANCE     Default for --tolerance
  MARKSHEET_GRADE_SCALE   Default for --grade-scale
  PDFIUM_LIB_PATH         Directory containing libpdfium
  RUST_LOG                Overrides the log filter

SETUP:
  PDF input needs the pdfium shared library. Put it next to the binary's
  working directory, on the system library path, or point PDFIUM_LIB_PATH
  at the directory holding it. Text (.txt) transcripts need nothing.
"#;

/// Verify the totals printed on academic transcripts.
#[derive(Parser, Debug)]
#[command(
    name = "marksheet-verify",
    version,
    about = "Verify the totals printed on academic transcripts",
    long_about = "Extract course rows (code, credit, earned credit, grade) from PDF or text \
transcripts and check the reported credits, earned grade points and SGPA against the \
values recomputed from those rows.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Transcript files (.pdf / .txt) or directories containing them.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write the JSON report to this file.
    #[arg(short, long, env = "MARKSHEET_OUTPUT")]
    output: Option<PathBuf>,

    /// Number of documents verified concurrently.
    #[arg(short, long, env = "MARKSHEET_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// PDF user password for encrypted transcripts.
    #[arg(long, env = "MARKSHEET_PASSWORD")]
    password: Option<String>,

    /// Maximum absolute difference accepted between calculated and reported values.
    #[arg(long, env = "MARKSHEET_TOLERANCE", default_value_t = 0.1)]
    tolerance: f64,

    /// JSON file mapping grade symbols to points.
    #[arg(long, env = "MARKSHEET_GRADE_SCALE")]
    grade_scale: Option<PathBuf>,

    /// Print the extracted text and exit.
    #[arg(long)]
    dump_text: bool,

    /// Output structured JSON instead of tables.
    #[arg(long, env = "MARKSHEET_JSON")]
    json: bool,

    /// Exit non-zero unless every transcript is verified.
    #[arg(long, env = "MARKSHEET_STRICT")]
    strict: bool,

    /// Disable progress bar.
    #[arg(long, env = "MARKSHEET_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MARKSHEET_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MARKSHEET_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = expand_inputs(&cli.inputs).context("Failed to read inputs")?;
    if paths.is_empty() {
        anyhow::bail!("No .pdf or .txt transcripts found in the given inputs");
    }

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar only runs for batches and replaces INFO-level logs.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && !cli.dump_text && paths.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn VerificationProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    // ── Dump-text mode ───────────────────────────────────────────────────
    if cli.dump_text {
        for path in &paths {
            let text = extract_text(path, &config)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if paths.len() > 1 {
                println!("{}", bold(&format!("==> {} <==", path.display())));
            }
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Single document ──────────────────────────────────────────────────
    if let [path] = paths.as_slice() {
        let report = match cli.output {
            Some(ref out) => verify_to_file(path, out, &config).await,
            None => verify_file(path, &config).await,
        }
        .with_context(|| format!("Verification of {} failed", path.display()))?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
            println!("{json}");
        } else if !cli.quiet {
            print_report(&report);
            if let Some(ref out) = cli.output {
                eprintln!("{}  {}", dim("report written to"), bold(&out.display().to_string()));
            }
        }

        let ok = !cli.strict || report.status == DocumentStatus::Verified;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    // ── Batch ────────────────────────────────────────────────────────────
    let start = Instant::now();
    let entries = verify_batch(&paths, &config).await;
    let summary = BatchSummary::from_entries(&entries);
    let batch_json = serde_json::json!({ "summary": summary, "documents": entries });

    if let Some(ref out) = cli.output {
        let json =
            serde_json::to_string_pretty(&batch_json).context("Failed to serialise report")?;
        write_atomic(out, json.as_bytes())
            .await
            .context("Failed to write report")?;
    }

    if cli.json {
        let json =
            serde_json::to_string_pretty(&batch_json).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        // The progress callback already logged each document as it finished.
        if !show_progress {
            for entry in &entries {
                print_entry_line(entry);
            }
        }
        print_summary(&summary, start.elapsed());
    }

    let ok = !cli.strict || summary.all_verified();
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Map CLI args to `VerifierConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<VerifierConfig> {
    let mut builder = VerifierConfig::builder()
        .tolerance(cli.tolerance)
        .concurrency(cli.concurrency);

    if let Some(ref path) = cli.grade_scale {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read grade scale from {:?}", path))?;
        let scale = GradeScale::from_json(&json)
            .with_context(|| format!("Invalid grade scale in {:?}", path))?;
        builder = builder.grade_scale(scale);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Course table followed by the three verification rows.
fn print_report(report: &DocumentReport) {
    println!("{}", bold(&report.document));

    if report.status.is_empty() {
        println!("  {}", status_label(report.status));
        return;
    }

    println!();
    println!("  {:<12} {:>7} {:>7}  {}", "Code", "Credit", "Earned", "Grade");
    for c in &report.courses {
        println!("  {:<12} {:>7.1} {:>7.1}  {}", c.code, c.credit, c.earned, c.grade);
    }

    println!();
    println!("  {:<8} {:>11} {:>9}  {}", "Field", "Calculated", "Reported", "Match");
    for v in &report.verification {
        let mark = if v.matches { green("✔") } else { red("✘") };
        println!(
            "  {:<8} {:>11.2} {:>9.2}  {}",
            v.field.to_string(),
            v.calculated,
            v.reported,
            mark
        );
    }
    if report.reported.source == ReportedSource::Missing {
        println!("  {}", dim("reported totals not found on the transcript; compared with 0"));
    }

    println!();
    println!("  {}", status_label(report.status));
}

fn print_entry_line(entry: &BatchEntry) {
    match &entry.result {
        Ok(report) => println!(
            "{:<40}  {}  {}",
            truncate(&entry.document, 40),
            status_label(report.status),
            dim(&format!("{} courses", report.courses.len())),
        ),
        Err(e) => println!(
            "{:<40}  {} {}",
            truncate(&entry.document, 40),
            red("✗"),
            red(&e.to_string()),
        ),
    }
}

fn print_summary(summary: &BatchSummary, elapsed: Duration) {
    let mark = if summary.all_verified() {
        green("✔")
    } else if summary.verified == 0 {
        red("✘")
    } else {
        cyan("⚠")
    };
    eprintln!(
        "{} {}/{} correct  {} wrong  {} empty  {} failed  {}",
        mark,
        bold(&summary.verified.to_string()),
        summary.total,
        summary.mismatched,
        summary.empty,
        summary.failed,
        dim(&format!("{}ms", elapsed.as_millis())),
    );
}
