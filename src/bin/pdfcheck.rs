//! CLI binary for pdf-rulecheck.
//!
//! A thin shim over the library crate that maps CLI flags to `CheckConfig`
//! and prints verdicts.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_rulecheck::{
    check_file, CheckConfig, CheckProgressCallback, ProgressCallback, RuleStatus, Verdict,
};
use std::io::{self, Write};
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

/// Terminal progress callback: renders a live progress bar and a per-rule
/// log line as each verdict arrives. Rules are evaluated sequentially, so
/// lines arrive in input order.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_check_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Extracting text…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl CheckProgressCallback for CliProgressCallback {
    fn on_check_start(&self, total_rules: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} rules  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_rules as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Checking");
    }

    fn on_rule_start(&self, index: usize, total: usize, rule: &str) {
        let shown: String = rule.chars().take(48).collect();
        self.bar
            .set_message(format!("rule {}/{}: {}", index + 1, total, shown));
    }

    fn on_rule_complete(&self, index: usize, total: usize, verdict: &Verdict) {
        let tick = match verdict.status {
            RuleStatus::Pass => green("✓"),
            RuleStatus::Fail => red("✗"),
        };
        self.bar.println(format!(
            "  {} Rule {:>2}/{:<2}  {}  {}",
            tick,
            index + 1,
            total,
            verdict.rule,
            dim(&format!("{}%", verdict.confidence)),
        ));
        self.bar.inc(1);
    }

    fn on_check_complete(&self, total_rules: usize, passed: usize) {
        self.bar.finish_and_clear();
        let failed = total_rules.saturating_sub(passed);
        if failed == 0 {
            eprintln!(
                "{} {} rules passed",
                green("✔"),
                bold(&passed.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} rules passed  ({} failed)",
                if passed == 0 { red("✘") } else { cyan("⚠") },
                bold(&passed.to_string()),
                total_rules,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check two rules
  pdfcheck contract.pdf -r "contains a signature" -r "dated within 2024"

  # Rules from a file (one per line; blank lines ignored)
  pdfcheck contract.pdf --rules-file rules.txt

  # Check a PDF from a URL
  pdfcheck https://example.com/contract.pdf -r "mentions a refund policy"

  # Use a specific model
  pdfcheck --model gpt-4.1 --provider openai contract.pdf -r "..."

  # Machine-readable output
  pdfcheck --json contract.pdf -r "..." > verdicts.json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to an existing libpdfium

EXIT STATUS:
  0  all rules passed
  1  at least one rule failed (or an error occurred)
"#;

/// Check PDF documents against natural-language rules using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "pdfcheck",
    version,
    about = "Check PDF documents against natural-language rules using LLMs",
    long_about = "Check whether a PDF document (local file or URL) satisfies a set of \
natural-language rules. Text is extracted with pdfium and each rule is judged by an LLM, \
producing a pass/fail verdict with evidence, reasoning, and a confidence score.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// A rule to check (repeatable).
    #[arg(short, long = "rule")]
    rule: Vec<String>,

    /// Read rules from a file, one per line. Blank lines are ignored.
    #[arg(long, env = "PDFCHECK_RULES_FILE")]
    rules_file: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Max LLM output tokens per rule.
    #[arg(long, env = "PDFCHECK_MAX_TOKENS", default_value_t = 1000)]
    max_tokens: usize,

    /// Max document characters embedded in each judgment request.
    #[arg(long, env = "PDFCHECK_MAX_CHARS", default_value_t = 8000)]
    max_chars: usize,

    /// Per-rule LLM call timeout in seconds.
    #[arg(long, env = "PDFCHECK_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFCHECK_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output structured JSON (CheckOutput) instead of a table.
    #[arg(long, env = "PDFCHECK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFCHECK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFCHECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and verdicts.
    #[arg(short, long, env = "PDFCHECK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Collect rules ────────────────────────────────────────────────────
    let mut rules = cli.rule.clone();
    if let Some(ref path) = cli.rules_file {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read rules from {:?}", path))?;
        rules.extend(content.lines().map(|l| l.to_string()));
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn CheckProgressCallback>)
    } else {
        None
    };

    let mut builder = CheckConfig::builder()
        .max_response_tokens(cli.max_tokens)
        .max_document_chars(cli.max_chars)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let mut config = builder.build().context("Invalid configuration")?;
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();

    // ── Run the check ────────────────────────────────────────────────────
    let output = check_file(&cli.input, &rules, &config)
        .await
        .context("Check failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        print_verdicts(&output.results.iter().map(|r| &r.verdict).collect::<Vec<_>>());

        if !cli.quiet {
            eprintln!(
                "   {} tokens in  /  {} tokens out  —  {}ms total",
                dim(&output.stats.total_input_tokens.to_string()),
                dim(&output.stats.total_output_tokens.to_string()),
                output.stats.total_duration_ms,
            );
            if output.stats.rules_degraded > 0 {
                eprintln!(
                    "   {} verdicts degraded (evaluation errors)",
                    red(&output.stats.rules_degraded.to_string())
                );
            }
        }
    }

    if output.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Render verdicts as a readable report on stdout.
fn print_verdicts(verdicts: &[&Verdict]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for verdict in verdicts {
        let status = match verdict.status {
            RuleStatus::Pass => green(&bold("PASS")),
            RuleStatus::Fail => red(&bold("FAIL")),
        };
        let _ = writeln!(
            out,
            "{}  {}  {}",
            status,
            verdict.rule,
            dim(&format!("confidence {}%", verdict.confidence)),
        );
        let _ = writeln!(out, "      evidence:  {}", verdict.evidence);
        let _ = writeln!(out, "      reasoning: {}", verdict.reasoning);
    }
}
