//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use supportdesk_core::pipeline::{BatchOutcome, SupportPipeline, parse_ticket_batch};
use supportdesk_core::samples::SAMPLE_TICKETS;
use supportdesk_core::{EventSink, PipelineEvent, TracingSink, report};
use supportdesk_shared::{
    AppConfig, ProcessedTicket, init_config, init_config_at, load_config, load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SupportDesk: classify, route, and draft responses for support tickets.
#[derive(Parser)]
#[command(
    name = "supportdesk",
    version,
    about = "Classify, route, and draft responses for customer support tickets.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.supportdesk/supportdesk.toml).
    #[arg(long, global = true, env = "SUPPORTDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Process a single ticket from raw text.
    Process {
        /// Ticket text.
        text: String,

        /// Print the full result as JSON instead of a report.
        #[arg(long)]
        json: bool,
    },

    /// Process a JSON array of tickets, continuing past invalid ones.
    Batch {
        /// Path to the JSON file.
        file: PathBuf,

        /// Print results as JSON instead of reports.
        #[arg(long)]
        json: bool,
    },

    /// Run the built-in sample tickets.
    Demo,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so that
/// reports and JSON on stdout stay clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "supportdesk=warn",
        1 => "supportdesk=info",
        2 => "supportdesk=debug",
        _ => "supportdesk=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Process { text, json } => cmd_process(config_path, &text, json),
        Command::Batch { file, json } => cmd_batch(config_path, &file, json),
        Command::Demo => cmd_demo(config_path),
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(config_path, force),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load config from the explicit path, or the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_process(config_path: Option<&Path>, text: &str, json: bool) -> Result<()> {
    let config = resolve_config(config_path)?;
    let pipeline = SupportPipeline::new(&config);

    info!(chars = text.len(), "processing ticket");
    let result = pipeline.process(text, &TracingSink)?;

    print_result(&result, json)
}

fn cmd_batch(config_path: Option<&Path>, file: &Path, json: bool) -> Result<()> {
    let config = resolve_config(config_path)?;
    let pipeline = SupportPipeline::new(&config);

    let content = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("cannot read ticket file '{}'", file.display()))?;
    let tickets = parse_ticket_batch(&content)?;

    info!(file = %file.display(), count = tickets.len(), "processing ticket batch");

    let reporter = CliProgress::new(tickets.len() as u64);
    let outcomes = pipeline.process_batch(tickets, &reporter);
    reporter.finish();

    if json {
        let entries: Vec<serde_json::Value> = outcomes.iter().map(outcome_json).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(result) => println!("{}\n", report::render(result)),
                Err(e) => println!("Ticket #{}: error: {e}\n", outcome.index + 1),
            }
        }
    }

    print_batch_summary(&outcomes);
    Ok(())
}

fn cmd_demo(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let pipeline = SupportPipeline::new(&config);
    let total = SAMPLE_TICKETS.len();

    println!("SupportDesk demo: processing {total} sample tickets\n");

    let reporter = CliProgress::new(total as u64);
    let mut results = Vec::with_capacity(total);
    for sample in &SAMPLE_TICKETS {
        reporter.bar.set_prefix(sample.name);
        results.push((sample.name, pipeline.process(sample.content, &reporter)));
    }
    reporter.finish();

    let mut failed = 0;
    for (i, (name, result)) in results.iter().enumerate() {
        println!("{}", "#".repeat(80));
        println!("SAMPLE TICKET {}/{total}: {name}", i + 1);
        match result {
            Ok(result) => println!("{}\n", report::render(result)),
            Err(e) => {
                failed += 1;
                println!("Error processing ticket: {e}\n");
            }
        }
    }

    println!("Demo complete: {} processed, {failed} failed.", total - failed);
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(p) => {
            init_config_at(p, force)?;
            p.to_path_buf()
        }
        None => init_config(force)?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn print_result(result: &ProcessedTicket, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", report::render(result));
    }
    Ok(())
}

fn outcome_json(outcome: &BatchOutcome) -> serde_json::Value {
    match &outcome.result {
        Ok(result) => serde_json::json!({ "index": outcome.index, "result": result }),
        Err(e) => serde_json::json!({ "index": outcome.index, "error": e.to_string() }),
    }
}

fn print_batch_summary(outcomes: &[BatchOutcome]) {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let escalated = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .filter(|r| r.escalation.needs_escalation)
        .count();

    eprintln!();
    eprintln!("  Batch complete");
    eprintln!("  Tickets:   {}", outcomes.len());
    eprintln!("  Escalated: {escalated}");
    eprintln!("  Failed:    {failed}");
    eprintln!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Progress bar fed by pipeline events; also forwards events to tracing.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {prefix} {msg}")
        {
            bar.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]),
            );
        }
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl EventSink for CliProgress {
    fn record(&self, event: &PipelineEvent<'_>) {
        TracingSink.record(event);
        self.bar.set_message(event.action());
        if matches!(
            event,
            PipelineEvent::Completed(_) | PipelineEvent::Failed { .. }
        ) {
            self.bar.inc(1);
        }
    }
}
