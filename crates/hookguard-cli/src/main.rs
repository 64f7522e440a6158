//! hookguard
//!
//! Hook entry point for coding-assistant sessions.
//!
//! Reads hook input on stdin and writes the hook response on stdout:
//! `filter` redacts secrets and profanity, `evaluate` checks an event against
//! user rules, and `capture` turns prompts into filtered log entries.
//! `status` and `analyze` report on the prompt log of the active project.
//! Diagnostics go to stderr only.

use anyhow::Result;
use clap::{Parser, Subcommand};
use hookguard_core::PatternCache;
use hookguard_filters::{FilterPipeline, ResponseSummarizer};
use hookguard_policy::RuleEngine;
use hookguard_telemetry::EntryType;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, warn};

mod commands;
mod config;

use commands::CaptureOptions;
use config::HookguardConfig;

#[derive(Parser, Debug)]
#[command(name = "hookguard")]
#[command(about = "Redaction and rule checks for assistant hook events", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "hookguard.yaml", env = "HOOKGUARD_CONFIG")]
    config: PathBuf,

    /// Profanity word list, overriding the configured one
    #[arg(long, global = true)]
    word_list: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Redact stdin text and print the filter result as JSON
    Filter,

    /// Evaluate a hook event from stdin and print the hook response
    Evaluate {
        /// Rule file, overriding the configured one
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Filter stdin into a prompt log entry
    Capture {
        /// Session id; generated when absent
        #[arg(long)]
        session_id: Option<String>,

        /// user_input, expanded_prompt or response_summary
        #[arg(long, default_value = "user_input")]
        entry_type: EntryType,

        /// Working directory recorded with the entry
        #[arg(long)]
        cwd: Option<String>,

        /// Slash command recorded with the entry
        #[arg(long)]
        command: Option<String>,

        /// Treat stdin as a prompt-submit hook event
        #[arg(long)]
        from_event: bool,

        /// Append to the prompt log in this directory instead of printing
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Append to the active project's prompt log, if logging is enabled
        #[arg(long, conflicts_with = "log_dir")]
        discover: bool,
    },

    /// Show whether prompt logging is enabled for a directory
    Status {
        /// Project root; defaults to the current directory
        #[arg(long)]
        cwd: Option<PathBuf>,
    },

    /// Summarize a prompt log as markdown
    Analyze {
        /// Directory holding the log; defaults to the active project
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Project root used to find the active project
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn rules_override(&self) -> Option<&Path> {
        match &self.command {
            Command::Evaluate { rules } => rules.as_deref(),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "hookguard failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Evaluate { .. } => {
            // The host must always get a response it can act on
            let response = match read_stdin().and_then(|input| {
                let config = HookguardConfig::load(&cli.config, cli)?;
                Ok((input, config))
            }) {
                Ok((input, config)) => {
                    let cache = Arc::new(PatternCache::new(config.cache.capacity));
                    commands::evaluate(&RuleEngine::with_cache(cache), &config, &input)
                }
                Err(e) => commands::error_response(&e),
            };
            write_stdout(&response.to_string())
        }
        Command::Capture {
            from_event: true, ..
        } => write_stdout(&capture_event_response(cli, read_stdin())),
        Command::Capture { .. } => {
            let input = read_stdin()?;
            write_stdout(&capture(cli, &input)?)
        }
        Command::Filter => {
            let input = read_stdin()?;
            let config = load_config(cli)?;
            let cache = PatternCache::new(config.cache.capacity);
            let pipeline = FilterPipeline::from_config(&config.filters, &cache);
            write_stdout(&commands::filter(&pipeline, &input)?)
        }
        Command::Status { cwd } => {
            let cwd = working_dir(cwd.as_deref())?;
            write_stdout(&commands::status(&cwd)?)
        }
        Command::Analyze { dir, cwd, json } => {
            let cwd = working_dir(cwd.as_deref())?;
            write_stdout(&commands::analyze(dir.as_deref(), &cwd, *json)?)
        }
    }
}

fn load_config(cli: &Cli) -> Result<HookguardConfig> {
    let config = HookguardConfig::load(&cli.config, cli)?;
    debug!(config = ?config, "Configuration loaded");
    Ok(config)
}

fn capture(cli: &Cli, input: &str) -> Result<String> {
    let Command::Capture {
        session_id,
        entry_type,
        cwd,
        command,
        from_event,
        log_dir,
        discover,
    } = &cli.command
    else {
        return Ok(String::new());
    };

    let config = load_config(cli)?;
    let cache = PatternCache::new(config.cache.capacity);
    let pipeline = FilterPipeline::from_config(&config.filters, &cache);
    let summarizer = ResponseSummarizer::new()?;

    let options = CaptureOptions {
        session_id: session_id.clone(),
        entry_type: *entry_type,
        cwd: cwd.clone(),
        command: command.clone(),
        from_event: *from_event,
        log_dir: log_dir.clone(),
        discover: *discover,
    };
    commands::capture(&pipeline, &summarizer, &config, &options, input)
}

/// Hook response for `capture --from-event`; every failure passes through
fn capture_event_response(cli: &Cli, input: Result<String>) -> String {
    match input.and_then(|input| capture(cli, &input)) {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Prompt capture failed, passing through");
            commands::pass_through()
        }
    }
}

fn working_dir(cwd: Option<&Path>) -> Result<PathBuf> {
    match cwd {
        Some(cwd) => Ok(cwd.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn write_stdout(output: &str) -> Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}

/// Initialize tracing/logging on stderr
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("hookguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hookguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
