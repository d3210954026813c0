//! `meetings` CLI — replay scheduling requests against an in-memory meeting store.
//!
//! Input is newline-delimited JSON, one request per line. Blank lines and lines
//! starting with `#` are skipped. Every request produces exactly one JSON response
//! line, in order.
//!
//! ## Usage
//!
//! ```sh
//! # Replay requests from stdin, responses on stdout
//! echo '{"type":"add_user","name":"alice"}' | meetings run
//!
//! # Replay a file with a fixed clock, writing responses to a file
//! meetings run -i requests.jsonl -o responses.jsonl --now 2026-03-16T09:00:00Z
//!
//! # Stop at the first rejected request
//! meetings run -i requests.jsonl --fail-fast
//!
//! # Summarize a replay instead of printing responses
//! meetings stats -i requests.jsonl
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing::{debug, info};

use meeting_engine::logging::{init_tracing, LogConfig, LogFormat};
use meeting_engine::{dispatch, MeetingStore, Request, Response};

#[derive(Parser)]
#[command(
    name = "meetings",
    version,
    about = "Replay meeting scheduling requests against an in-memory store"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "MEETINGS_LOG_LEVEL", default_value = "warn")]
    log_level: tracing::Level,

    /// Log output format: pretty, compact or json (logs go to stderr)
    #[arg(long, global = true, env = "MEETINGS_LOG_FORMAT", default_value = "compact")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch each request and print one JSON response per line
    Run {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Fixed clock for availability searches (defaults to the wall clock)
        #[arg(long, env = "MEETINGS_NOW")]
        now: Option<DateTime<Utc>>,
        /// Exit with an error at the first rejected request
        #[arg(long)]
        fail_fast: bool,
    },
    /// Replay requests and print a summary instead of responses
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Fixed clock for availability searches (defaults to the wall clock)
        #[arg(long, env = "MEETINGS_NOW")]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(
        LogConfig::default()
            .with_level(cli.log_level)
            .with_format(cli.log_format),
    )
    .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run {
            input,
            output,
            now,
            fail_fast,
        } => {
            let requests = read_input(input.as_deref())?;
            let mut store = MeetingStore::new();
            let mut lines = Vec::new();

            for (line_no, line) in request_lines(&requests) {
                let response = handle_line(&mut store, line, now);
                lines.push(serde_json::to_string(&response)?);
                if fail_fast && response.is_error() {
                    write_output(output.as_deref(), &lines)?;
                    anyhow::bail!("Request on line {} was rejected", line_no);
                }
            }

            info!(responses = lines.len(), "replay finished");
            write_output(output.as_deref(), &lines)?;
        }
        Commands::Stats { input, now } => {
            let requests = read_input(input.as_deref())?;
            let mut store = MeetingStore::new();
            let mut total = 0usize;
            let mut rejected = 0usize;

            for (_, line) in request_lines(&requests) {
                total += 1;
                if handle_line(&mut store, line, now).is_error() {
                    rejected += 1;
                }
            }

            println!("Requests:  {}", total);
            println!("Rejected:  {}", rejected);
            println!("Users:     {}", store.user_count());
            println!("Meetings:  {}", store.meeting_count());
        }
    }

    Ok(())
}

/// Non-empty, non-comment lines with their 1-based line numbers.
fn request_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse and dispatch one request line. Malformed lines become `bad_request`
/// error responses so the replay keeps its one-response-per-request shape.
fn handle_line(store: &mut MeetingStore, line: &str, now: Option<DateTime<Utc>>) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(?request, "dispatching");
            dispatch(store, request, now.unwrap_or_else(Utc::now))
        }
        Err(err) => Response::Error {
            code: "bad_request".to_string(),
            message: err.to_string(),
        },
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, lines: &[String]) -> Result<()> {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
