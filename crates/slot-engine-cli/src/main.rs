//! `slots` CLI -- compute bookable slots from an availability request.
//!
//! ## Usage
//!
//! ```sh
//! # Compute slots (stdin → stdout, JSON)
//! cat request.json | slots compute
//!
//! # From file to file
//! slots compute -i request.json -o slots.json
//!
//! # Human-readable output
//! slots compute -i request.json --format text
//!
//! # Inspect the free windows slots are drawn from
//! slots windows -i request.json
//!
//! # Engine diagnostics on stderr
//! RUST_LOG=slot_engine=debug slots compute -i request.json
//! ```
//!
//! The request format is the camelCase JSON form of `slot_engine::RequestSpec`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use slot_engine::{AvailabilityRequest, FreeWindow, TimeSlot, Zone};
use std::io::{self, Read};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Compute bookable slots from working hours and busy time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter used when RUST_LOG is unset (e.g., "debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bookable slots, best first
    Compute {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Show the free windows inside working hours
    Windows {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Compute {
            input,
            output,
            format,
        } => {
            let request = read_request(input.as_deref())?;
            let slots = slot_engine::compute_availability(&request)
                .context("Failed to compute availability")?;
            info!(slots = slots.len(), "availability computed");
            let rendered = render_slots(&slots, &request.zone, format)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Windows {
            input,
            output,
            format,
        } => {
            let request = read_request(input.as_deref())?;
            let windows =
                slot_engine::free_windows(&request).context("Failed to compute free windows")?;
            let rendered = render_windows(&windows, &request.zone, format)?;
            write_output(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log level: {}", default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn read_request(path: Option<&str>) -> Result<AvailabilityRequest> {
    let json = read_input(path)?;
    AvailabilityRequest::from_json(&json).context("Failed to parse availability request")
}

fn render_slots(slots: &[TimeSlot], zone: &Zone, format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(
            &slot_engine::localize_slots(slots, zone),
        )?),
        Format::Text => {
            if slots.is_empty() {
                return Ok("No available slots\n".to_string());
            }
            let mut out = String::new();
            for slot in slots {
                let start = zone.localize(slot.start);
                let end = zone.localize(slot.end);
                out.push_str(&format!(
                    "{} {} to {} ({})\n",
                    start.format("%Y-%m-%d"),
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    start.format("%:z")
                ));
            }
            Ok(out)
        }
    }
}

fn render_windows(windows: &[FreeWindow], zone: &Zone, format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(
            &slot_engine::localize_windows(windows, zone),
        )?),
        Format::Text => {
            let mut out = String::new();
            for w in windows {
                out.push_str(&format!(
                    "{} {} to {} ({} min){}\n",
                    w.date,
                    zone.localize(w.start).format("%H:%M"),
                    zone.localize(w.end).format("%H:%M"),
                    w.duration().num_minutes(),
                    if w.relaxed { " without break" } else { "" }
                ));
            }
            Ok(out)
        }
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

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
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
