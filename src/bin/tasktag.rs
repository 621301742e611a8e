//! tasktag - task description parsing CLI
//!
//! # Usage
//!
//! ```bash
//! # Parse one description
//! tasktag parse "Do every HW assignment on Fridays at 8pm"
//!
//! # Process a dataset, writing parsed_tasks.json and differences.json
//! tasktag batch tasks.json
//!
//! # Show the configured vocabulary
//! tasktag info
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};

use tasktag::{dataset, ChronoResolver, LexiconAnnotator, PipelineConfig, TaskPipeline};

/// Parse free-text task descriptions into structured records.
#[derive(Parser)]
#[command(name = "tasktag", version, about)]
struct Cli {
    /// Load vocabulary (groups, holidays, durations) from a JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pin the resolver's reference instant (YYYY-MM-DD or
    /// YYYY-MM-DDTHH:MM) for reproducible runs
    #[arg(long, global = true)]
    reference_date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single task description
    Parse {
        /// The task description text
        text: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Process a JSON dataset and report differences against its reference fields
    Batch {
        /// Input dataset (JSON array with "input" fields)
        input: PathBuf,

        /// Where to write parsed records
        #[arg(long, default_value = "parsed_tasks.json")]
        output: PathBuf,

        /// Where to write the diff report
        #[arg(long, default_value = "differences.json")]
        diff: PathBuf,
    },
    /// Show the configured groups, holidays, and duration words
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable field listing
    Text,
    /// JSON record
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> tasktag::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let resolver = match &cli.reference_date {
        Some(raw) => ChronoResolver::with_reference(parse_reference(raw)?),
        None => ChronoResolver::default(),
    };
    let pipeline = TaskPipeline::new(&config, Box::new(LexiconAnnotator::new()), Box::new(resolver));

    match &cli.command {
        Commands::Parse { text, format } => {
            let parsed = pipeline.parse(text)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
                OutputFormat::Text => {
                    let group = parsed
                        .group
                        .map_or_else(|| "-".to_string(), |g| g.join(", "));
                    println!("group:      {group}");
                    println!("task:       {}", parsed.task.as_deref().unwrap_or("-"));
                    println!("datetime:   {}", parsed.datetime.as_deref().unwrap_or("-"));
                    println!("recurrence: {}", parsed.recurrence.as_deref().unwrap_or("-"));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Batch {
            input,
            output,
            diff,
        } => {
            let records = dataset::load_records(input)?;
            let texts: Vec<&str> = records.iter().map(|r| r.input.as_str()).collect();
            let parsed = pipeline.parse_batch(&texts);
            dataset::save_parsed(output, &parsed)?;
            let differences = dataset::diff_report(&records, &parsed);
            dataset::save_diff(diff, &differences)?;
            if differences.is_empty() {
                println!("{} records parsed, no differences", records.len());
            } else {
                println!(
                    "There were {}/{} different outputs between the input and output files, check {}",
                    differences.len(),
                    records.len(),
                    diff.display()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info => {
            println!("groups:");
            for group in &config.groups {
                println!("  {group}");
            }
            println!("holidays:");
            for (name, date) in &config.holidays {
                match date {
                    Some(date) => println!("  {name} ({date})"),
                    None => println!("  {name} (undated)"),
                }
            }
            println!("durations:");
            let words: Vec<&str> = config.durations.iter().map(String::as_str).collect();
            println!("  {}", words.join(" "));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_reference(raw: &str) -> tasktag::Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(12, 0, 0).expect("valid time"))
        .map_err(|e| tasktag::Error::invalid_input(format!("bad --reference-date {raw:?}: {e}")))
}
