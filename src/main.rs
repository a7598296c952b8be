use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod histogram;
mod ingest;
mod models;
mod narrative;
mod report;
mod summary;

use models::Metric;
use narrative::{NarrativeClient, NarrativeConfig};

#[derive(Parser)]
#[command(name = "performance-insight")]
#[command(about = "Employee performance score distributions and analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize score distributions across all employees
    Summarize {
        #[arg(long)]
        csv: PathBuf,
        /// Request a narrative analysis from the configured LLM
        #[arg(long)]
        narrate: bool,
    },
    /// Render a histogram for one metric, or all three
    Distribution {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_enum)]
        metric: Option<Metric>,
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Inspect a single employee by NIPP
    Inspect {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        worker: String,
        #[arg(long)]
        narrate: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long)]
        narrate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The credential is read exactly once here and threaded through;
    // commands that never narrate never look at it.
    let narrative_config = NarrativeConfig::from_env();

    match cli.command {
        Commands::Summarize { csv, narrate } => {
            let table = load_table(&csv)?;
            let summaries = summary::summarize(&table.records, &Metric::ALL)?;

            println!("Score summaries across {} employees:", table.records.len());
            for (metric, metric_summary) in &summaries {
                println!(
                    "- {}: min {:.2}, max {:.2}, mean {:.2}",
                    metric.label(),
                    metric_summary.minimum,
                    metric_summary.maximum,
                    metric_summary.mean
                );
            }

            let counts = summary::breakdown(&table.records);
            println!("\nPerformance bands:");
            for (band, count) in counts.counts() {
                println!("- {band}: {count}");
            }

            if narrate {
                run_narrative(&narrative_config, narrative::distribution_prompt(&summaries)).await;
            }
        }
        Commands::Distribution { csv, metric, bins } => {
            let table = load_table(&csv)?;
            let metrics: Vec<Metric> = match metric {
                Some(one) => vec![one],
                None => Metric::ALL.to_vec(),
            };

            for metric in metrics {
                let values: Vec<f64> = table
                    .records
                    .iter()
                    .filter_map(|record| metric.value(record))
                    .collect();
                println!("{}", histogram::render(&values, metric.label(), bins));
            }
        }
        Commands::Inspect {
            csv,
            worker,
            narrate,
        } => {
            let table = load_table(&csv)?;
            let record = summary::lookup(&table.records, &worker)?;
            let band = summary::classify(record.individual_performance_score);

            println!("NIPP {}", record.worker_id);
            println!("Position: {}", record.position_name);
            for metric in Metric::ALL {
                match metric.value(record) {
                    Some(score) => println!("{}: {score:.2}", metric.label()),
                    None => println!("{}: not available", metric.label()),
                }
            }
            println!("Performance band: {band}");

            if narrate {
                run_narrative(&narrative_config, narrative::employee_prompt(record)).await;
            }
        }
        Commands::Report { csv, out, narrate } => {
            let table = load_table(&csv)?;
            let summaries = summary::summarize(&table.records, &Metric::ALL)?;

            let narrative_text = if narrate {
                fetch_narrative(&narrative_config, narrative::distribution_prompt(&summaries))
                    .await
            } else {
                None
            };

            let source = csv.display().to_string();
            let report = report::build_report(
                &source,
                &table.records,
                &summaries,
                narrative_text.as_deref(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn load_table(csv: &std::path::Path) -> anyhow::Result<ingest::LoadedTable> {
    let table = ingest::load_records(csv)?;
    if table.coerced_cells > 0 {
        eprintln!(
            "Warning: {} non-numeric score cells were treated as missing.",
            table.coerced_cells
        );
    }
    for worker_id in &table.duplicate_ids {
        eprintln!("Warning: NIPP {worker_id} appears more than once; the first row is used.");
    }
    Ok(table)
}

/// Narrative failures are a notice, never a crash.
async fn run_narrative(config: &NarrativeConfig, prompt: String) {
    if let Some(text) = fetch_narrative(config, prompt).await {
        println!("\nNarrative analysis:\n{text}");
    }
}

async fn fetch_narrative(config: &NarrativeConfig, prompt: String) -> Option<String> {
    let client = match NarrativeClient::new(config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Narrative unavailable: {err}");
            return None;
        }
    };

    match client.generate(&prompt).await {
        Ok(text) => Some(text),
        Err(err) => {
            eprintln!("Narrative unavailable: {err}");
            None
        }
    }
}
