//! Stowage CLI: inspect an upload root using the server's environment configuration.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use stowage_cli::{collect_stats, init_tracing, verify, CategoryStats, VerifyReport};
use stowage_core::Config;
use stowage_storage::{Category, StorageLayout};

#[derive(Parser)]
#[command(name = "stowage", about = "Stowage upload root tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// File count and total size per category
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Recompute content hashes and report files whose name does not match
    Verify {
        /// Restrict to one category (default: both)
        #[arg(long, value_enum)]
        category: Option<VerifyCategory>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum VerifyCategory {
    Image,
    File,
}

impl VerifyCategory {
    fn category(self) -> Category {
        match self {
            VerifyCategory::Image => Category::Image,
            VerifyCategory::File => Category::File,
        }
    }
}

fn print_stats_table(stats: &[CategoryStats]) {
    println!("{:<12} {:>10} {:>16}  DIRECTORY", "CATEGORY", "FILES", "BYTES");
    for s in stats {
        println!(
            "{:<12} {:>10} {:>16}  {}",
            s.category, s.files, s.total_bytes, s.directory
        );
    }
}

fn print_verify_table(report: &VerifyReport) {
    for m in &report.mismatches {
        println!("MISMATCH {:<10} {}  (content hash {})", m.category, m.filename, m.actual_hash);
    }
    println!(
        "checked {} file(s), {} mismatch(es)",
        report.checked,
        report.mismatches.len()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let layout = StorageLayout::from_config(&config.upload);

    match cli.command {
        Commands::Stats { format } => {
            let stats = collect_stats(&layout)
                .await
                .context("Failed to read upload directories")?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => print_stats_table(&stats),
            }
        }
        Commands::Verify { category, format } => {
            let categories = match category {
                Some(c) => vec![c.category()],
                None => vec![Category::Image, Category::File],
            };
            let report = verify(&layout, &categories)
                .await
                .context("Failed to verify upload directories")?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => print_verify_table(&report),
            }
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
