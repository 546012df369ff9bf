//! Pulse Datagen CLI.
//!
//! Generate festival datasets as SQL and inspect their lineups.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pulse_datagen::{Dataset, DatasetConfig, DatasetGenerator, GenerationReport, write_dataset};
use pulse_lineup::PerformanceMember;

#[derive(Parser)]
#[command(name = "pulse-datagen")]
#[command(about = "Synthetic festival dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset and write it as SQL.
    Generate {
        /// Config file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Random seed, overrides the config
        #[arg(short, long, env = "PULSE_SEED")]
        seed: Option<u64>,
        /// SQL output file
        #[arg(short, long, default_value = "load.sql")]
        output: PathBuf,
        /// Write a JSON generation report here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Generate a dataset and print festival lineups.
    Lineup {
        /// Config file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Random seed, overrides the config
        #[arg(short, long, env = "PULSE_SEED")]
        seed: Option<u64>,
        /// Only show this festival
        #[arg(short, long)]
        festival: Option<u32>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Preset: small, standard, large
        #[arg(short, long, default_value = "standard")]
        preset: String,
    },
}

fn load_config(path: Option<&PathBuf>, seed: Option<u64>) -> Result<DatasetConfig> {
    let mut config = match path {
        Some(path) => DatasetConfig::load(path)?,
        None => DatasetConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn performers(members: &[PerformanceMember], performance_id: u32) -> String {
    let rows: Vec<&PerformanceMember> = members
        .iter()
        .filter(|m| m.performance_id == performance_id)
        .collect();
    match rows.first().and_then(|m| m.group_id) {
        Some(group_id) => format!(
            "group {} ({})",
            group_id,
            rows.iter()
                .map(|m| m.artist_id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => rows
            .iter()
            .map(|m| format!("artist {}", m.artist_id))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn print_lineups(dataset: &Dataset, festival_filter: Option<u32>) {
    let stage_names: HashMap<u32, &str> = dataset
        .stages
        .iter()
        .map(|s| (s.stage.id, s.name.as_str()))
        .collect();

    for festival in &dataset.festivals {
        let festival_id = festival.festival.id;
        if festival_filter.is_some_and(|id| id != festival_id) {
            continue;
        }
        println!("\n=== {} (festival {}) ===", festival.name, festival_id);

        for event in dataset.events.iter().filter(|e| e.festival_id == festival_id) {
            println!(
                "Event {} on {} at {} ({}h)",
                event.id,
                event.date,
                stage_names.get(&event.stage_id).copied().unwrap_or("?"),
                event.total_duration.num_hours()
            );
            for perf in dataset.performances_for(event.id) {
                println!(
                    "  {}  {:>3} min  {:<13}  {}",
                    perf.start_time.format("%H:%M"),
                    perf.duration.num_minutes(),
                    perf.kind.name(),
                    performers(&dataset.performance_members, perf.id)
                );
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Generate {
            config,
            seed,
            output,
            report,
        } => {
            let config = load_config(config.as_ref(), seed)?;
            let started_at = Utc::now();
            let seed = config.seed;
            let continent_goal = config.lineup.coverage.min_continents;

            let mut generator = DatasetGenerator::new(config)?;
            let dataset = generator.generate()?;

            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            let mut writer = BufWriter::new(file);
            write_dataset(&mut writer, &dataset)?;
            info!(path = %output.display(), "Wrote SQL");

            let summary = GenerationReport::new(seed, continent_goal, started_at, &dataset);
            if let Some(path) = report {
                summary.save(&path)?;
                info!(path = %path.display(), "Wrote report");
            }
            println!("{}", summary.summary());
        }

        Commands::Lineup {
            config,
            seed,
            festival,
        } => {
            let config = load_config(config.as_ref(), seed)?;
            let mut generator = DatasetGenerator::new(config)?;
            let dataset = generator.generate()?;
            print_lineups(&dataset, festival);
        }

        Commands::Config { preset } => {
            let config = DatasetConfig::preset(&preset)?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
