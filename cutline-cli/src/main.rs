//! Cutline CLI Tool
//!
//! Command-line interface for inspecting the timeline layout of a sequence
//! stored as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cutline_core::{Item, NeighborGapPolicy, RationalTime, Sequence, TimeRange};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutline")]
#[command(about = "Cutline - timeline placement and trimming for edited sequences")]
#[command(version)]
struct Cli {
    /// Log resolver decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the layout of every child in a sequence
    Info {
        /// Input sequence JSON file
        input: PathBuf,
    },

    /// Show the natural and trimmed range of one child
    Range {
        /// Input sequence JSON file
        input: PathBuf,

        /// Child index
        #[arg(short, long)]
        index: usize,
    },

    /// List the items bordering one child
    Neighbors {
        /// Input sequence JSON file
        input: PathBuf,

        /// Child index
        #[arg(short, long)]
        index: usize,

        /// Whether boundary transitions get synthesized gaps
        #[arg(long, value_enum, default_value_t = InsertGap::Never)]
        insert_gap: InsertGap,
    },

    /// List clips, optionally only those visible in a search range
    Clips {
        /// Input sequence JSON file
        input: PathBuf,

        /// Search range start, in frames
        #[arg(long, requires = "duration")]
        start: Option<i64>,

        /// Search range duration, in frames
        #[arg(long, requires = "start")]
        duration: Option<i64>,

        /// Frame rate of the search range
        #[arg(long, default_value = "24")]
        rate: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InsertGap {
    Never,
    AroundTransitions,
}

impl From<InsertGap> for NeighborGapPolicy {
    fn from(value: InsertGap) -> Self {
        match value {
            InsertGap::Never => NeighborGapPolicy::Never,
            InsertGap::AroundTransitions => NeighborGapPolicy::AroundTransitions,
        }
    }
}

/// Report settings shared by the subcommands
#[derive(Debug, Clone, Default)]
struct ReportConfig {
    /// Gap policy for neighbor queries
    insert_gap: NeighborGapPolicy,
    /// Restricts clip listings to children visible in this range
    search_range: Option<TimeRange>,
}

impl ReportConfig {
    fn with_search(start: Option<i64>, duration: Option<i64>, rate: i64) -> Result<Self> {
        let search_range = match (start, duration) {
            (Some(start), Some(duration)) => Some(TimeRange::new(
                RationalTime::try_new(start, rate).context("Invalid search start")?,
                RationalTime::try_new(duration, rate).context("Invalid search duration")?,
            )),
            _ => None,
        };
        Ok(Self {
            search_range,
            ..Default::default()
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { input } => show_info(&load_sequence(&input)?)?,

        Commands::Range { input, index } => show_range(&load_sequence(&input)?, index)?,

        Commands::Neighbors {
            input,
            index,
            insert_gap,
        } => {
            let config = ReportConfig {
                insert_gap: insert_gap.into(),
                ..Default::default()
            };
            show_neighbors(&load_sequence(&input)?, index, &config)?
        }

        Commands::Clips {
            input,
            start,
            duration,
            rate,
        } => {
            let config = ReportConfig::with_search(start, duration, rate)?;
            show_clips(&load_sequence(&input)?, &config)?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_sequence(path: &Path) -> Result<Sequence> {
    debug!(path = %path.display(), "loading sequence");
    let file = File::open(path).context("Failed to open sequence file")?;
    let sequence: Sequence =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse sequence JSON")?;
    Ok(sequence)
}

fn show_info(sequence: &Sequence) -> Result<()> {
    println!("\n=== Sequence Information ===");
    println!("Name: {}", sequence.name);
    println!("Kind: {:?}", sequence.kind);
    println!("Children: {}", sequence.len());

    let available = sequence
        .available_range()
        .context("Failed to compute available range")?;
    println!(
        "Available range: {} ({:.2} seconds)",
        available,
        available.duration.to_seconds()
    );
    match sequence.source_range {
        Some(source_range) => println!("Source range: {}", source_range),
        None => println!("Source range: none"),
    }

    println!("\n=== Children ===");
    let ranges = sequence
        .range_of_all_children()
        .context("Failed to compute child ranges")?;
    for (index, (child, range)) in sequence.iter().zip(ranges).enumerate() {
        let trimmed = sequence.trimmed_range_of_child_at_index(index)?;
        println!(
            "  [{}] {} at {} -> {}",
            index,
            child,
            range,
            format_trimmed(trimmed)
        );
    }

    Ok(())
}

fn show_range(sequence: &Sequence, index: usize) -> Result<()> {
    let child = sequence.child(index)?;
    let range = sequence
        .range_of_child_at_index(index)
        .with_context(|| format!("Failed to compute range of child {}", index))?;
    let trimmed = sequence.trimmed_range_of_child_at_index(index)?;

    println!("Child [{}]: {}", index, child);
    println!("Range: {}", range);
    println!("Trimmed: {}", format_trimmed(trimmed));

    Ok(())
}

fn show_neighbors(sequence: &Sequence, index: usize, config: &ReportConfig) -> Result<()> {
    let neighbors = sequence
        .neighbors_of_index(index, config.insert_gap)
        .with_context(|| format!("Failed to find neighbors of child {}", index))?;

    println!("Neighbors of [{}] ({:?}):", index, config.insert_gap);
    for neighbor in &neighbors {
        println!("  {}", format_neighbor(neighbor)?);
    }

    Ok(())
}

fn show_clips(sequence: &Sequence, config: &ReportConfig) -> Result<()> {
    let clips = sequence
        .each_clip(config.search_range)
        .context("Failed to list clips")?;

    if let Some(search_range) = config.search_range {
        println!("Clips visible in {}:", search_range);
    } else {
        println!("Clips:");
    }
    for (index, clip) in &clips {
        let trimmed = sequence.trimmed_range_of_child_at_index(*index)?;
        println!("  [{}] {} -> {}", index, clip, format_trimmed(trimmed));
    }
    println!("{} of {} children", clips.len(), sequence.len());

    Ok(())
}

fn format_trimmed(trimmed: Option<TimeRange>) -> String {
    match trimmed {
        Some(range) => range.to_string(),
        None => "cropped".to_string(),
    }
}

fn format_neighbor(neighbor: &Cow<'_, Item>) -> Result<String> {
    let duration = neighbor.duration()?;
    Ok(match neighbor {
        Cow::Borrowed(item) => format!("{} ({})", item, duration),
        Cow::Owned(item) => format!("{} ({}, synthesized)", item, duration),
    })
}
