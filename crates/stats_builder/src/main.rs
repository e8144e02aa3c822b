//! Stats Builder CLI
//!
//! Match table CSV → per-match feature table CSV
//! Single event blob → aggregate JSON

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use of_stats::{AggregationConfig, MatchTeams, StatKind};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "stats_builder")]
#[command(about = "Aggregate per-match event logs into feature tables", long_about = None)]
struct Cli {
    /// Aggregation config (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Coerce non-numeric fields instead of failing the match
    #[arg(long, global = true, default_value = "false")]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build a feature table from a match CSV
    Aggregate {
        /// Input match table (one XML column per stat)
        #[arg(long)]
        csv: PathBuf,

        /// Output feature table path
        #[arg(long)]
        out: PathBuf,

        /// Stat kinds to build (defaults to the configured list)
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Aggregate one event blob file and print the totals
    Inspect {
        /// Event blob file
        #[arg(long)]
        xml: PathBuf,

        /// Home team id
        #[arg(long)]
        home: i64,

        /// Away team id
        #[arg(long)]
        away: i64,

        /// Stat kind (card, possession, or any event column name)
        #[arg(long)]
        stat: String,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.lenient)?;

    match cli.command {
        Commands::Aggregate {
            csv,
            out,
            stats,
            metadata,
        } => {
            let kinds = stats_builder::resolve_kinds(&stats, &config);

            println!("🔨 Building feature table...");
            println!("   Input:  {}", csv.display());
            println!("   Output: {}", out.display());
            println!(
                "   Stats:  {}",
                kinds.iter().map(StatKind::name).collect::<Vec<_>>().join(", ")
            );
            println!("   Policy: {:?}", config.numeric_policy);

            let meta = stats_builder::build_feature_table(&csv, &out, &kinds, &config)?;
            print_metadata(&meta);

            if let Some(metadata_path) = metadata {
                stats_builder::save_metadata(&metadata_path, &meta)?;
                println!("   Metadata saved: {}", metadata_path.display());
            }
        }

        Commands::Inspect {
            xml,
            home,
            away,
            stat,
        } => {
            let kind = StatKind::parse(&stat);
            let teams = MatchTeams::new(home, away);
            let agg = stats_builder::inspect_blob(&xml, teams, &kind, &config)?;
            let json = serde_json::to_string_pretty(&agg).context("Failed to serialize totals")?;
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>, lenient: bool) -> Result<AggregationConfig> {
    let mut config = match path {
        Some(p) => AggregationConfig::load(p)
            .with_context(|| format!("Failed to load config: {}", p.display()))?,
        None => AggregationConfig::default(),
    };
    if lenient {
        config.numeric_policy = of_stats::NumericPolicy::Lenient;
    }
    Ok(config)
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &stats_builder::BuildMetadata) {
    println!("\n✅ Feature table built!");
    println!("   Matches:         {}", meta.matches);
    println!("   Failed matches:  {}", meta.failed_matches);
    println!("   Unattributed:    {}", meta.unattributed_events);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
