use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use hoopstats::config::Config;
use hoopstats::error::{PipelineError, Result};
use hoopstats::ingest::GamesApiClient;
use hoopstats::observability::{self, metrics};
use hoopstats::pipeline;
use hoopstats::sink::ArtifactWriter;
use hoopstats::storage::{JsonlRowStore, RowStore};

#[derive(Parser)]
#[command(name = "hoopstats")]
#[command(about = "NBA game statistics pipeline: ingest, validate, aggregate")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw game batches from the stats API, one file per season
    Ingest {
        /// Seasons to fetch (comma-separated years); defaults to the config
        #[arg(long)]
        seasons: Option<String>,
    },
    /// Validate raw batches, write quality reports, append clean rows
    Validate {
        /// Seasons to process (comma-separated years); defaults to the config
        #[arg(long)]
        seasons: Option<String>,
    },
    /// Aggregate all stored rows into the indicator document
    Indicators,
    /// Run ingest, validate, and indicators in sequence
    Run {
        /// Seasons to process (comma-separated years); defaults to the config
        #[arg(long)]
        seasons: Option<String>,
    },
}

fn parse_seasons(arg: Option<String>, config: &Config) -> Vec<i32> {
    match arg {
        Some(list) => list
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect(),
        None => config.ingest.seasons.clone(),
    }
}

async fn run_ingest(config: &Config, seasons: &[i32]) -> Result<()> {
    let api_key = Config::api_key()?;
    let client = GamesApiClient::new(config.api.clone(), api_key);
    let writer = ArtifactWriter::new(&config.ingest.data_dir);

    for &season in seasons {
        let span = tracing::info_span!("ingest_season", season);
        let _enter = span.enter();

        let games = match client.fetch_season(season).await {
            Ok(games) => games,
            Err(PipelineError::RateLimited { retry_after_secs }) => {
                // One pause per season on backpressure; a second hit propagates.
                warn!(retry_after_secs, "rate limited; pausing once");
                tokio::time::sleep(std::time::Duration::from_secs(retry_after_secs)).await;
                client.fetch_season(season).await?
            }
            Err(e) => return Err(e),
        };

        writer.write_raw_batch(season, &games)?;
        println!("📥 Season {}: fetched {} raw records", season, games.len());
    }
    Ok(())
}

async fn run_validate(config: &Config, seasons: &[i32], store: &dyn RowStore) -> Result<()> {
    let writer = ArtifactWriter::new(&config.ingest.data_dir);

    for &season in seasons {
        let span = tracing::info_span!("validate_season", season);
        let _enter = span.enter();

        let records = match writer.read_raw_batch(season) {
            Ok(records) => records,
            Err(PipelineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(season, "no raw batch on disk; skipping");
                println!("⚠️  Season {}: no raw batch found, skipping", season);
                continue;
            }
            Err(e) => return Err(e),
        };

        let result = pipeline::process_batch(season, &records);
        writer.write_quality_report(season, &result.report)?;
        writer.write_error_records(season, &result.errors)?;

        store.append_rows(season, &result.rows).await?;

        println!(
            "🧮 Season {}: {} records, {} valid, {} rejected",
            season,
            result.report.total,
            result.report.valid_count,
            result.report.error_count()
        );
    }
    Ok(())
}

async fn run_indicators(config: &Config, store: &dyn RowStore) -> Result<()> {
    let writer = ArtifactWriter::new(&config.ingest.data_dir);

    let start = std::time::Instant::now();
    let rows = store.read_all().await?;
    let indicators = pipeline::aggregate(&rows);
    metrics::aggregator::record_run(
        rows.len(),
        indicators.win_rankings.len(),
        start.elapsed().as_secs_f64(),
    );
    writer.write_indicators(&indicators)?;

    println!(
        "📊 Indicators over {} rows ({} teams ranked)",
        rows.len(),
        indicators.win_rankings.len()
    );
    if let Some(top) = indicators.best_offenses.first() {
        println!("   Best offense: {} ({:.1} pts/game)", top.team_name, top.value);
    }
    if let Some(top) = indicators.best_defenses.first() {
        println!(
            "   Best defense: {} ({:.1} pts allowed/game)",
            top.team_name, top.value
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    hoopstats::logging::init_logging();
    observability::try_install_exporter();

    let cli = Cli::parse();
    let config = Config::load()?;
    let store = JsonlRowStore::new(
        ArtifactWriter::new(&config.ingest.data_dir).clean_dir(),
    );

    let outcome = match cli.command {
        Commands::Ingest { seasons } => {
            let seasons = parse_seasons(seasons, &config);
            println!("🔄 Ingesting seasons {:?}...", seasons);
            run_ingest(&config, &seasons).await
        }
        Commands::Validate { seasons } => {
            let seasons = parse_seasons(seasons, &config);
            println!("🔍 Validating seasons {:?}...", seasons);
            run_validate(&config, &seasons, &store).await
        }
        Commands::Indicators => {
            println!("📈 Computing indicators...");
            run_indicators(&config, &store).await
        }
        Commands::Run { seasons } => {
            let seasons = parse_seasons(seasons, &config);
            println!("🔄 Running full pipeline for seasons {:?}...", seasons);
            match run_ingest(&config, &seasons).await {
                Ok(()) => {
                    run_validate(&config, &seasons, &store).await?;
                    run_indicators(&config, &store).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = &outcome {
        error!("Pipeline failed: {}", e);
    } else {
        info!("Done");
    }
    outcome.map_err(Into::into)
}
