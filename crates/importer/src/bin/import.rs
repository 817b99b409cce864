use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use results_importer::{BatchImporter, BatchValidator};
use results_storage::dto::{ResultKey, ResultQuery, ResultView};
use results_storage::config::redact;
use results_storage::{Database, StoreConfig, Timeouts};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "results-import")]
#[command(about = "Race timing results ingestion and query tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct DatabaseArgs {
    /// mysql://, mariadb:// or sqlite: URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = StoreConfig::DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,

    /// Deadline for single-row reads and small writes
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = 5)]
    timeout_secs: u64,

    /// Deadline for batch ingestion and bulk deletion
    #[arg(long, env = "STORE_BATCH_TIMEOUT_SECS", default_value_t = 15)]
    batch_timeout_secs: u64,
}

impl DatabaseArgs {
    fn config(&self) -> StoreConfig {
        StoreConfig::new(&self.database_url)
            .with_max_connections(self.max_connections)
            .with_timeouts(Timeouts {
                operation: Duration::from_secs(self.timeout_secs),
                batch: Duration::from_secs(self.batch_timeout_secs),
            })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the person and result tables
    Migrate,
    /// Ingest a JSON batch file
    Ingest {
        file: PathBuf,

        #[arg(long)]
        event_year: Option<i64>,

        #[arg(long)]
        validate_only: bool,
    },
    /// Print a result view as JSON
    Results {
        #[arg(long)]
        event_year: i64,

        #[arg(long, default_value = "all")]
        view: ResultView,

        #[arg(long)]
        distance: Option<String>,

        #[arg(long)]
        bib: Option<String>,

        /// Rows per page; 0 returns everything
        #[arg(long, default_value_t = 0)]
        limit: i64,

        /// Zero-indexed page
        #[arg(long, default_value_t = 0)]
        page: i64,
    },
    /// Print every read for one bib
    Bib {
        #[arg(long)]
        event_year: i64,

        bib: String,
    },
    /// Print the participants of an event-year
    Participants {
        #[arg(long)]
        event_year: i64,
    },
    /// Delete individual reads
    DeleteResults {
        #[arg(long)]
        event_year: i64,

        /// bib:location:occurrence, repeatable
        #[arg(long = "key", required = true)]
        keys: Vec<ResultKey>,
    },
    /// Delete every read and participant of an event-year
    Purge {
        #[arg(long)]
        event_year: i64,
    },
    /// Delete participants by stable id, or all of them when none are given
    DeleteParticipants {
        #[arg(long)]
        event_year: i64,

        #[arg(long = "stable-id")]
        stable_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("results_import={},results_storage={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Ingest {
        ref file,
        validate_only: true,
        ..
    } = cli.command
    {
        return validate_file(file).await;
    }

    let config = cli.database.config();
    let db = match Database::new(&config).await {
        Ok(db) => db,
        Err(e) => {
            if e.is_connection_error() {
                tracing::error!(
                    "Database at {} is unreachable",
                    redact(&config.database_url)
                );
            }
            return Err(e).context("Failed to connect to the results database");
        }
    };

    match cli.command {
        Commands::Migrate => {
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("✓ Migrations applied");
        }
        Commands::Ingest {
            file, event_year, ..
        } => {
            let batch = BatchImporter::load(&file)
                .await
                .with_context(|| format!("Failed to load {}", file.display()))?;
            let stored = BatchImporter::new(&db)
                .import(&batch, event_year)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;
            tracing::info!("✓ Stored {} row(s)", stored.len());
        }
        Commands::Results {
            event_year,
            view,
            distance,
            bib,
            limit,
            page,
        } => {
            let query = ResultQuery {
                view,
                distance,
                bib,
                ..ResultQuery::default()
            }
            .paginate(limit, page);
            let page = db.get_results_page(event_year, &query).await?;
            print_json(&page)?;
        }
        Commands::Bib { event_year, bib } => {
            let rows = db.get_bib_results(event_year, &bib).await?;
            print_json(&rows)?;
        }
        Commands::Participants { event_year } => {
            let people = db.get_participants(event_year).await?;
            print_json(&people)?;
        }
        Commands::DeleteResults { event_year, keys } => {
            let deleted = db.delete_results(event_year, &keys).await?;
            tracing::info!("✓ Deleted {} result(s)", deleted);
        }
        Commands::Purge { event_year } => {
            let deleted = db.delete_event_results(event_year).await?;
            tracing::info!("✓ Purged {} result(s) from event year {}", deleted, event_year);
        }
        Commands::DeleteParticipants {
            event_year,
            stable_ids,
        } => {
            let deleted = db.delete_participants(event_year, &stable_ids).await?;
            tracing::info!("✓ Deleted {} participant(s)", deleted);
        }
    }

    Ok(())
}

async fn validate_file(file: &Path) -> anyhow::Result<()> {
    tracing::info!("Validating batch file: {}", file.display());

    let batch = BatchImporter::load(file)
        .await
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let report = BatchValidator::validate(&batch)?;
    report.log_warnings();

    tracing::info!(
        "✓ Validation successful: {} row(s), {} warning(s)",
        batch.rows.len(),
        report.warnings.len()
    );

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
