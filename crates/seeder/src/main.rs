//! Seeder binary: synthesizes the historical workload ledger and streams
//! it into Postgres in fixed-size batches.
//!
//! Owner and zone ids stand in for the identity collaborator and are
//! read from the environment. A fixed `SEED_RNG_SEED` makes the whole
//! run reproducible.

use anyhow::Context;
use chrono::Utc;
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridpulse_core::corpus::{build_corpus, CorpusConfig};
use gridpulse_db::repositories::WorkloadRecordRepo;
use gridpulse_db::seed::seed_corpus;

/// Seeder configuration loaded from environment variables.
///
/// | Env Var          | Default                            |
/// |------------------|------------------------------------|
/// | `SEED_DAY_COUNT` | `30`                               |
/// | `SEED_OWNER_IDS` | `user-ada,user-grace,user-linus`   |
/// | `SEED_ZONE_IDS`  | `us-east-1,eu-west-2,ap-south-1`   |
/// | `SEED_RNG_SEED`  | random                             |
/// | `SEED_RESET`     | `true` (clear the ledger first)    |
#[derive(Debug, Clone)]
struct SeederConfig {
    day_count: u32,
    owner_ids: Vec<String>,
    zone_ids: Vec<String>,
    seed: u64,
    reset: bool,
}

impl SeederConfig {
    fn from_env() -> anyhow::Result<Self> {
        let day_count: u32 = std::env::var("SEED_DAY_COUNT")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .context("SEED_DAY_COUNT must be a valid u32")?;

        let owner_ids = parse_id_list(
            &std::env::var("SEED_OWNER_IDS")
                .unwrap_or_else(|_| "user-ada,user-grace,user-linus".into()),
        );
        let zone_ids = parse_id_list(
            &std::env::var("SEED_ZONE_IDS")
                .unwrap_or_else(|_| "us-east-1,eu-west-2,ap-south-1".into()),
        );

        let seed = match std::env::var("SEED_RNG_SEED") {
            Ok(raw) => raw.parse().context("SEED_RNG_SEED must be a valid u64")?,
            Err(_) => rand::rng().random(),
        };

        let reset = std::env::var("SEED_RESET")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .context("SEED_RESET must be true or false")?;

        Ok(Self {
            day_count,
            owner_ids,
            zone_ids,
            seed,
            reset,
        })
    }
}

fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridpulse_seeder=info,gridpulse_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SeederConfig::from_env()?;
    tracing::info!(
        days = config.day_count,
        owners = config.owner_ids.len(),
        zones = config.zone_ids.len(),
        seed = config.seed,
        "Loaded seeder configuration"
    );

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = gridpulse_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    gridpulse_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Generate before deleting anything: a precondition failure must
    // leave the existing ledger untouched.
    let corpus_config = CorpusConfig {
        day_count: config.day_count,
        owner_ids: config.owner_ids,
        zone_ids: config.zone_ids,
    };
    let records = build_corpus(&corpus_config, Utc::now(), config.seed)
        .context("Corpus generation failed")?;
    tracing::info!(records = records.len(), "Corpus generated");

    if config.reset {
        let deleted = WorkloadRecordRepo::delete_all(&pool)
            .await
            .context("Failed to clear the existing ledger")?;
        tracing::info!(deleted, "Cleared existing ledger");
    }

    let report = seed_corpus(&pool, &records).await;
    tracing::info!(
        inserted = report.inserted,
        total = report.total,
        failed_batches = report.failed_batches,
        "Seeding finished"
    );
    if report.failed_batches > 0 {
        tracing::warn!(
            failed_batches = report.failed_batches,
            "Some batches failed, the ledger is partially seeded"
        );
    }

    Ok(())
}
