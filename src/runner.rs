//! One cleanup run: configuration, storage client, both sweeps, heartbeat.
//!
//! Steps run strictly in order and the first error ends the run. The store
//! is built only after configuration has been validated, so a missing
//! credential never reaches the network.

use crate::{
    config::{AppConfig, Args},
    errors::AppError,
    models::report::RunSummary,
    services::{
        heartbeat::send_heartbeat,
        storage_service::{ObjectStore, StorageResult},
        sweep_service::SweepService,
    },
};
use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Validate configuration from `args` + `lookup`, build the store with
/// `connect`, then run both sweeps against it.
pub async fn run<S, L, C>(
    args: Args,
    lookup: L,
    connect: C,
    now: DateTime<Utc>,
) -> Result<RunSummary, AppError>
where
    S: ObjectStore,
    L: Fn(&str) -> Option<String>,
    C: FnOnce(&AppConfig) -> StorageResult<S>,
{
    let config = AppConfig::from_args_with(args, lookup)?;
    info!("Starting cleanup with config: {:?}", config);

    let store = connect(&config)?;
    execute(&config, &store, now).await
}

/// Run both sweeps and the heartbeat against an already built store.
pub async fn execute<S: ObjectStore + ?Sized>(
    config: &AppConfig,
    store: &S,
    now: DateTime<Utc>,
) -> Result<RunSummary, AppError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("cleanup", %run_id, bucket = %config.bucket);

    async move {
        let sweeps = SweepService::new(store, &config.bucket, config.dry_run);

        let duplicates = sweeps.remove_first_duplicate().await?;
        let expired = sweeps.remove_expired(now).await?;

        let mut heartbeat_sent = false;
        if let Some(url) = config.heartbeat_url.as_deref() {
            if config.dry_run {
                info!("dry run, heartbeat not sent");
            } else {
                send_heartbeat(&reqwest::Client::new(), url).await?;
                heartbeat_sent = true;
            }
        }

        let summary = RunSummary {
            run_id,
            bucket: config.bucket.clone(),
            duplicates,
            expired,
            heartbeat_sent,
        };
        info!(
            deleted = summary.total_deleted(),
            duplicates = summary.duplicates.deleted.len(),
            expired = summary.expired.deleted.len(),
            age_sweep_skipped = summary.expired.skipped,
            "cleanup finished"
        );
        Ok(summary)
    }
    .instrument(span)
    .await
}
