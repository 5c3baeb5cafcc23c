use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::migration::{MigrationResult, MigrationRunner};

pub struct MigrationState {
    pub runner: MigrationRunner,
    pub run_deadline_secs: u64,
}

/// Request body for a migration run.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRequest {
    /// "all" or "user". Optional so a body with a missing or null type still
    /// reaches the handler and comes back as a rejected result.
    #[serde(rename = "type", default)]
    pub migration_type: Option<String>,
    /// Required when `type` is "user"
    pub subject_id: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

/// POST /api/migration/run - Run a category migration
///
/// Always answers 200 with a MigrationResult; validation failures and run
/// failures are surfaced through its error count and message list.
pub async fn run_migration(
    State(state): State<Arc<MigrationState>>,
    Json(request): Json<MigrationRequest>,
) -> Json<MigrationResult> {
    let migration_type = request.migration_type.as_deref().unwrap_or("");
    tracing::info!(
        migration_type,
        dry_run = request.dry_run,
        "Migration request received"
    );

    let deadline = Some(Instant::now() + Duration::from_secs(state.run_deadline_secs));

    let result = match migration_type.to_lowercase().as_str() {
        "all" => state.runner.migrate_all(request.dry_run, deadline).await,
        "user" => match request.subject_id.as_deref() {
            Some(subject_id) => {
                state
                    .runner
                    .migrate_user(subject_id, request.dry_run, deadline)
                    .await
            }
            None => MigrationResult::rejected(
                request.dry_run,
                "SubjectId is required for user migration",
            ),
        },
        other => MigrationResult::rejected(
            request.dry_run,
            format!("Unknown migration type: {}", other),
        ),
    };

    Json(result)
}

/// Router for Migration Endpoints
pub fn migration_router(state: Arc<MigrationState>) -> Router {
    Router::new()
        .route("/run", post(run_migration))
        .with_state(state)
}
