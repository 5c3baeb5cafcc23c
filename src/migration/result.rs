use chrono::{DateTime, Utc};
use serde::Serialize;

/// Accumulated outcome of one migration run. Serialized field names match the
/// wire format consumers of the migration endpoint already expect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MigrationResult {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Run duration in milliseconds.
    #[serde(rename = "Duration")]
    pub duration_ms: i64,
    pub processed_count: u64,
    pub migrated_count: u64,
    pub error_count: u64,
    pub errors: Vec<String>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

impl MigrationResult {
    pub fn new(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            duration_ms: 0,
            processed_count: 0,
            migrated_count: 0,
            error_count: 0,
            errors: Vec::new(),
            dry_run,
            subject_id: None,
        }
    }

    pub fn for_user(subject_id: &str, dry_run: bool) -> Self {
        let mut result = Self::new(dry_run);
        result.subject_id = Some(subject_id.to_string());
        result
    }

    /// Result for a request rejected before any record was touched.
    pub fn rejected(dry_run: bool, message: impl Into<String>) -> Self {
        let mut result = Self::new(dry_run);
        result.error_count = 1;
        result.errors.push(message.into());
        result.finalize();
        result
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error_count += 1;
        self.errors.push(message.into());
    }

    /// Stamp the end time and compute the duration. Called exactly once, when
    /// the run completes or fails.
    pub fn finalize(&mut self) {
        self.end_time = Utc::now();
        self.duration_ms = (self.end_time - self.start_time).num_milliseconds();
    }
}
