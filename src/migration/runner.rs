use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use crate::migration::engine::{needs_migration, remap};
use crate::migration::result::MigrationResult;
use crate::storage::{raw_entity_id, ItemMap, Page, PreferenceItem, PreferenceStore};
use crate::utils::Metrics;

/// What happened to a single record. Aggregation works off this enum instead
/// of catch-and-continue control flow.
#[derive(Debug)]
enum RecordOutcome {
    /// Not a migratable preference record at all; no counter moves.
    Skipped,
    /// Already on the new identifier scheme.
    UpToDate,
    /// Needs migration but no rule produced a valid destination.
    NoMapping,
    /// Rewritten original first, then any split records.
    Migrated(Vec<PreferenceItem>),
}

enum RecordSource<'a> {
    All,
    User(&'a str),
}

/// Walks the record set, applies the remap engine per record and flushes
/// rewrites in store-sized batches.
pub struct MigrationRunner {
    store: Arc<dyn PreferenceStore>,
    metrics: Arc<Metrics>,
    batch_size: usize,
    category_attribute: String,
}

impl MigrationRunner {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        metrics: Arc<Metrics>,
        batch_size: usize,
        category_attribute: String,
    ) -> Self {
        Self {
            store,
            metrics,
            batch_size,
            category_attribute,
        }
    }

    /// Migrate every preference record in the table.
    pub async fn migrate_all(&self, dry_run: bool, deadline: Option<Instant>) -> MigrationResult {
        tracing::info!(dry_run, "Starting bulk category migration for all job preferences");
        let started = Instant::now();

        let mut result = MigrationResult::new(dry_run);
        if let Err(e) = self.walk(RecordSource::All, &mut result, deadline).await {
            tracing::error!("Fatal error during migration: {e:#}");
            result.record_error(format!("Fatal error: {e}"));
        }
        result.finalize();

        self.metrics
            .run_duration
            .observe(started.elapsed().as_secs_f64());
        tracing::info!(
            migrated = result.migrated_count,
            processed = result.processed_count,
            errors = result.error_count,
            "Migration completed"
        );
        result
    }

    /// Migrate one subject's preference records.
    pub async fn migrate_user(
        &self,
        subject_id: &str,
        dry_run: bool,
        deadline: Option<Instant>,
    ) -> MigrationResult {
        tracing::info!(subject_id, dry_run, "Starting category migration for user");
        let started = Instant::now();

        let mut result = MigrationResult::for_user(subject_id, dry_run);
        if let Err(e) = self
            .walk(RecordSource::User(subject_id), &mut result, deadline)
            .await
        {
            tracing::error!(subject_id, "Fatal error migrating user: {e:#}");
            result.record_error(format!("Fatal error: {e}"));
        }
        result.finalize();

        self.metrics
            .run_duration
            .observe(started.elapsed().as_secs_f64());
        tracing::info!(
            subject_id,
            migrated = result.migrated_count,
            processed = result.processed_count,
            "User migration completed"
        );
        result
    }

    async fn walk(
        &self,
        source: RecordSource<'_>,
        result: &mut MigrationResult,
        deadline: Option<Instant>,
    ) -> Result<()> {
        let mut buffer: Vec<PreferenceItem> = Vec::with_capacity(self.batch_size);
        let mut cursor: Option<ItemMap> = None;
        let mut page_count = 0u32;

        loop {
            // Cooperative cancellation, checked once per page pass
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!(page_count, "Run deadline reached, stopping page walk early");
                break;
            }

            let page = self.next_page(&source, cursor).await?;
            page_count += 1;
            tracing::info!(
                page = page_count,
                records = page.items.len(),
                "Retrieved page"
            );

            for item in &page.items {
                match self.process_record(item) {
                    Ok(RecordOutcome::Skipped) => {}
                    Ok(RecordOutcome::UpToDate) => {
                        result.processed_count += 1;
                        self.metrics.records_processed.inc();
                    }
                    Ok(RecordOutcome::NoMapping) => {
                        result.processed_count += 1;
                        self.metrics.records_processed.inc();
                        tracing::warn!(
                            entity_id = %raw_entity_id(item),
                            "No valid migration found for preference"
                        );
                    }
                    Ok(RecordOutcome::Migrated(items)) => {
                        result.processed_count += 1;
                        result.migrated_count += 1;
                        self.metrics.records_processed.inc();
                        self.metrics.records_migrated.inc();
                        tracing::info!(
                            entity_id = %items[0].entity_id,
                            new_category_id = ?items[0].category_id,
                            splits = items.len() - 1,
                            "Migrated preference"
                        );
                        if !result.dry_run {
                            for rewritten in items {
                                self.queue(rewritten, &mut buffer, result).await;
                            }
                        }
                    }
                    Err(e) => {
                        result
                            .record_error(format!("Error processing preference {}: {e}", raw_entity_id(item)));
                        self.metrics.record_errors.inc();
                        tracing::error!(
                            entity_id = %raw_entity_id(item),
                            "Error processing preference: {e}"
                        );
                    }
                }
            }

            cursor = page.last_key;
            if cursor.is_none() {
                break;
            }
        }

        tracing::info!(
            page_count,
            processed = result.processed_count,
            migrated = result.migrated_count,
            "Page walk completed"
        );

        // Flush whatever is left, including after an early deadline exit
        self.flush(&mut buffer, result).await;
        Ok(())
    }

    async fn next_page(&self, source: &RecordSource<'_>, cursor: Option<ItemMap>) -> Result<Page> {
        match source {
            RecordSource::All => self.store.scan_page(cursor).await,
            RecordSource::User(subject_id) => self.store.query_page(subject_id, cursor).await,
        }
    }

    fn process_record(&self, item: &ItemMap) -> Result<RecordOutcome> {
        if !item.contains_key(&self.category_attribute) {
            return Ok(RecordOutcome::Skipped);
        }

        let preference = PreferenceItem::from_item(item)?;
        if !needs_migration(preference.category_id, &preference.subcategory_ids) {
            return Ok(RecordOutcome::UpToDate);
        }

        let buckets = remap(preference.category_id, &preference.subcategory_ids);

        // None-keyed buckets have no destination and are dropped here
        let mut destinations: Vec<(i32, Vec<i32>)> = buckets
            .into_iter()
            .filter_map(|(category_id, subcategory_ids)| {
                category_id.map(|id| (id, subcategory_ids))
            })
            .collect();

        if destinations.is_empty() {
            return Ok(RecordOutcome::NoMapping);
        }

        // First bucket rewrites the original in place, the rest become splits
        let (first_category, first_subcategories) = destinations.remove(0);
        let mut items = Vec::with_capacity(destinations.len() + 1);
        let original = preference.clone();
        items.push(preference.with_categories(first_category, first_subcategories));
        for (category_id, subcategory_ids) in destinations {
            items.push(original.clone_for_split(category_id, subcategory_ids));
        }

        Ok(RecordOutcome::Migrated(items))
    }

    /// Queue one rewrite; a full buffer is flushed before the write lands in a
    /// fresh one.
    async fn queue(
        &self,
        item: PreferenceItem,
        buffer: &mut Vec<PreferenceItem>,
        result: &mut MigrationResult,
    ) {
        if buffer.len() >= self.batch_size {
            self.flush(buffer, result).await;
        }
        buffer.push(item);
    }

    /// Submit the buffered writes. A failed flush counts every record in it as
    /// an error and the run keeps going.
    async fn flush(&self, buffer: &mut Vec<PreferenceItem>, result: &mut MigrationResult) {
        if buffer.is_empty() {
            return;
        }

        match self.store.batch_write(buffer).await {
            Ok(()) => {
                tracing::info!(count = buffer.len(), "Wrote batch");
                self.metrics.batch_writes.with_label_values(&["ok"]).inc();
            }
            Err(e) => {
                let count = buffer.len() as u64;
                result.error_count += count;
                result
                    .errors
                    .push(format!("Error writing batch of {} items: {e}", buffer.len()));
                self.metrics
                    .batch_writes
                    .with_label_values(&["error"])
                    .inc();
                tracing::error!(count, "Error writing batch: {e:#}");
            }
        }
        buffer.clear();
    }
}
