pub mod dynamodb;
pub mod models;

use anyhow::Result;
use async_trait::async_trait;

pub use dynamodb::DynamoStore;
pub use models::{raw_entity_id, ItemMap, PreferenceItem, RecordError};

/// One page of raw records. `last_key` is `None` when the source is exhausted;
/// otherwise it is the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<ItemMap>,
    pub last_key: Option<ItemMap>,
}

/// Paged access to the preference record set. The migration core only sees
/// this trait, never the concrete store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Full-table scan filtered to records carrying the category attribute.
    async fn scan_page(&self, exclusive_start_key: Option<ItemMap>) -> Result<Page>;

    /// Same filter, restricted to one subject's partition.
    async fn query_page(
        &self,
        subject_id: &str,
        exclusive_start_key: Option<ItemMap>,
    ) -> Result<Page>;

    /// Write a batch of records. Any reported failure means the caller must
    /// assume none of the batch's writes are confirmed.
    async fn batch_write(&self, items: &[PreferenceItem]) -> Result<()>;
}
