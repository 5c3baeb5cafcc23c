use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;

use crate::storage::models::{ItemMap, PreferenceItem};
use crate::storage::{Page, PreferenceStore};

/// DynamoDB-backed preference store.
pub struct DynamoStore {
    client: Client,
    table_name: String,
    category_attribute: String,
}

impl DynamoStore {
    pub async fn new(table_name: String, category_attribute: String) -> Result<Self> {
        let config = aws_config::load_from_env().await;
        let client = Client::new(&config);

        Ok(Self {
            client,
            table_name,
            category_attribute,
        })
    }
}

#[async_trait]
impl PreferenceStore for DynamoStore {
    async fn scan_page(&self, exclusive_start_key: Option<ItemMap>) -> Result<Page> {
        // The schema's Type attribute is not reliably queryable; presence of
        // the category attribute identifies a preference record.
        let response = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("attribute_exists(#cat)")
            .expression_attribute_names("#cat", &self.category_attribute)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await?;

        Ok(Page {
            items: response.items.unwrap_or_default(),
            last_key: response.last_evaluated_key,
        })
    }

    async fn query_page(
        &self,
        subject_id: &str,
        exclusive_start_key: Option<ItemMap>,
    ) -> Result<Page> {
        let response = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk")
            .filter_expression("attribute_exists(#cat)")
            .expression_attribute_names("#cat", &self.category_attribute)
            .expression_attribute_values(
                ":pk",
                AttributeValue::S(format!("SUBJECTID#{}", subject_id)),
            )
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await?;

        Ok(Page {
            items: response.items.unwrap_or_default(),
            last_key: response.last_evaluated_key,
        })
    }

    async fn batch_write(&self, items: &[PreferenceItem]) -> Result<()> {
        let mut requests = Vec::with_capacity(items.len());
        for item in items {
            let put = PutRequest::builder().set_item(Some(item.to_item())).build()?;
            requests.push(WriteRequest::builder().put_request(put).build());
        }

        let response = self
            .client
            .batch_write_item()
            .request_items(&self.table_name, requests)
            .send()
            .await?;

        // Unprocessed items count as a failed batch; the runner assumes none
        // of the batch's writes are confirmed.
        if let Some(unprocessed) = &response.unprocessed_items {
            let leftover: usize = unprocessed.values().map(Vec::len).sum();
            if leftover > 0 {
                return Err(anyhow!(
                    "batch write left {} of {} items unprocessed",
                    leftover,
                    items.len()
                ));
            }
        }

        Ok(())
    }
}
