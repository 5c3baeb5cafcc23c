use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

/// Raw DynamoDB item as the SDK hands it over.
pub type ItemMap = HashMap<String, AttributeValue>;

const ATTR_PK: &str = "PK";
const ATTR_SK: &str = "SK";
const ATTR_ENTITY_ID: &str = "EntityId";
const ATTR_TYPE: &str = "Type";
const ATTR_CATEGORY_ID: &str = "CategoryId";
const ATTR_SUBCATEGORY_IDS: &str = "SubcategoryIds";
const ATTR_IS_PRIMARY: &str = "IsPrimary";
const ATTR_CREATED_AT: &str = "CreatedAt";
const ATTR_UPDATED_AT: &str = "UpdatedAt";

const KNOWN_ATTRS: &[&str] = &[
    ATTR_PK,
    ATTR_SK,
    ATTR_ENTITY_ID,
    ATTR_TYPE,
    ATTR_CATEGORY_ID,
    ATTR_SUBCATEGORY_IDS,
    ATTR_IS_PRIMARY,
    ATTR_CREATED_AT,
    ATTR_UPDATED_AT,
];

/// Decode failure for a single record. Per-record failures are counted and
/// reported, never propagated past the record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing or invalid field: {0}")]
    MissingField(&'static str),
    #[error("invalid number in field {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// User job preference record. Only the category fields are rewritten by the
/// migration; every other attribute rides along untouched in `extra`.
#[derive(Debug, Clone)]
pub struct PreferenceItem {
    pub pk: String,
    pub sk: String,
    pub entity_id: String,
    pub item_type: String,
    pub category_id: Option<i32>,
    pub subcategory_ids: Vec<i32>,
    pub is_primary: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Attributes the migration does not model, preserved verbatim.
    pub extra: ItemMap,
}

impl PreferenceItem {
    pub fn from_item(item: &ItemMap) -> Result<Self, RecordError> {
        let extra = item
            .iter()
            .filter(|(key, _)| !KNOWN_ATTRS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            pk: get_string(item, ATTR_PK)?,
            sk: get_string(item, ATTR_SK)?,
            entity_id: get_string(item, ATTR_ENTITY_ID)?,
            item_type: get_optional_string(item, ATTR_TYPE).unwrap_or_default(),
            category_id: get_optional_i32(item, ATTR_CATEGORY_ID)?,
            subcategory_ids: get_i32_list(item, ATTR_SUBCATEGORY_IDS)?,
            is_primary: item
                .get(ATTR_IS_PRIMARY)
                .and_then(|v| v.as_bool().ok())
                .copied(),
            created_at: get_optional_string(item, ATTR_CREATED_AT),
            updated_at: get_optional_string(item, ATTR_UPDATED_AT),
            extra,
        })
    }

    pub fn to_item(&self) -> ItemMap {
        let mut item: ItemMap = self.extra.clone();
        item.insert(ATTR_PK.to_string(), AttributeValue::S(self.pk.clone()));
        item.insert(ATTR_SK.to_string(), AttributeValue::S(self.sk.clone()));
        item.insert(
            ATTR_ENTITY_ID.to_string(),
            AttributeValue::S(self.entity_id.clone()),
        );
        if !self.item_type.is_empty() {
            item.insert(
                ATTR_TYPE.to_string(),
                AttributeValue::S(self.item_type.clone()),
            );
        }
        if let Some(category_id) = self.category_id {
            item.insert(
                ATTR_CATEGORY_ID.to_string(),
                AttributeValue::N(category_id.to_string()),
            );
        }
        // DynamoDB rejects empty number sets, omit the attribute instead
        if !self.subcategory_ids.is_empty() {
            item.insert(
                ATTR_SUBCATEGORY_IDS.to_string(),
                AttributeValue::Ns(
                    self.subcategory_ids
                        .iter()
                        .map(|id| id.to_string())
                        .collect(),
                ),
            );
        }
        if let Some(is_primary) = self.is_primary {
            item.insert(
                ATTR_IS_PRIMARY.to_string(),
                AttributeValue::Bool(is_primary),
            );
        }
        if let Some(created_at) = &self.created_at {
            item.insert(
                ATTR_CREATED_AT.to_string(),
                AttributeValue::S(created_at.clone()),
            );
        }
        if let Some(updated_at) = &self.updated_at {
            item.insert(
                ATTR_UPDATED_AT.to_string(),
                AttributeValue::S(updated_at.clone()),
            );
        }
        item
    }

    /// Rewrite this record in place with its destination identifiers. Keys and
    /// entity id stay put, the update timestamp moves.
    pub fn with_categories(mut self, category_id: i32, subcategory_ids: Vec<i32>) -> Self {
        self.category_id = Some(category_id);
        self.subcategory_ids = subcategory_ids;
        self.updated_at = Some(Utc::now().to_rfc3339());
        self
    }

    /// Synthesize a split record for an additional destination bucket: same
    /// subject, fresh entity id, SK rewritten to embed the new id, marked
    /// non-primary when the original carried a primacy flag.
    pub fn clone_for_split(&self, category_id: i32, subcategory_ids: Vec<i32>) -> Self {
        let entity_id = Uuid::new_v4().to_string();
        let sk = if !self.entity_id.is_empty() && self.sk.contains(&self.entity_id) {
            self.sk.replace(&self.entity_id, &entity_id)
        } else {
            format!("{}#{}", self.item_type, entity_id)
        };
        let now = Utc::now().to_rfc3339();

        Self {
            pk: self.pk.clone(),
            sk,
            entity_id,
            item_type: self.item_type.clone(),
            category_id: Some(category_id),
            subcategory_ids,
            is_primary: self.is_primary.map(|_| false),
            created_at: Some(now.clone()),
            updated_at: Some(now),
            extra: self.extra.clone(),
        }
    }
}

/// Entity id straight off a raw item, for error messages about records that
/// failed to decode.
pub fn raw_entity_id(item: &ItemMap) -> String {
    get_optional_string(item, ATTR_ENTITY_ID).unwrap_or_else(|| "<unknown>".to_string())
}

fn get_string(item: &ItemMap, key: &'static str) -> Result<String, RecordError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or(RecordError::MissingField(key))
}

fn get_optional_string(item: &ItemMap, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn get_optional_i32(item: &ItemMap, key: &'static str) -> Result<Option<i32>, RecordError> {
    let Some(value) = item.get(key) else {
        return Ok(None);
    };
    let raw = value.as_n().map_err(|_| RecordError::MissingField(key))?;
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| RecordError::InvalidNumber {
            field: key,
            value: raw.clone(),
        })
}

/// Reads a number set, tolerating the list-of-numbers encoding some writers
/// used for the same attribute. Absent attribute means an empty list.
fn get_i32_list(item: &ItemMap, key: &'static str) -> Result<Vec<i32>, RecordError> {
    let Some(value) = item.get(key) else {
        return Ok(Vec::new());
    };

    let raw: Vec<&String> = if let Ok(set) = value.as_ns() {
        set.iter().collect()
    } else if let Ok(list) = value.as_l() {
        list.iter()
            .map(|v| v.as_n().map_err(|_| RecordError::MissingField(key)))
            .collect::<Result<_, _>>()?
    } else {
        return Err(RecordError::MissingField(key));
    };

    raw.into_iter()
        .map(|n| {
            n.parse::<i32>().map_err(|_| RecordError::InvalidNumber {
                field: key,
                value: n.clone(),
            })
        })
        .collect()
}
