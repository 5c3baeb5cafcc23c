use indexmap::IndexMap;

use crate::migration::mappings::mapping_rules;

/// Category ids in the current taxonomy live in this closed range.
pub const NEW_CATEGORY_MIN: i32 = 1;
pub const NEW_CATEGORY_MAX: i32 = 19;

/// Legacy subcategory ids are numerically larger than anything in the new scheme.
pub const LEGACY_SUBCATEGORY_MIN: i32 = 200;

/// Decide whether a preference record still carries legacy identifiers.
pub fn needs_migration(category_id: Option<i32>, subcategory_ids: &[i32]) -> bool {
    let Some(category_id) = category_id else {
        // Nothing to migrate
        return false;
    };

    if !(NEW_CATEGORY_MIN..=NEW_CATEGORY_MAX).contains(&category_id) {
        return true;
    }

    subcategory_ids
        .iter()
        .any(|&id| id >= LEGACY_SUBCATEGORY_MIN)
}

/// Remap legacy identifiers into destination buckets: new category id to a
/// deduplicated, ascending list of new subcategory ids.
///
/// Insertion order is preserved; the first bucket is the one that rewrites the
/// original record when the result fans out. A `None` key means the legacy
/// combination has no destination and must not be written anywhere.
pub fn remap(
    category_id: Option<i32>,
    subcategory_ids: &[i32],
) -> IndexMap<Option<i32>, Vec<i32>> {
    let mut buckets: IndexMap<Option<i32>, Vec<i32>> = IndexMap::new();
    let Some(category_id) = category_id else {
        return buckets;
    };

    let rules = mapping_rules();

    for &subcategory_id in subcategory_ids {
        let Some(rule) = rules.get(&(category_id, Some(subcategory_id))) else {
            // Unknown combination, leave it behind
            continue;
        };
        let Some(new_category_id) = rule.new_category_id else {
            // Rule exists but the subcategory has no destination
            continue;
        };
        let bucket = buckets.entry(Some(new_category_id)).or_default();
        if let Some(new_subcategory_id) = rule.new_subcategory_id {
            bucket.push(new_subcategory_id);
        }
    }

    // No subcategory matched (or there were none): fall back to the
    // category-only rule.
    if buckets.is_empty() {
        if let Some(rule) = rules.get(&(category_id, None)) {
            buckets.insert(rule.new_category_id, Vec::new());
        }
    }

    for bucket in buckets.values_mut() {
        bucket.sort_unstable();
        bucket.dedup();
    }

    buckets
}
