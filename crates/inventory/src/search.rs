//! Search sets and items by name.

use serde::Serialize;

use crate::model::{Inventory, InventoryItem, InventorySet};
use crate::text::{contains_normalized, is_valid_str};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchMatch<'a> {
    Item {
        set: &'a str,
        item: &'a InventoryItem,
    },
    Set {
        set: &'a InventorySet,
    },
}

/// Matches for `query`, set by set: matching items first, then the set itself.
///
/// Names match canonically; barcodes and descriptions match the raw trimmed query.
pub fn search<'a>(inventory: &'a Inventory, query: &str) -> Vec<SearchMatch<'a>> {
    if !is_valid_str(query) {
        return Vec::new();
    }
    let raw = query.trim();

    let mut matches = Vec::new();
    for set in &inventory.sets {
        matches.extend(
            set.items
                .iter()
                .filter(|item| {
                    contains_normalized(&item.name, query)
                        || item.barcode.as_deref().is_some_and(|b| b.contains(raw))
                        || item.description.as_deref().is_some_and(|d| d.contains(raw))
                })
                .map(|item| SearchMatch::Item {
                    set: &set.name,
                    item,
                }),
        );

        if contains_normalized(&set.name, query) {
            matches.push(SearchMatch::Set { set });
        }
    }
    matches
}
