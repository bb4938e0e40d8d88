//! Application-specific item codes (`ZAIKO-ITEM-<n>`), printed as Code 128.

use crate::model::Inventory;
use crate::text::is_valid_str;

pub const INTERNAL_CODE_PREFIX: &str = "ZAIKO-ITEM";

/// Whether `code` is acceptable as an item's internal code.
pub fn is_internal_code(code: &str) -> bool {
    is_valid_str(code) && code.starts_with(INTERNAL_CODE_PREFIX)
}

/// The `<n>` of a `ZAIKO-ITEM-<n>` code.
pub fn internal_code_number(code: &str) -> Option<u64> {
    let n = code.strip_prefix(INTERNAL_CODE_PREFIX)?.strip_prefix('-')?;
    if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    n.parse().ok()
}

/// The code for the next item: one past the highest number in use.
pub fn next_internal_code(inventory: &Inventory) -> String {
    let next = inventory
        .items()
        .filter_map(|item| item.internal_code.as_deref())
        .filter_map(internal_code_number)
        .max()
        .map_or(0, |n| n.saturating_add(1));

    format!("{INTERNAL_CODE_PREFIX}-{next}")
}
