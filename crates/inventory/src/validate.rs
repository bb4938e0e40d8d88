//! Structural validation of loosely-typed (parsed JSON) records.
//!
//! These checks guard persisted and imported data. They are total: any
//! malformed or partially present field yields `false`, never a panic.

use serde_json::{Map, Value};

use crate::barcode::classify;
use crate::internal_code::is_internal_code;
use crate::text::is_valid_text;

/// How a document arranges its sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InventoryLayout {
    /// `[{ "name": ..., "items": [...] }, ...]`
    SetList,
    /// `{ "<set name>": { "id": ..., "items": [...] }, ... }`
    NamedSets,
}

/// Which layout `doc` uses, judged by its outer shape only.
pub fn detect_layout(doc: &Value) -> Option<InventoryLayout> {
    match doc {
        Value::Array(_) => Some(InventoryLayout::SetList),
        Value::Object(_) => Some(InventoryLayout::NamedSets),
        _ => None,
    }
}

/// An optional field counts as present unless it is missing, `null` or `""`.
pub(crate) fn present<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match record.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    }
}

/// The internal code under its current key, or the legacy `zaikode` key.
pub(crate) fn internal_code_field(record: &Map<String, Value>) -> Option<&Value> {
    present(record, "internalCode").or_else(|| present(record, "zaikode"))
}

/// Whether `candidate` is a well-formed item record.
///
/// Negative stock is accepted here; stock edits check the sign separately.
pub fn is_valid_item(candidate: &Value) -> bool {
    let Some(item) = candidate.as_object() else {
        return false;
    };

    if !item.get("name").is_some_and(is_valid_text) {
        return false;
    }

    // serde_json never produces NaN, so "is a number" is the whole check.
    if !item.get("stock").is_some_and(Value::is_number) {
        return false;
    }

    if present(item, "description").is_some_and(|d| !d.is_string()) {
        return false;
    }

    if let Some(barcode) = present(item, "barcode") {
        if !barcode.as_str().is_some_and(|code| classify(code).valid) {
            return false;
        }
    }

    if let Some(code) = internal_code_field(item) {
        if !code.as_str().is_some_and(is_internal_code) {
            return false;
        }
    }

    true
}

fn items_are_valid(record: &Map<String, Value>) -> bool {
    record
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(is_valid_item))
}

fn id_is_well_typed(record: &Map<String, Value>) -> bool {
    present(record, "id").is_none_or(Value::is_string)
}

/// Whether `candidate` is a well-formed set record (set-list layout).
pub fn is_valid_set(candidate: &Value) -> bool {
    let Some(set) = candidate.as_object() else {
        return false;
    };

    set.get("name").is_some_and(is_valid_text) && id_is_well_typed(set) && items_are_valid(set)
}

/// Whether `candidate` is a well-formed set body in the named-sets layout,
/// where the name lives in the enclosing key.
fn is_valid_named_set(name: &str, candidate: &Value) -> bool {
    let Some(set) = candidate.as_object() else {
        return false;
    };

    crate::text::is_valid_str(name) && id_is_well_typed(set) && items_are_valid(set)
}

/// Whether a whole parsed document is an importable inventory.
pub fn is_valid_inventory(candidate: &Value) -> bool {
    match candidate {
        Value::Array(sets) => sets.iter().all(is_valid_set),
        Value::Object(sets) => sets
            .iter()
            .all(|(name, set)| is_valid_named_set(name, set)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_item_is_valid() {
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5})));
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 0})));
    }

    #[test]
    fn negative_stock_is_accepted_structurally() {
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": -1})));
    }

    #[test]
    fn blank_name_or_missing_stock_is_invalid() {
        assert!(!is_valid_item(&json!({"name": "", "stock": 5})));
        assert!(!is_valid_item(&json!({"name": "   ", "stock": 5})));
        assert!(!is_valid_item(&json!({"stock": 5})));
        assert!(!is_valid_item(&json!({"name": "Bolt"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": null})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": "5"})));
    }

    #[test]
    fn non_number_stock_is_invalid() {
        // JSON has no NaN; a parsed "NaN" arrives as a string or null.
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": "NaN"})));
        assert!(serde_json::from_str::<Value>(r#"{"name":"Bolt","stock":NaN}"#).is_err());
    }

    #[test]
    fn non_records_are_invalid() {
        for value in [json!(null), json!("Bolt"), json!(5), json!([{"name": "Bolt", "stock": 5}])] {
            assert!(!is_valid_item(&value), "{value}");
        }
    }

    #[test]
    fn barcode_must_pass_checksum() {
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5, "barcode": "4006381333931"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": 5, "barcode": "4006381333930"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": 5, "barcode": 4006381333931u64})));
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5, "barcode": null})));
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5, "barcode": ""})));
    }

    #[test]
    fn description_must_be_a_string() {
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5, "description": "M8 x 40"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": 5, "description": 8})));
    }

    #[test]
    fn internal_code_needs_prefix() {
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5, "internalCode": "ZAIKO-ITEM-3"})));
        assert!(is_valid_item(&json!({"name": "Bolt", "stock": 5, "zaikode": "ZAIKO-ITEM-3"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": 5, "internalCode": "ITEM-3"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": 5, "zaikode": "zaiko-item-3"})));
        assert!(!is_valid_item(&json!({"name": "Bolt", "stock": 5, "internalCode": 3})));
    }

    #[test]
    fn set_needs_name_and_valid_items() {
        assert!(is_valid_set(&json!({"name": "Hardware", "items": []})));
        assert!(is_valid_set(&json!({
            "id": "0190c3a8-0000-7000-8000-000000000000",
            "name": "Hardware",
            "items": [{"name": "Bolt", "stock": 5}],
        })));
        assert!(!is_valid_set(&json!({"name": "Hardware"})));
        assert!(!is_valid_set(&json!({"name": "Hardware", "items": {}})));
        assert!(!is_valid_set(&json!({"name": " ", "items": []})));
        assert!(!is_valid_set(&json!({"name": "Hardware", "id": 7, "items": []})));
        assert!(!is_valid_set(&json!({"name": "Hardware", "items": [{"name": "Bolt"}]})));
    }

    fn two_good_sets() -> Value {
        json!([
            {
                "name": "Hardware",
                "items": [
                    {"name": "Bolt", "stock": 5, "barcode": "4006381333931"},
                    {"name": "Nut", "stock": 12},
                ],
            },
            {
                "name": "Groceries",
                "items": [
                    {"name": "Cola", "stock": 3, "barcode": "036000291452", "description": "can"},
                    {"name": "Rice", "stock": 1, "internalCode": "ZAIKO-ITEM-0"},
                ],
            },
        ])
    }

    #[test]
    fn inventory_of_good_sets_is_valid() {
        assert!(is_valid_inventory(&two_good_sets()));
        assert!(is_valid_inventory(&json!([])));
    }

    #[test]
    fn one_bad_item_spoils_the_inventory() {
        let mut doc = two_good_sets();
        doc[1]["items"][0]["barcode"] = json!("036000291453");
        assert!(!is_valid_inventory(&doc));

        let mut doc = two_good_sets();
        doc[0]["items"][1]["name"] = json!(null);
        assert!(!is_valid_inventory(&doc));
    }

    #[test]
    fn named_sets_layout_is_accepted() {
        let doc = json!({
            "hardware": {"id": "a", "items": [{"name": "Bolt", "stock": 5}]},
            "groceries": {"items": []},
        });
        assert_eq!(detect_layout(&doc), Some(InventoryLayout::NamedSets));
        assert!(is_valid_inventory(&doc));

        let bad_key = json!({" ": {"items": []}});
        assert!(!is_valid_inventory(&bad_key));

        let bad_item = json!({"hardware": {"items": [{"name": "Bolt", "stock": "many"}]}});
        assert!(!is_valid_inventory(&bad_item));
    }

    #[test]
    fn scalars_are_not_inventories() {
        for value in [json!(null), json!("[]"), json!(1), json!(true)] {
            assert_eq!(detect_layout(&value), None);
            assert!(!is_valid_inventory(&value));
        }
    }
}
