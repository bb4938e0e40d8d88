//! Typed inventory records.
//!
//! Sets group items; names are matched canonically (see [`crate::text`]).
//! Set names are unique within an inventory and item names within a set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use zaiko_core::{DomainError, DomainResult, ItemId, SetId};

use crate::barcode::classify;
use crate::internal_code::is_internal_code;
use crate::text::{is_valid_str, names_match, normalize_name};
use crate::validate::{internal_code_field, is_valid_inventory, present};

/// Longest description accepted when creating or editing an item.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A trackable stock-keeping unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, alias = "zaikode", skip_serializing_if = "Option::is_none")]
    pub internal_code: Option<String>,
}

impl InventoryItem {
    /// Typed counterpart of [`crate::validate::is_valid_item`], naming the
    /// first rule that fails.
    pub fn validate(&self) -> DomainResult<()> {
        if !is_valid_str(&self.name) {
            return Err(DomainError::validation(format!("item name {:?} is not valid", self.name)));
        }
        if let Some(barcode) = self.barcode.as_deref() {
            if !classify(barcode).valid {
                return Err(DomainError::validation(format!(
                    "barcode {barcode:?} is not a valid EAN-13 or UPC-A code"
                )));
            }
        }
        if let Some(code) = self.internal_code.as_deref() {
            if !is_internal_code(code) {
                return Err(DomainError::validation(format!(
                    "internal code {code:?} is not valid"
                )));
            }
        }
        Ok(())
    }

    pub fn canonical_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// A named grouping of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySet {
    #[serde(default)]
    pub id: SetId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

impl InventorySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SetId::new(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn canonical_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn find_item(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn find_item_mut(&mut self, id: ItemId) -> Option<&mut InventoryItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn find_item_by_name(&self, name: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| names_match(&item.name, name))
    }

    /// Sum of item stock, clamped to the `i64` range.
    pub fn total_stock(&self) -> i64 {
        self.items.iter().fold(0i64, |total, item| total.saturating_add(item.stock))
    }
}

/// The full, ordered collection of sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    pub sets: Vec<InventorySet>,
}

impl Inventory {
    pub fn find_set(&self, name: &str) -> Option<&InventorySet> {
        self.sets.iter().find(|set| names_match(&set.name, name))
    }

    pub fn find_set_mut(&mut self, name: &str) -> Option<&mut InventorySet> {
        self.sets.iter_mut().find(|set| names_match(&set.name, name))
    }

    /// Every item, set by set.
    pub fn items(&self) -> impl Iterator<Item = &InventoryItem> {
        self.sets.iter().flat_map(|set| set.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.sets.iter().map(|set| set.items.len()).sum()
    }

    /// Sum of stock across all sets, clamped to the `i64` range.
    pub fn total_stock(&self) -> i64 {
        self.sets
            .iter()
            .fold(0i64, |total, set| total.saturating_add(set.total_stock()))
    }

    /// Build an inventory from a parsed import document.
    ///
    /// The document must pass [`is_valid_inventory`]. Either layout is
    /// accepted; missing or duplicate ids are replaced with fresh ones, and
    /// canonically duplicate names are rejected.
    pub fn from_document(doc: &Value) -> DomainResult<Self> {
        if !is_valid_inventory(doc) {
            return Err(DomainError::validation("document is not a valid inventory"));
        }

        let mut ids = IdAllocator::default();
        let sets = match doc {
            Value::Array(sets) => sets
                .iter()
                .filter_map(Value::as_object)
                .map(|set| {
                    let name = set.get("name").and_then(Value::as_str).unwrap_or_default();
                    set_from_record(name, set, &mut ids)
                })
                .collect::<DomainResult<Vec<_>>>()?,
            Value::Object(sets) => sets
                .iter()
                .filter_map(|(name, set)| set.as_object().map(|set| (name, set)))
                .map(|(name, set)| set_from_record(name, set, &mut ids))
                .collect::<DomainResult<Vec<_>>>()?,
            _ => Vec::new(),
        };

        let inventory = Self { sets };
        inventory.ensure_unique_names()?;
        Ok(inventory)
    }

    /// Export document (set-list layout).
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Array(Vec::new()))
    }

    /// Set names unique in the inventory, item names unique per set.
    ///
    /// A name without a canonical form could never be looked up again, so it
    /// is rejected here as well.
    pub fn ensure_unique_names(&self) -> DomainResult<()> {
        let mut set_names = HashSet::new();
        for set in &self.sets {
            let canonical = set.canonical_name();
            if canonical.is_empty() {
                return Err(DomainError::validation(format!("set name {:?} is not valid", set.name)));
            }
            if !set_names.insert(canonical) {
                return Err(DomainError::conflict(format!("duplicate set {:?}", set.name)));
            }
            let mut item_names = HashSet::new();
            for item in &set.items {
                let canonical = item.canonical_name();
                if canonical.is_empty() {
                    return Err(DomainError::validation(format!(
                        "item name {:?} is not valid",
                        item.name
                    )));
                }
                if !item_names.insert(canonical) {
                    return Err(DomainError::conflict(format!(
                        "duplicate item {:?} in set {:?}",
                        item.name, set.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct IdAllocator {
    sets: HashSet<SetId>,
    items: HashSet<ItemId>,
}

impl IdAllocator {
    fn set_id(&mut self, raw: Option<&Value>) -> SetId {
        let id = raw
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .filter(|id| !self.sets.contains(id))
            .unwrap_or_default();
        self.sets.insert(id);
        id
    }

    fn item_id(&mut self, raw: Option<&Value>) -> ItemId {
        let id = raw
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .filter(|id| !self.items.contains(id))
            .unwrap_or_default();
        self.items.insert(id);
        id
    }
}

fn set_from_record(
    name: &str,
    record: &Map<String, Value>,
    ids: &mut IdAllocator,
) -> DomainResult<InventorySet> {
    let items = record
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_object)
        .map(|item| item_from_record(item, ids))
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(InventorySet {
        id: ids.set_id(present(record, "id")),
        name: name.trim().to_string(),
        items,
    })
}

fn item_from_record(record: &Map<String, Value>, ids: &mut IdAllocator) -> DomainResult<InventoryItem> {
    let name = record.get("name").and_then(Value::as_str).unwrap_or_default();
    let stock = record
        .get("stock")
        .and_then(whole_number)
        .ok_or_else(|| DomainError::validation(format!("stock of {name:?} is not a whole number")))?;
    let text = |key: &str| present(record, key).and_then(Value::as_str).map(str::to_string);

    Ok(InventoryItem {
        id: ids.item_id(present(record, "id")),
        name: name.trim().to_string(),
        description: text("description"),
        stock,
        barcode: text("barcode"),
        internal_code: internal_code_field(record)
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn check_description(description: Option<&str>) -> DomainResult<()> {
    let Some(description) = description else {
        return Ok(());
    };
    if !is_valid_str(description) {
        return Err(DomainError::validation(format!(
            "description {description:?} is not valid"
        )));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation(format!(
            "description is longer than {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// User input for a new item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stock: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub internal_code: Option<String>,
}

impl NewItem {
    /// Validate creation rules and build the record with a fresh id.
    ///
    /// Blank optional fields are dropped; initial stock may not be negative.
    pub fn into_item(self) -> DomainResult<InventoryItem> {
        if self.stock < 0 {
            return Err(DomainError::validation(format!(
                "stock {} is lower than 0",
                self.stock
            )));
        }

        let description = optional_text(self.description);
        check_description(description.as_deref())?;

        let item = InventoryItem {
            id: ItemId::new(),
            name: self.name.trim().to_string(),
            description,
            stock: self.stock,
            barcode: optional_text(self.barcode),
            internal_code: optional_text(self.internal_code),
        };
        item.validate()?;
        Ok(item)
    }
}

/// Changes to an existing item's descriptive fields. Stock is changed through
/// [`crate::stock::StockAction`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEdit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub internal_code: Option<String>,
}

impl ItemEdit {
    /// Apply to `item`, leaving it untouched if the result would be invalid.
    pub fn apply_to(self, item: &mut InventoryItem) -> DomainResult<()> {
        let description = optional_text(self.description);
        check_description(description.as_deref())?;

        let edited = InventoryItem {
            id: item.id,
            name: self.name.trim().to_string(),
            description,
            stock: item.stock,
            barcode: optional_text(self.barcode),
            internal_code: optional_text(self.internal_code),
        };
        edited.validate()?;
        *item = edited;
        Ok(())
    }
}
