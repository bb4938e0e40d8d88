//! Stock changes and stock levels.

use serde::{Deserialize, Serialize};

use zaiko_core::{DomainError, DomainResult, ItemId};

use crate::model::Inventory;
use crate::settings::Settings;

/// How an amount changes an item's stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    /// Set stock to the amount.
    Overwrite,
    /// Add the amount.
    Increment,
    /// Subtract the amount.
    Decrement,
}

impl StockAction {
    /// New stock after applying `amount` to `current`.
    pub fn apply(self, current: i64, amount: i64) -> DomainResult<i64> {
        if amount < 0 {
            return Err(DomainError::validation(format!(
                "stock amount {amount} is lower than 0"
            )));
        }

        let new_stock = match self {
            StockAction::Overwrite => Some(amount),
            StockAction::Increment => current.checked_add(amount),
            StockAction::Decrement => current.checked_sub(amount),
        }
        .ok_or_else(|| DomainError::invariant("stock out of range"))?;

        if new_stock < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        Ok(new_stock)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Normal,
    Warning,
    Critical,
}

impl StockLevel {
    pub fn classify(stock: i64, settings: &Settings) -> Self {
        if stock <= settings.critical_threshold {
            StockLevel::Critical
        } else if stock <= settings.warn_threshold {
            StockLevel::Warning
        } else {
            StockLevel::Normal
        }
    }
}

/// An item running low on stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub set_name: String,
    pub item_id: ItemId,
    pub item_name: String,
    pub stock: i64,
    pub level: StockLevel,
}

/// Items at or below the warning threshold, in inventory order.
pub fn low_stock_alerts(inventory: &Inventory, settings: &Settings) -> Vec<StockAlert> {
    inventory
        .sets
        .iter()
        .flat_map(|set| set.items.iter().map(move |item| (set, item)))
        .filter_map(|(set, item)| match StockLevel::classify(item.stock, settings) {
            StockLevel::Normal => None,
            level => Some(StockAlert {
                set_name: set.name.clone(),
                item_id: item.id,
                item_name: item.name.clone(),
                stock: item.stock,
                level,
            }),
        })
        .collect()
}
