//! Inventory domain module.
//!
//! Pure validation and normalization for Zaiko inventories: barcode check
//! digits, canonical names, structural checks on imported documents, the
//! typed set/item model built on them, and label encoding. No IO, no storage,
//! no logging.

pub mod barcode;
pub mod internal_code;
pub mod label;
pub mod model;
pub mod search;
pub mod settings;
pub mod stock;
pub mod text;
pub mod validate;

pub use barcode::{Barcode, BarcodeResult, Symbology, check_digit, classify};
pub use internal_code::{INTERNAL_CODE_PREFIX, internal_code_number, is_internal_code, next_internal_code};
pub use label::{BarcodeLabel, LABEL_HEIGHT, LabelFormat, LabelSource};
pub use model::{Inventory, InventoryItem, InventorySet, ItemEdit, MAX_DESCRIPTION_LEN, NewItem};
pub use search::{SearchMatch, search};
pub use settings::{DEFAULT_APP_NAME, Settings, Theme};
pub use stock::{StockAction, StockAlert, StockLevel, low_stock_alerts};
pub use text::{contains_normalized, is_valid_str, is_valid_text, names_match, normalize_name};
pub use validate::{InventoryLayout, detect_layout, is_valid_inventory, is_valid_item, is_valid_set};
