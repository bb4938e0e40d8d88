//! `zaiko-desktop`
//!
//! **Responsibility:** the desktop shell around the inventory core.
//!
//! This crate provides:
//! - An explicitly constructed SQLite storage service
//! - JSON import (validate, confirm, overwrite) and export
//! - PNG barcode labels for items
//! - Environment-based configuration
//! - Tauri commands (behind the `tauri` feature)

pub mod config;
pub mod error;
pub mod store;
pub mod transfer;

#[cfg(feature = "tauri")]
pub mod commands;

pub use config::DesktopConfig;
pub use error::{StoreError, StoreResult};
pub use store::InventoryStore;
pub use transfer::{ImportPreview, TransferError, apply_import, export_json, export_label, read_import};
