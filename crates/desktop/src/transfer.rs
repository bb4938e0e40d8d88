//! JSON import and export, and barcode label images.
//!
//! Import is two-step: [`read_import`] parses and validates a file without
//! touching the database, the caller asks the user to confirm, then
//! [`apply_import`] overwrites everything.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use zaiko_core::{DomainError, ItemId};
use zaiko_inventory::{
    BarcodeLabel, Inventory, LABEL_HEIGHT, LabelFormat, LabelSource, detect_layout, is_valid_inventory,
};

use crate::error::StoreError;
use crate::store::InventoryStore;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("file is not JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("failed to encode inventory: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("file is not a valid Zaiko inventory")]
    InvalidData,

    /// Valid structure, but the contents break a rule (e.g. duplicate set names).
    #[error("inventory cannot be imported: {0}")]
    Rejected(#[source] DomainError),

    #[error("cannot produce barcode label: {0}")]
    Label(#[source] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn io_error(path: &Path, source: std::io::Error) -> TransferError {
    TransferError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// A validated import waiting for the user's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub inventory: Inventory,
    pub set_count: usize,
    pub item_count: usize,
}

impl ImportPreview {
    /// Text for the overwrite confirmation prompt.
    pub fn confirmation_message(&self) -> String {
        format!(
            "Importing this file with {} sets (totalling {} items) will overwrite all of your existing data.",
            self.set_count, self.item_count
        )
    }
}

/// Write the whole inventory to `path` as a JSON array of sets.
pub async fn export_json(store: &InventoryStore, path: impl AsRef<Path>) -> Result<usize, TransferError> {
    let path = path.as_ref();
    let inventory = store.load_inventory().await?;
    let body = serde_json::to_vec_pretty(&inventory.to_document()).map_err(TransferError::Encode)?;

    tokio::fs::write(path, body)
        .await
        .map_err(|e| io_error(path, e))?;

    tracing::info!(
        path = %path.display(),
        sets = inventory.sets.len(),
        items = inventory.item_count(),
        "inventory exported"
    );
    Ok(inventory.item_count())
}

/// Write a PNG label for one of an item's codes to `path`.
pub async fn export_label(
    store: &InventoryStore,
    set_name: &str,
    item_id: ItemId,
    source: LabelSource,
    path: impl AsRef<Path>,
) -> Result<LabelFormat, TransferError> {
    let path = path.as_ref();
    let item = store.find_item(set_name, item_id).await?;
    let label = BarcodeLabel::for_item(&item, source).map_err(TransferError::Label)?;
    let png = label.to_png(LABEL_HEIGHT).map_err(TransferError::Label)?;

    tokio::fs::write(path, png)
        .await
        .map_err(|e| io_error(path, e))?;

    tracing::info!(
        path = %path.display(),
        %item_id,
        format = ?label.format(),
        code = label.text(),
        "barcode label exported"
    );
    Ok(label.format())
}

/// Parse and validate an export document.
pub fn parse_import(content: &str) -> Result<ImportPreview, TransferError> {
    let doc: Value = serde_json::from_str(content).map_err(TransferError::NotJson)?;
    tracing::debug!(layout = ?detect_layout(&doc), "parsed import document");

    if !is_valid_inventory(&doc) {
        return Err(TransferError::InvalidData);
    }

    let inventory = Inventory::from_document(&doc).map_err(TransferError::Rejected)?;
    Ok(ImportPreview {
        set_count: inventory.sets.len(),
        item_count: inventory.item_count(),
        inventory,
    })
}

/// Read `path` and validate it. Nothing is written.
pub async fn read_import(path: impl AsRef<Path>) -> Result<ImportPreview, TransferError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;

    let preview = parse_import(&content);
    match &preview {
        Ok(p) => tracing::info!(
            path = %path.display(),
            sets = p.set_count,
            items = p.item_count,
            "import file validated"
        ),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "import file rejected"),
    }
    preview
}

/// Overwrite all sets and items with a confirmed import.
pub async fn apply_import(store: &InventoryStore, preview: &ImportPreview) -> Result<(), TransferError> {
    store.replace_inventory(&preview.inventory).await?;
    Ok(())
}
