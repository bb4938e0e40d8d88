//! Tauri commands for frontend integration.

use std::sync::Arc;

use tauri::State;

use zaiko_core::ItemId;
use zaiko_inventory::{
    BarcodeResult, Inventory, InventoryItem, InventorySet, ItemEdit, LabelFormat, LabelSource, NewItem,
    Settings, StockAction, StockAlert,
};

use crate::store::InventoryStore;
use crate::transfer::{self, ImportPreview};

/// Application state shared across Tauri commands.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InventoryStore>,
}

impl AppState {
    pub fn new(store: InventoryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

fn parse_item_id(item_id: &str) -> Result<ItemId, String> {
    item_id
        .parse::<ItemId>()
        .map_err(|e| format!("Invalid item_id: {}", e))
}

/// Live barcode feedback while the user types.
#[tauri::command]
pub fn classify_barcode(code: String) -> BarcodeResult {
    zaiko_inventory::classify(&code)
}

#[tauri::command]
pub fn normalize_name(name: String) -> String {
    zaiko_inventory::normalize_name(&name)
}

#[tauri::command]
pub async fn get_inventory(state: State<'_, AppState>) -> Result<Inventory, String> {
    state.store.load_inventory().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<Settings, String> {
    state.store.load_settings().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_settings(settings: Settings, state: State<'_, AppState>) -> Result<(), String> {
    state.store.save_settings(&settings).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn low_stock_alerts(state: State<'_, AppState>) -> Result<Vec<StockAlert>, String> {
    let inventory = state.store.load_inventory().await.map_err(|e| e.to_string())?;
    let settings = state.store.load_settings().await.map_err(|e| e.to_string())?;
    Ok(zaiko_inventory::low_stock_alerts(&inventory, &settings))
}

#[tauri::command]
pub async fn next_internal_code(state: State<'_, AppState>) -> Result<String, String> {
    let inventory = state.store.load_inventory().await.map_err(|e| e.to_string())?;
    Ok(zaiko_inventory::next_internal_code(&inventory))
}

#[tauri::command]
pub async fn create_set(name: String, state: State<'_, AppState>) -> Result<InventorySet, String> {
    state.store.create_set(&name).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn create_item(
    set_name: String,
    item: NewItem,
    state: State<'_, AppState>,
) -> Result<InventoryItem, String> {
    state
        .store
        .create_item(&set_name, item)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn edit_item(
    set_name: String,
    item_id: String,
    edit: ItemEdit,
    state: State<'_, AppState>,
) -> Result<InventoryItem, String> {
    let item_id = parse_item_id(&item_id)?;
    state
        .store
        .edit_item(&set_name, item_id, edit)
        .await
        .map_err(|e| e.to_string())
}

/// Overwrite, increment or decrement stock.
#[tauri::command]
pub async fn update_stock(
    set_name: String,
    item_id: String,
    action: StockAction,
    amount: i64,
    state: State<'_, AppState>,
) -> Result<i64, String> {
    let item_id = parse_item_id(&item_id)?;
    state
        .store
        .update_stock(&set_name, item_id, action, amount)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_item(
    set_name: String,
    item_id: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let item_id = parse_item_id(&item_id)?;
    state
        .store
        .delete_item(&set_name, item_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_set(set_name: String, state: State<'_, AppState>) -> Result<(), String> {
    state.store.delete_set(&set_name).await.map_err(|e| e.to_string())
}

/// Delete everything and restore default settings.
#[tauri::command]
pub async fn refresh(state: State<'_, AppState>) -> Result<(), String> {
    state.store.reset().await.map_err(|e| e.to_string())
}

/// Export to a path the frontend obtained from its save dialog.
#[tauri::command]
pub async fn export_json(path: String, state: State<'_, AppState>) -> Result<usize, String> {
    transfer::export_json(&state.store, path)
        .await
        .map_err(|e| e.to_string())
}

/// Save a barcode label image to a path from the frontend's save dialog.
#[tauri::command]
pub async fn export_label(
    set_name: String,
    item_id: String,
    source: LabelSource,
    path: String,
    state: State<'_, AppState>,
) -> Result<LabelFormat, String> {
    let item_id = parse_item_id(&item_id)?;
    transfer::export_label(&state.store, &set_name, item_id, source, path)
        .await
        .map_err(|e| e.to_string())
}

/// Validate an import file; the frontend shows the counts before confirming.
#[tauri::command]
pub async fn preview_import(path: String) -> Result<ImportPreview, String> {
    transfer::read_import(path).await.map_err(|e| e.to_string())
}

/// Re-read and apply an import after the user confirmed the overwrite.
#[tauri::command]
pub async fn confirm_import(path: String, state: State<'_, AppState>) -> Result<(), String> {
    let preview = transfer::read_import(path).await.map_err(|e| e.to_string())?;
    transfer::apply_import(&state.store, &preview)
        .await
        .map_err(|e| e.to_string())
}
