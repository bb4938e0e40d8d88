//! Tauri application entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(feature = "tauri")]
use zaiko_desktop::commands::*;

#[cfg(feature = "tauri")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    zaiko_observability::init();

    let config = zaiko_desktop::DesktopConfig::from_env()?;
    tracing::info!(db_path = %config.db_path.display(), "starting Zaiko");

    let store = zaiko_desktop::InventoryStore::open_with(&config).await?;

    tauri::Builder::default()
        .manage(AppState::new(store))
        .invoke_handler(tauri::generate_handler![
            classify_barcode,
            normalize_name,
            get_inventory,
            get_settings,
            save_settings,
            low_stock_alerts,
            next_internal_code,
            create_set,
            create_item,
            edit_item,
            update_stock,
            delete_item,
            delete_set,
            refresh,
            export_json,
            export_label,
            preview_import,
            confirm_import,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}

#[cfg(not(feature = "tauri"))]
fn main() {
    eprintln!("This binary requires the 'tauri' feature to be enabled.");
    eprintln!("Build with: cargo build --features tauri");
    std::process::exit(1);
}
