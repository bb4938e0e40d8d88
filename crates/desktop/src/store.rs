//! SQLite-backed inventory storage.
//!
//! `InventoryStore` is constructed explicitly and handed to whoever needs it;
//! there is no process-wide database handle. Every mutation validates through
//! `zaiko-inventory` before touching the database.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use zaiko_core::{DomainError, ItemId, SetId};
use zaiko_inventory::{
    Inventory, InventoryItem, InventorySet, ItemEdit, NewItem, Settings, StockAction,
    normalize_name,
};

use crate::config::DesktopConfig;
use crate::error::{StoreError, StoreResult};

/// How often [`InventoryStore::update_stock`] recomputes after losing a race.
pub const STOCK_UPDATE_ATTEMPTS: usize = 64;

/// Handle to the inventory database.
///
/// This struct is cheap to clone and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    pool: SqlitePool,
}

impl InventoryStore {
    /// Open (creating if missing) the database at `path` and ensure its tables exist.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Setup(format!("failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;

        tracing::info!(path = %path.display(), "opened inventory database");
        Ok(store)
    }

    /// Open the database named by `config`.
    pub async fn open_with(config: &DesktopConfig) -> StoreResult<Self> {
        Self::open(&config.db_path).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id                 INTEGER PRIMARY KEY CHECK (id = 1),
                theme              TEXT NOT NULL DEFAULT 'light' CHECK (theme IN ('dark', 'light')),
                app_name           TEXT NOT NULL DEFAULT 'Zaiko',
                warn_threshold     INTEGER NOT NULL DEFAULT 20,
                critical_threshold INTEGER NOT NULL DEFAULT 5
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO settings (id)
            SELECT 1
            WHERE NOT EXISTS (SELECT 1 FROM settings WHERE id = 1)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inv_sets (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                canonical_name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inv_items (
                id             TEXT PRIMARY KEY,
                set_id         TEXT NOT NULL REFERENCES inv_sets(id) ON DELETE CASCADE,
                name           TEXT NOT NULL,
                canonical_name TEXT NOT NULL,
                description    TEXT NULL,
                stock          INTEGER NOT NULL,
                barcode        TEXT NULL,
                internal_code  TEXT NULL,
                UNIQUE (set_id, canonical_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load every set with its items, in creation order.
    ///
    /// Item rows that no longer pass validation are skipped and logged.
    pub async fn load_inventory(&self) -> StoreResult<Inventory> {
        let set_rows = sqlx::query("SELECT id, name FROM inv_sets ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        let mut sets = set_rows
            .iter()
            .map(|row| -> StoreResult<InventorySet> {
                let id: String = row.try_get("id")?;
                let id = id
                    .parse::<SetId>()
                    .map_err(|e| StoreError::corrupt("inv_sets", e.to_string()))?;
                Ok(InventorySet {
                    id,
                    name: row.try_get("name")?,
                    items: Vec::new(),
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let item_rows = sqlx::query(
            r#"
            SELECT id, set_id, name, description, stock, barcode, internal_code
            FROM inv_items
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        for row in &item_rows {
            let (set_id, item) = match item_from_row(row) {
                Ok(decoded) => decoded,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable item row");
                    continue;
                }
            };

            if let Err(err) = item.validate() {
                tracing::warn!(item_id = %item.id, error = %err, "skipping invalid item row");
                continue;
            }

            match sets.iter_mut().find(|set| set.id == set_id) {
                Some(set) => set.items.push(item),
                None => tracing::warn!(item_id = %item.id, %set_id, "skipping item of unknown set"),
            }
        }

        Ok(Inventory { sets })
    }

    pub async fn load_settings(&self) -> StoreResult<Settings> {
        let row = sqlx::query(
            r#"
            SELECT theme, app_name, warn_threshold, critical_threshold
            FROM settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(Settings::default());
        };

        let theme: String = row.try_get("theme")?;
        Ok(Settings {
            theme: theme
                .parse()
                .map_err(|e: DomainError| StoreError::corrupt("settings", e.to_string()))?,
            app_name: row.try_get("app_name")?,
            warn_threshold: row.try_get("warn_threshold")?,
            critical_threshold: row.try_get("critical_threshold")?,
        })
    }

    pub async fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        settings.validate()?;
        write_settings(&self.pool, settings).await?;
        tracing::info!(theme = settings.theme.as_str(), "settings saved");
        Ok(())
    }

    /// Create an empty set. Names colliding canonically with an existing set are rejected.
    pub async fn create_set(&self, name: &str) -> StoreResult<InventorySet> {
        let canonical = normalize_name(name);
        if canonical.is_empty() {
            return Err(DomainError::validation(format!("set name {name:?} is not valid")).into());
        }

        let set = InventorySet::new(name.trim());
        sqlx::query("INSERT INTO inv_sets (id, name, canonical_name) VALUES (?1, ?2, ?3)")
            .bind(set.id.to_string())
            .bind(&set.name)
            .bind(&canonical)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_duplicate(e, || format!("set {name:?} already exists")))?;

        tracing::info!(set_id = %set.id, name = %set.name, "set created");
        Ok(set)
    }

    /// Add an item to the set named `set_name`.
    pub async fn create_item(&self, set_name: &str, new_item: NewItem) -> StoreResult<InventoryItem> {
        let set_id = self.set_id(set_name).await?;
        let item = new_item.into_item()?;
        let canonical = canonical_item_name(&item)?;

        sqlx::query(
            r#"
            INSERT INTO inv_items (id, set_id, name, canonical_name, description, stock, barcode, internal_code)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(item.id.to_string())
        .bind(set_id.to_string())
        .bind(&item.name)
        .bind(&canonical)
        .bind(item.description.as_deref())
        .bind(item.stock)
        .bind(item.barcode.as_deref())
        .bind(item.internal_code.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, || format!("item {:?} already exists in this set", item.name)))?;

        tracing::info!(%set_id, item_id = %item.id, name = %item.name, "item created");
        Ok(item)
    }

    /// Rename an item or change its description and codes.
    pub async fn edit_item(
        &self,
        set_name: &str,
        item_id: ItemId,
        edit: ItemEdit,
    ) -> StoreResult<InventoryItem> {
        let set_id = self.set_id(set_name).await?;
        let mut item = self.item(set_id, item_id).await?;
        edit.apply_to(&mut item)?;
        let canonical = canonical_item_name(&item)?;

        let result = sqlx::query(
            r#"
            UPDATE inv_items
            SET name = ?1, canonical_name = ?2, description = ?3, barcode = ?4, internal_code = ?5
            WHERE set_id = ?6 AND id = ?7
            "#,
        )
        .bind(&item.name)
        .bind(&canonical)
        .bind(item.description.as_deref())
        .bind(item.barcode.as_deref())
        .bind(item.internal_code.as_deref())
        .bind(set_id.to_string())
        .bind(item_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, || format!("item {:?} already exists in this set", item.name)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("item {item_id}")).into());
        }

        tracing::info!(%set_id, %item_id, "item edited");
        Ok(item)
    }

    /// Overwrite, increment or decrement an item's stock. Returns the new stock.
    ///
    /// The write only lands if the stock is still the value the new one was
    /// computed from; otherwise the adjustment is recomputed against the
    /// fresh value, up to [`STOCK_UPDATE_ATTEMPTS`] times.
    pub async fn update_stock(
        &self,
        set_name: &str,
        item_id: ItemId,
        action: StockAction,
        amount: i64,
    ) -> StoreResult<i64> {
        let set_id = self.set_id(set_name).await?;

        for attempt in 1..=STOCK_UPDATE_ATTEMPTS {
            let item = self.item(set_id, item_id).await?;
            let new_stock = action.apply(item.stock, amount)?;

            let result = sqlx::query(
                "UPDATE inv_items SET stock = ?1 WHERE set_id = ?2 AND id = ?3 AND stock = ?4",
            )
            .bind(new_stock)
            .bind(set_id.to_string())
            .bind(item_id.to_string())
            .bind(item.stock)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                tracing::info!(%item_id, ?action, amount, old = item.stock, new = new_stock, "stock updated");
                return Ok(new_stock);
            }

            tracing::debug!(%item_id, attempt, "stock changed underneath update, retrying");
        }

        tracing::warn!(%item_id, "stock update kept colliding with other writers");
        Err(DomainError::conflict(format!("stock of item {item_id} is being changed concurrently")).into())
    }

    /// Look up one item of the set named `set_name`.
    pub async fn find_item(&self, set_name: &str, item_id: ItemId) -> StoreResult<InventoryItem> {
        let set_id = self.set_id(set_name).await?;
        self.item(set_id, item_id).await
    }

    pub async fn delete_item(&self, set_name: &str, item_id: ItemId) -> StoreResult<()> {
        let set_id = self.set_id(set_name).await?;
        let result = sqlx::query("DELETE FROM inv_items WHERE set_id = ?1 AND id = ?2")
            .bind(set_id.to_string())
            .bind(item_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("item {item_id} in set {set_name:?}")).into());
        }

        tracing::info!(%set_id, %item_id, "item deleted");
        Ok(())
    }

    /// Delete a set together with its items.
    pub async fn delete_set(&self, set_name: &str) -> StoreResult<()> {
        let set_id = self.set_id(set_name).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM inv_items WHERE set_id = ?1")
            .bind(set_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM inv_sets WHERE id = ?1")
            .bind(set_id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(%set_id, name = set_name, "set deleted");
        Ok(())
    }

    /// Delete all sets and items and restore default settings.
    pub async fn reset(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM inv_items").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM inv_sets").execute(&mut *tx).await?;
        write_settings(&mut *tx, &Settings::default()).await?;
        tx.commit().await?;

        tracing::warn!("all inventory data deleted and settings reset");
        Ok(())
    }

    /// Replace every set and item with `inventory` in one transaction.
    ///
    /// Used by import once the caller has confirmed the overwrite.
    pub async fn replace_inventory(&self, inventory: &Inventory) -> StoreResult<()> {
        inventory.ensure_unique_names()?;
        for item in inventory.items() {
            item.validate()?;
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM inv_items").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM inv_sets").execute(&mut *tx).await?;

        for set in &inventory.sets {
            sqlx::query("INSERT INTO inv_sets (id, name, canonical_name) VALUES (?1, ?2, ?3)")
                .bind(set.id.to_string())
                .bind(&set.name)
                .bind(set.canonical_name())
                .execute(&mut *tx)
                .await?;

            for item in &set.items {
                sqlx::query(
                    r#"
                    INSERT INTO inv_items (id, set_id, name, canonical_name, description, stock, barcode, internal_code)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                )
                .bind(item.id.to_string())
                .bind(set.id.to_string())
                .bind(&item.name)
                .bind(item.canonical_name())
                .bind(item.description.as_deref())
                .bind(item.stock)
                .bind(item.barcode.as_deref())
                .bind(item.internal_code.as_deref())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            sets = inventory.sets.len(),
            items = inventory.item_count(),
            "inventory replaced"
        );
        Ok(())
    }

    async fn set_id(&self, set_name: &str) -> StoreResult<SetId> {
        let canonical = normalize_name(set_name);
        let row = sqlx::query("SELECT id FROM inv_sets WHERE canonical_name = ?1")
            .bind(&canonical)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row.filter(|_| !canonical.is_empty()) else {
            return Err(DomainError::not_found(format!("set {set_name:?}")).into());
        };

        let id: String = row.try_get("id")?;
        id.parse()
            .map_err(|e: DomainError| StoreError::corrupt("inv_sets", e.to_string()))
    }

    async fn item(&self, set_id: SetId, item_id: ItemId) -> StoreResult<InventoryItem> {
        let row = sqlx::query(
            r#"
            SELECT id, set_id, name, description, stock, barcode, internal_code
            FROM inv_items
            WHERE set_id = ?1 AND id = ?2
            "#,
        )
        .bind(set_id.to_string())
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| DomainError::not_found(format!("item {item_id}")))?;
        Ok(item_from_row(&row)?.1)
    }
}

/// Canonical key for an item row. Empty keys are rejected so every stored
/// item stays reachable by name.
fn canonical_item_name(item: &InventoryItem) -> StoreResult<String> {
    let canonical = item.canonical_name();
    if canonical.is_empty() {
        return Err(DomainError::validation(format!("item name {:?} is not valid", item.name)).into());
    }
    Ok(canonical)
}

/// Maps a unique-constraint violation to a domain `Conflict`.
fn conflict_on_duplicate(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    match err {
        sqlx::Error::Database(e) if e.is_unique_violation() => DomainError::conflict(what()).into(),
        other => other.into(),
    }
}

async fn write_settings<'e, E>(executor: E, settings: &Settings) -> StoreResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        REPLACE INTO settings (id, theme, app_name, warn_threshold, critical_threshold)
        VALUES (1, ?1, ?2, ?3, ?4)
        "#,
    )
    .bind(settings.theme.as_str())
    .bind(&settings.app_name)
    .bind(settings.warn_threshold)
    .bind(settings.critical_threshold)
    .execute(executor)
    .await?;
    Ok(())
}

fn item_from_row(row: &SqliteRow) -> StoreResult<(SetId, InventoryItem)> {
    let id: String = row.try_get("id")?;
    let set_id: String = row.try_get("set_id")?;

    let item = InventoryItem {
        id: id
            .parse()
            .map_err(|e: DomainError| StoreError::corrupt("inv_items", e.to_string()))?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        stock: row.try_get("stock")?,
        barcode: row.try_get("barcode")?,
        internal_code: row.try_get("internal_code")?,
    };
    let set_id = set_id
        .parse()
        .map_err(|e: DomainError| StoreError::corrupt("inv_items", e.to_string()))?;

    Ok((set_id, item))
}
