//! Item store schema and connection management.

use crate::models::Item;
use crate::{Result, SwapShareError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// Number of mock items inserted by [`ItemStore::seed_preview`].
pub const PREVIEW_ITEM_COUNT: usize = 10;

/// SQLite-backed item store
pub struct ItemStore {
    conn: Connection,
}

impl ItemStore {
    /// Open a store at the specified path and make sure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create a new in-memory store, used for previews and tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// An in-memory store pre-filled with preview items.
    pub fn preview() -> Result<Self> {
        let store = Self::in_memory()?;
        store.seed_preview()?;
        Ok(store)
    }

    pub fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS items (
                item_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_category ON items(category);
            CREATE INDEX IF NOT EXISTS idx_items_timestamp ON items(timestamp);",
        )?;
        Ok(())
    }

    /// Insert an item and return its row id.
    pub fn add_item(&self, item: &Item) -> Result<i64> {
        if item.name.trim().is_empty() {
            return Err(SwapShareError::InvalidInput(
                "Item name is required".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO items (name, category, description, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                item.name,
                item.category,
                item.description,
                item.timestamp.timestamp_millis(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_item(&self, item_id: i64) -> Result<Item> {
        self.conn
            .query_row(
                "SELECT item_id, name, category, description, timestamp
                 FROM items WHERE item_id = ?1",
                [item_id],
                row_to_item,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    SwapShareError::NotFound(format!("Item {}", item_id))
                }
                other => other.into(),
            })
    }

    /// All items, newest first.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, name, category, description, timestamp
             FROM items ORDER BY timestamp DESC, item_id DESC",
        )?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn items_in_category(&self, category: &str) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, name, category, description, timestamp
             FROM items WHERE category = ?1 ORDER BY timestamp DESC, item_id DESC",
        )?;
        let items = stmt
            .query_map([category], row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn count_items(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every item and return how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM items", [])?;
        Ok(removed)
    }

    /// Insert the mock items used for previews. Runs in one transaction.
    pub fn seed_preview(&self) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for _ in 0..PREVIEW_ITEM_COUNT {
            let item = Item::new("Preview Item", "Books", "Sample description");
            tx.execute(
                "INSERT INTO items (name, category, description, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    item.name,
                    item.category,
                    item.description,
                    item.timestamp.timestamp_millis(),
                ],
            )?;
        }
        tx.commit()?;
        tracing::debug!("Seeded {} preview items", PREVIEW_ITEM_COUNT);
        Ok(PREVIEW_ITEM_COUNT)
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    let millis: i64 = row.get(4)?;
    Ok(Item {
        item_id: Some(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        timestamp: DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default(),
    })
}
