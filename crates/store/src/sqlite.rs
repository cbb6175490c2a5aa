// SQLite-backed store. One file holds every account.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use supplyplan_planner::model::{Item, QuoteLine, SourceList, SupplierQuote};

use crate::{new_id, now, NewQuote, SharedList, Store, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS source_lists (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    account TEXT NOT NULL,
    title TEXT NOT NULL,
    items TEXT NOT NULL,           -- JSON array of items
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS supplier_quotes (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    account TEXT NOT NULL,
    supplier_name TEXT NOT NULL,
    quote_date TEXT NOT NULL,
    items TEXT NOT NULL,           -- JSON array of quote lines
    total_value_cents INTEGER NOT NULL,  -- snapshot taken at save time
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shared_lists (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    items TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_source_lists_account ON source_lists (account, seq);
CREATE INDEX IF NOT EXISTS idx_supplier_quotes_account ON supplier_quotes (account, seq);
"#;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Sqlite(e.to_string()))?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound { kind, id: id.to_string() }
}

fn decode_items<T: serde::de::DeserializeOwned>(json: &str) -> Result<Vec<T>, StoreError> {
    Ok(serde_json::from_str(json)?)
}

impl Store for SqliteStore {
    fn create_list(&mut self, account: &str, title: &str, items: Vec<Item>) -> Result<SourceList, StoreError> {
        let id = new_id();
        let json = serde_json::to_string(&items)?;
        self.conn.execute(
            "INSERT INTO source_lists (id, account, title, items, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, account, title, json, now()],
        )?;
        info!(account, list = %id, items = items.len(), "list saved");
        Ok(SourceList {
            id,
            title: title.to_string(),
            items,
        })
    }

    fn lists(&self, account: &str) -> Result<Vec<SourceList>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, items FROM source_lists WHERE account = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![account], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut lists = Vec::new();
        for row in rows {
            let (id, title, items) = row?;
            lists.push(SourceList {
                id,
                title,
                items: decode_items(&items)?,
            });
        }
        Ok(lists)
    }

    fn rename_list(&mut self, account: &str, id: &str, title: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE source_lists SET title = ?1 WHERE account = ?2 AND id = ?3",
            params![title, account, id],
        )?;
        if changed == 0 {
            return Err(not_found("list", id));
        }
        Ok(())
    }

    fn delete_list(&mut self, account: &str, id: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM source_lists WHERE account = ?1 AND id = ?2",
            params![account, id],
        )?;
        if changed == 0 {
            return Err(not_found("list", id));
        }
        info!(account, list = %id, "list deleted");
        Ok(())
    }

    fn create_quote(&mut self, account: &str, quote: NewQuote) -> Result<SupplierQuote, StoreError> {
        let quote = quote.into_quote(new_id());
        let json = serde_json::to_string(&quote.items)?;
        self.conn.execute(
            "INSERT INTO supplier_quotes (id, account, supplier_name, quote_date, items, total_value_cents, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                quote.id,
                account,
                quote.supplier_name,
                quote.date,
                json,
                quote.total_value_cents,
                now()
            ],
        )?;
        info!(account, quote = %quote.id, supplier = %quote.supplier_name, "quote saved");
        Ok(quote)
    }

    fn quotes(&self, account: &str) -> Result<Vec<SupplierQuote>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, supplier_name, quote_date, items, total_value_cents \
             FROM supplier_quotes WHERE account = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![account], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut quotes = Vec::new();
        for row in rows {
            let (id, supplier_name, date, items, total_value_cents) = row?;
            quotes.push(SupplierQuote {
                id,
                supplier_name,
                date,
                items: decode_items(&items)?,
                total_value_cents,
            });
        }
        Ok(quotes)
    }

    fn rename_quote(&mut self, account: &str, id: &str, supplier_name: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE supplier_quotes SET supplier_name = ?1 WHERE account = ?2 AND id = ?3",
            params![supplier_name, account, id],
        )?;
        if changed == 0 {
            return Err(not_found("quote", id));
        }
        Ok(())
    }

    fn update_quote_items(
        &mut self,
        account: &str,
        id: &str,
        items: Vec<QuoteLine>,
        total_value_cents: i64,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(&items)?;
        let changed = self.conn.execute(
            "UPDATE supplier_quotes SET items = ?1, total_value_cents = ?2 WHERE account = ?3 AND id = ?4",
            params![json, total_value_cents, account, id],
        )?;
        if changed == 0 {
            return Err(not_found("quote", id));
        }
        Ok(())
    }

    fn delete_quote(&mut self, account: &str, id: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM supplier_quotes WHERE account = ?1 AND id = ?2",
            params![account, id],
        )?;
        if changed == 0 {
            return Err(not_found("quote", id));
        }
        info!(account, quote = %id, "quote deleted");
        Ok(())
    }

    fn share_list(&mut self, title: &str, items: Vec<Item>) -> Result<String, StoreError> {
        let id = new_id();
        let json = serde_json::to_string(&items)?;
        self.conn.execute(
            "INSERT INTO shared_lists (id, title, items, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, title, json, now()],
        )?;
        info!(share = %id, "list shared");
        Ok(id)
    }

    fn shared_list(&self, share_id: &str) -> Result<Option<SharedList>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, items, created_at FROM shared_lists WHERE id = ?1",
                params![share_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, title, items, created_at)) => Ok(Some(SharedList {
                id,
                title,
                items: decode_items(&items)?,
                created_at,
            })),
            None => Ok(None),
        }
    }
}
