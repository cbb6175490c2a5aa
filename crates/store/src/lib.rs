//! `supplyplan-store`: persistence for lists, quotes and shared snapshots.
//!
//! The engine never touches storage; callers load a snapshot through a
//! [`Store`], run the pipeline, and re-run it after every mutation.

pub mod error;
pub mod memory;
pub mod sqlite;

use serde::{Deserialize, Serialize};
use supplyplan_planner::matcher::quote_total;
use supplyplan_planner::model::{ConsolidatedEntry, Item, QuoteLine, SourceList, SupplierQuote};
use supplyplan_planner::PlannerConfig;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Appended to the title of a list imported from a share link.
pub const IMPORTED_SUFFIX: &str = " (Importada)";

/// A quote about to be saved; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub supplier_name: String,
    pub date: String,
    pub items: Vec<QuoteLine>,
    pub total_value_cents: i64,
}

impl NewQuote {
    /// Snapshot the quote's total against the current demand table.
    pub fn into_snapshot(mut self, entries: &[ConsolidatedEntry], config: &PlannerConfig) -> Self {
        self.total_value_cents = quote_total(entries, &self.items, &config.conversions);
        self
    }

    pub(crate) fn into_quote(self, id: String) -> SupplierQuote {
        SupplierQuote {
            id,
            supplier_name: self.supplier_name,
            date: self.date,
            items: self.items,
            total_value_cents: self.total_value_cents,
        }
    }
}

/// Account-independent copy of a list, readable by anyone holding its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedList {
    pub id: String,
    pub title: String,
    pub items: Vec<Item>,
    pub created_at: String,
}

/// CRUD for the records owned by an account, plus the share space.
///
/// Listing returns records in creation order. Mutating an id the account
/// does not own is `StoreError::NotFound`.
pub trait Store {
    fn create_list(&mut self, account: &str, title: &str, items: Vec<Item>) -> Result<SourceList, StoreError>;
    fn lists(&self, account: &str) -> Result<Vec<SourceList>, StoreError>;
    fn rename_list(&mut self, account: &str, id: &str, title: &str) -> Result<(), StoreError>;
    fn delete_list(&mut self, account: &str, id: &str) -> Result<(), StoreError>;

    fn create_quote(&mut self, account: &str, quote: NewQuote) -> Result<SupplierQuote, StoreError>;
    fn quotes(&self, account: &str) -> Result<Vec<SupplierQuote>, StoreError>;
    fn rename_quote(&mut self, account: &str, id: &str, supplier_name: &str) -> Result<(), StoreError>;
    fn update_quote_items(
        &mut self,
        account: &str,
        id: &str,
        items: Vec<QuoteLine>,
        total_value_cents: i64,
    ) -> Result<(), StoreError>;
    fn delete_quote(&mut self, account: &str, id: &str) -> Result<(), StoreError>;

    /// Publish a snapshot of a list; returns the opaque share id.
    fn share_list(&mut self, title: &str, items: Vec<Item>) -> Result<String, StoreError>;
    fn shared_list(&self, share_id: &str) -> Result<Option<SharedList>, StoreError>;

    /// Copy a shared snapshot into `account` as a new list.
    fn import_shared(&mut self, account: &str, share_id: &str) -> Result<SourceList, StoreError> {
        let shared = self.shared_list(share_id)?.ok_or_else(|| StoreError::NotFound {
            kind: "shared list",
            id: share_id.to_string(),
        })?;
        let title = format!("{}{IMPORTED_SUFFIX}", shared.title);
        self.create_list(account, &title, shared.items)
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
