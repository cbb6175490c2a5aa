use std::collections::HashMap;

use supplyplan_planner::model::{Item, QuoteLine, SourceList, SupplierQuote};

use crate::{new_id, now, NewQuote, SharedList, Store, StoreError};

/// Ephemeral store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: HashMap<String, Vec<SourceList>>,
    quotes: HashMap<String, Vec<SupplierQuote>>,
    shared: HashMap<String, SharedList>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self, account: &str, id: &str) -> Result<&mut SourceList, StoreError> {
        self.lists
            .get_mut(account)
            .and_then(|lists| lists.iter_mut().find(|l| l.id == id))
            .ok_or_else(|| not_found("list", id))
    }

    fn quote_mut(&mut self, account: &str, id: &str) -> Result<&mut SupplierQuote, StoreError> {
        self.quotes
            .get_mut(account)
            .and_then(|quotes| quotes.iter_mut().find(|q| q.id == id))
            .ok_or_else(|| not_found("quote", id))
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound { kind, id: id.to_string() }
}

impl Store for MemoryStore {
    fn create_list(&mut self, account: &str, title: &str, items: Vec<Item>) -> Result<SourceList, StoreError> {
        let list = SourceList {
            id: new_id(),
            title: title.to_string(),
            items,
        };
        self.lists.entry(account.to_string()).or_default().push(list.clone());
        Ok(list)
    }

    fn lists(&self, account: &str) -> Result<Vec<SourceList>, StoreError> {
        Ok(self.lists.get(account).cloned().unwrap_or_default())
    }

    fn rename_list(&mut self, account: &str, id: &str, title: &str) -> Result<(), StoreError> {
        self.list_mut(account, id)?.title = title.to_string();
        Ok(())
    }

    fn delete_list(&mut self, account: &str, id: &str) -> Result<(), StoreError> {
        let lists = self.lists.get_mut(account).ok_or_else(|| not_found("list", id))?;
        let pos = lists
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| not_found("list", id))?;
        lists.remove(pos);
        Ok(())
    }

    fn create_quote(&mut self, account: &str, quote: NewQuote) -> Result<SupplierQuote, StoreError> {
        let quote = quote.into_quote(new_id());
        self.quotes.entry(account.to_string()).or_default().push(quote.clone());
        Ok(quote)
    }

    fn quotes(&self, account: &str) -> Result<Vec<SupplierQuote>, StoreError> {
        Ok(self.quotes.get(account).cloned().unwrap_or_default())
    }

    fn rename_quote(&mut self, account: &str, id: &str, supplier_name: &str) -> Result<(), StoreError> {
        self.quote_mut(account, id)?.supplier_name = supplier_name.to_string();
        Ok(())
    }

    fn update_quote_items(
        &mut self,
        account: &str,
        id: &str,
        items: Vec<QuoteLine>,
        total_value_cents: i64,
    ) -> Result<(), StoreError> {
        let quote = self.quote_mut(account, id)?;
        quote.items = items;
        quote.total_value_cents = total_value_cents;
        Ok(())
    }

    fn delete_quote(&mut self, account: &str, id: &str) -> Result<(), StoreError> {
        let quotes = self.quotes.get_mut(account).ok_or_else(|| not_found("quote", id))?;
        let pos = quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| not_found("quote", id))?;
        quotes.remove(pos);
        Ok(())
    }

    fn share_list(&mut self, title: &str, items: Vec<Item>) -> Result<String, StoreError> {
        let id = new_id();
        self.shared.insert(
            id.clone(),
            SharedList {
                id: id.clone(),
                title: title.to_string(),
                items,
                created_at: now(),
            },
        );
        Ok(id)
    }

    fn shared_list(&self, share_id: &str) -> Result<Option<SharedList>, StoreError> {
        Ok(self.shared.get(share_id).cloned())
    }
}
