use serde::{Deserialize, Serialize};

use crate::config::SplitQuantity;
use crate::money::UnitPrice;

// ---------------------------------------------------------------------------
// Demand side
// ---------------------------------------------------------------------------

/// One demand line of a source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub category: String,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            category: String::new(),
        }
    }
}

/// One extracted supply list (one child, one photo or manual entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceList {
    pub id: String,
    pub title: String,
    pub items: Vec<Item>,
}

/// Merged demand for one normalized item name across every source list.
///
/// Derived; rebuilt from scratch whenever any list changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedEntry {
    /// `normalize(display_name)`.
    pub key: String,
    /// Original spelling of the first item seen with this key.
    pub display_name: String,
    /// Sum of item quantities; `u64` so any number of `u32` items fits.
    pub total_quantity: u64,
    /// Contributing items, in list-then-item order.
    pub items: Vec<Item>,
}

// ---------------------------------------------------------------------------
// Supply side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub item_name: String,
    pub unit_price: UnitPrice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl QuoteLine {
    /// A line priced in whole cents.
    pub fn new(item_name: impl Into<String>, unit_price_cents: i64) -> Self {
        Self::priced(item_name, UnitPrice::from_cents(unit_price_cents))
    }

    pub fn priced(item_name: impl Into<String>, unit_price: UnitPrice) -> Self {
        Self {
            item_name: item_name.into(),
            unit_price,
            url: None,
        }
    }
}

/// One supplier's priced response.
///
/// `total_value_cents` is a snapshot taken when the quote was saved
/// (see [`crate::matcher::quote_total`]); it is not kept in sync when list
/// quantities change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierQuote {
    pub id: String,
    pub supplier_name: String,
    #[serde(default)]
    pub date: String,
    pub items: Vec<QuoteLine>,
    #[serde(rename = "total_value", with = "crate::money::decimal", default)]
    pub total_value_cents: i64,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Cheapest offer found for one consolidated entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BestOffer {
    Quoted {
        supplier: String,
        /// Position of the winning quote in the analyzed quote slice.
        quote_index: usize,
        unit_price: UnitPrice,
    },
    Unquoted,
}

impl BestOffer {
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::Quoted { .. })
    }

    /// Unit price, or zero when nobody quoted the item.
    pub fn unit_price(&self) -> UnitPrice {
        match self {
            Self::Quoted { unit_price, .. } => *unit_price,
            Self::Unquoted => UnitPrice::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub item_name: String,
    /// Normalized key of the entry this recommendation was derived from.
    pub key: String,
    /// Winning supplier name, or the configured unquoted label.
    pub best_supplier: String,
    pub offer: BestOffer,
}

impl Recommendation {
    pub fn unit_price(&self) -> UnitPrice {
        self.offer.unit_price()
    }
}

/// Exclusive-purchase total for one quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierTotal {
    pub quote_id: String,
    pub supplier: String,
    #[serde(rename = "total", with = "crate::money::decimal")]
    pub total_cents: i64,
    pub matched_items: usize,
    pub missing_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAnalysis {
    pub best_global_supplier: String,
    #[serde(rename = "best_global_total", with = "crate::money::decimal")]
    pub best_global_total_cents: i64,
    #[serde(rename = "split_supplier_total", with = "crate::money::decimal")]
    pub split_supplier_total_cents: i64,
    /// Quantity convention used for `split_supplier_total`.
    pub split_quantity: SplitQuantity,
    pub recommendations: Vec<Recommendation>,
    /// Every quote's exclusive total, in quote input order.
    pub supplier_totals: Vec<SupplierTotal>,
}

impl BudgetAnalysis {
    /// Exclusive best minus split; negative when one supplier beats the split.
    pub fn savings_cents(&self) -> i64 {
        self.best_global_total_cents.saturating_sub(self.split_supplier_total_cents)
    }

    pub fn split_beats_exclusive(&self) -> bool {
        self.split_supplier_total_cents <= self.best_global_total_cents
    }
}

// ---------------------------------------------------------------------------
// Shopping plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLine {
    pub recommendation: Recommendation,
    /// `None` when no consolidated entry backs the recommendation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(rename = "cost", with = "crate::money::decimal")]
    pub cost_cents: i64,
}

/// Pick list for one store (or for the unquoted bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreGroup {
    pub supplier: String,
    pub lines: Vec<PlanLine>,
    #[serde(rename = "subtotal", with = "crate::money::decimal")]
    pub subtotal_cents: i64,
}

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub meta: PlanMeta,
    pub summary: PlanSummary,
    pub consolidated: Vec<ConsolidatedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<BudgetAnalysis>,
    pub plan: Vec<StoreGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanMeta {
    pub plan_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub lists: usize,
    pub items: usize,
    pub entries: usize,
    pub quotes: usize,
    pub unquoted_entries: usize,
}
