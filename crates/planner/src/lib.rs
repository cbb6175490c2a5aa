//! `supplyplan-planner`: consolidation and price-optimization engine.
//!
//! Pure engine crate: receives already-extracted lists and supplier quotes,
//! returns the consolidated demand table, the budget analysis and the
//! per-store shopping plan. No CLI or storage dependencies.

pub mod analyze;
pub mod compare;
pub mod config;
pub mod consolidate;
pub mod engine;
pub mod error;
pub mod export;
pub mod input;
pub mod matcher;
pub mod model;
pub mod money;
pub mod normalize;
pub mod partition;

pub use analyze::{analyze, analyze_with};
pub use config::PlannerConfig;
pub use consolidate::consolidate;
pub use engine::run;
pub use error::PlanError;
pub use model::{
    BestOffer, BudgetAnalysis, ConsolidatedEntry, Item, PlanResult, QuoteLine, Recommendation,
    SourceList, StoreGroup, SupplierQuote,
};
pub use normalize::normalize;
pub use partition::{partition_by_supplier, partition_with};
