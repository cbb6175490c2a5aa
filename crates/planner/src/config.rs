use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::money::UnitPrice;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Supplier label shown for items nobody quoted.
    #[serde(default = "default_unquoted_label")]
    pub unquoted_label: String,
    #[serde(default)]
    pub split_quantity: SplitQuantity,
    /// Pack-size conversion rules, tried in order. Omitted = default table.
    #[serde(default = "default_conversions", rename = "conversion")]
    pub conversions: Vec<ConversionRule>,
}

fn default_name() -> String {
    "supply plan".into()
}

fn default_unquoted_label() -> String {
    "Não cotado".into()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            unquoted_label: default_unquoted_label(),
            split_quantity: SplitQuantity::default(),
            conversions: default_conversions(),
        }
    }
}

// ---------------------------------------------------------------------------
// Split quantity convention
// ---------------------------------------------------------------------------

/// Which quantity multiplies the winning unit price in the split total and
/// the per-store subtotals.
///
/// `Raw` keeps the historical behavior: the consolidated quantity as-is,
/// even where an exclusive supplier total would apply a pack conversion.
/// `Effective` applies the conversion table there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitQuantity {
    #[default]
    Raw,
    Effective,
}

impl std::fmt::Display for SplitQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Effective => write!(f, "effective"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion rules
// ---------------------------------------------------------------------------

/// Reinterprets a quoted unit price as a per-pack price.
///
/// Extraction cannot reliably distinguish "500 loose sheets" from "1 pack
/// of 500". When an entry looks like a packed good (name contains one of
/// `patterns`), is demanded in bulk (`min_quantity`) and is priced above
/// what a single loose unit would cost (`price_above_cents`), the quoted
/// price is read as covering `pack_size` units. This is a known
/// approximation, not a general unit-conversion system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionRule {
    pub name: String,
    /// Case-insensitive substrings of the entry display name.
    pub patterns: Vec<String>,
    pub min_quantity: u32,
    /// The rule applies only when the unit price is strictly above this.
    pub price_above_cents: i64,
    pub pack_size: u32,
}

impl ConversionRule {
    /// The ream rule: 500 sheets of office paper per quoted unit.
    pub fn paper_ream() -> Self {
        Self {
            name: "paper-ream".into(),
            patterns: vec!["sulfite".into(), "papel".into(), "a4".into()],
            min_quantity: 100,
            price_above_cents: 100,
            pack_size: 500,
        }
    }

    pub fn applies(&self, display_name: &str, quantity: u64, unit_price: UnitPrice) -> bool {
        if quantity < u64::from(self.min_quantity) || !unit_price.exceeds_cents(self.price_above_cents) {
            return false;
        }
        let name = display_name.to_lowercase();
        self.patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
    }

    pub fn packs_for(&self, quantity: u64) -> u64 {
        quantity.div_ceil(u64::from(self.pack_size))
    }
}

fn default_conversions() -> Vec<ConversionRule> {
    vec![ConversionRule::paper_ream()]
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PlannerConfig {
    pub fn from_toml(input: &str) -> Result<Self, PlanError> {
        let config: PlannerConfig =
            toml::from_str(input).map_err(|e| PlanError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.unquoted_label.trim().is_empty() {
            return Err(PlanError::ConfigValidation(
                "unquoted_label must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.conversions {
            if !seen.insert(rule.name.as_str()) {
                return Err(PlanError::ConfigValidation(format!(
                    "duplicate conversion rule '{}'",
                    rule.name
                )));
            }
            if rule.pack_size == 0 {
                return Err(PlanError::ConfigValidation(format!(
                    "conversion '{}': pack_size must be at least 1",
                    rule.name
                )));
            }
            if rule.patterns.is_empty() {
                return Err(PlanError::ConfigValidation(format!(
                    "conversion '{}': at least one pattern is required",
                    rule.name
                )));
            }
            if rule.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(PlanError::ConfigValidation(format!(
                    "conversion '{}': patterns must not be empty",
                    rule.name
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
