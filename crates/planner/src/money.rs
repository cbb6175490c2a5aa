//! Currency amounts as fixed-point integers.
//!
//! Prices arrive from extraction as decimal text or JSON numbers
//! (`"1.00"`, `0.8`, `25`, `"0.051"`). Unit prices are held as
//! [`UnitPrice`] (ten-thousandths of the currency unit) so per-sheet prices
//! below one cent keep their order. Money totals are `i64` cents. Nothing
//! in the engine goes through floats.

use std::fmt;

use serde::de::{self, Deserialize, Visitor};
use serde::{Deserializer, Serialize, Serializer};

/// Fractional digits kept for unit prices.
pub const UNIT_PRICE_DIGITS: u32 = 4;

const CENT_DIGITS: u32 = 2;

/// Unit-price steps per cent.
const PER_CENT: i64 = 100;

/// Parse a non-negative decimal amount into an integer with `digits`
/// fractional digits, rounding half up on the next digit.
///
/// Accepts an optional `R$` prefix, an optional thousands-free integer part
/// and `.` or `,` as the decimal separator.
fn parse_scaled(input: &str, digits: u32) -> Result<i64, String> {
    let s = input.trim();
    let s = s.strip_prefix("R$").unwrap_or(s).trim();
    if s.is_empty() {
        return Err("empty amount".into());
    }
    if s.starts_with('-') {
        return Err(format!("negative amount '{input}'"));
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let (whole, frac) = match s.find(['.', ',']) {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("invalid amount '{input}'"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid amount '{input}'"));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| format!("amount out of range '{input}'"))?
    };

    let frac = frac.as_bytes();
    let mut fraction: i64 = 0;
    for i in 0..digits as usize {
        let digit = frac.get(i).map(|b| i64::from(b - b'0')).unwrap_or(0);
        fraction = fraction * 10 + digit;
    }
    let round_up = frac.get(digits as usize).is_some_and(|b| *b >= b'5');

    whole
        .checked_mul(10i64.pow(digits))
        .and_then(|v| v.checked_add(fraction + i64::from(round_up)))
        .ok_or_else(|| format!("amount out of range '{input}'"))
}

/// Floats go through their shortest decimal rendering so `1.005` and
/// `"1.005"` land on the same value.
fn scaled_from_f64(value: f64, digits: u32) -> Result<i64, String> {
    if !value.is_finite() {
        return Err(format!("non-finite amount {value}"));
    }
    if value < 0.0 {
        return Err(format!("negative amount {value}"));
    }
    parse_scaled(&value.to_string(), digits)
}

fn format_scaled(value: i64, digits: u32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let scale = 10u64.pow(digits);
    format!(
        "{sign}{}.{:0width$}",
        abs / scale,
        abs % scale,
        width = digits as usize
    )
}

/// Parse a decimal amount into cents, rounding half up past two digits.
/// Negative and empty amounts are rejected.
pub fn parse_cents(input: &str) -> Result<i64, String> {
    parse_scaled(input, CENT_DIGITS)
}

/// Convert a JSON/TOML float into cents.
pub fn cents_from_f64(value: f64) -> Result<i64, String> {
    scaled_from_f64(value, CENT_DIGITS)
}

/// Render cents as a plain decimal with two fractional digits (`"12.50"`).
pub fn format_cents(cents: i64) -> String {
    format_scaled(cents, CENT_DIGITS)
}

/// Display adapter for log lines and human summaries.
pub struct Money(pub i64);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format_cents(self.0))
    }
}

// ---------------------------------------------------------------------------
// Unit prices
// ---------------------------------------------------------------------------

/// A quoted price for one unit, in ten-thousandths of the currency unit.
///
/// Serialized as a decimal string with two to four fractional digits
/// (`"0.80"`, `"0.051"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitPrice(i64);

impl UnitPrice {
    pub const ZERO: Self = Self(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents.saturating_mul(PER_CENT))
    }

    pub fn from_ten_thousandths(value: i64) -> Self {
        Self(value)
    }

    pub fn ten_thousandths(self) -> i64 {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, String> {
        parse_scaled(input, UNIT_PRICE_DIGITS).map(Self)
    }

    pub fn from_f64(value: f64) -> Result<Self, String> {
        scaled_from_f64(value, UNIT_PRICE_DIGITS).map(Self)
    }

    /// Strictly above a threshold given in cents.
    pub fn exceeds_cents(self, cents: i64) -> bool {
        self.0 > cents.saturating_mul(PER_CENT)
    }

    /// Money for `quantity` units, rounded half up to cents.
    ///
    /// Saturates at `i64::MAX` instead of overflowing.
    pub fn cost_cents(self, quantity: u64) -> i64 {
        let raw = i128::from(self.0) * i128::from(quantity);
        let cents = (raw + i128::from(PER_CENT / 2)).div_euclid(i128::from(PER_CENT));
        i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX })
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = format_scaled(self.0, UNIT_PRICE_DIGITS);
        let keep = s.len() - (UNIT_PRICE_DIGITS - CENT_DIGITS) as usize;
        while s.len() > keep && s.ends_with('0') {
            s.pop();
        }
        f.pad(&s)
    }
}

impl Serialize for UnitPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UnitPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(ScaledVisitor(UNIT_PRICE_DIGITS))
            .map(Self)
    }
}

/// Accepts a decimal string or a number, scaled to the given fractional digits.
struct ScaledVisitor(u32);

impl<'de> Visitor<'de> for ScaledVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative currency amount")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(10i64.pow(self.0)))
            .ok_or_else(|| E::custom(format!("amount out of range {v}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        if v < 0 {
            return Err(E::custom(format!("negative amount {v}")));
        }
        v.checked_mul(10i64.pow(self.0))
            .ok_or_else(|| E::custom(format!("amount out of range {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        scaled_from_f64(v, self.0).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        parse_scaled(v, self.0).map_err(E::custom)
    }
}

/// Serde adapter for cent fields: serialize as a decimal string,
/// deserialize from a decimal string or a number.
pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_cents(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(ScaledVisitor(CENT_DIGITS))
    }
}
