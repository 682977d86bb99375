//! Request DTOs for pricing API endpoints.
//!
//! Absent amounts deserialize as zero.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::emi::EmiRounding;
use super::types::{LineItem, LineItemSlot, Travelers};

/// Request to build an EMI plan for a total
#[derive(Debug, Deserialize)]
pub struct EmiRequest {
    #[serde(default, with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub months: u32,
    #[serde(default)]
    pub rounding: EmiRounding,
}

/// Request for the standard EMI plans of a total
#[derive(Debug, Deserialize)]
pub struct EmiOptionsRequest {
    #[serde(default, with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(default)]
    pub rounding: EmiRounding,
}

/// Request to aggregate line items into a quote
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub tax_percent: Decimal,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub per_person: Option<Decimal>,
}

impl QuoteRequest {
    pub fn travelers(&self) -> Travelers {
        Travelers::new(self.adults, self.children, 0)
    }
}

/// Request to price a swap between two posted line items
#[derive(Debug, Deserialize)]
pub struct DeltaRequest {
    pub previous: LineItem,
    pub candidate: LineItem,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub current_total: Decimal,
}

/// Query parameters for stored package EMI plans
#[derive(Debug, Default, Deserialize)]
pub struct PackageEmiQuery {
    #[serde(default)]
    pub months: Option<u32>,
    #[serde(default)]
    pub rounding: EmiRounding,
}

/// Request to preview a swap on a stored package
#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub slot: LineItemSlot,
    pub option_id: String,
}

/// Traveler counts to match against family types
pub type FamilyTypeRequest = Travelers;
