//! Domain types for package quotes.
//!
//! Every price field here is a concrete `Decimal`. Absent values coming out of
//! the databases are turned into zero by the row conversions in
//! [`super::models`], so nothing downstream has to default again.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::services::PricingError;

/// Traveler composition of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Travelers {
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
}

impl Travelers {
    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
        }
    }
}

/// A hotel stay: hotel, room type and meal plan for a number of nights.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HotelStay {
    pub hotel_id: String,
    #[serde(default)]
    pub hotel_name: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default)]
    pub meal_plan: String,
    #[serde(default)]
    pub nights: u32,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub adult_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub child_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub extra_adult_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub gst_adult_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub gst_child_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub gst_extra_adult_price: Decimal,
}

impl HotelStay {
    /// Sum of every price and tax component.
    pub fn price(&self) -> Result<Decimal, PricingError> {
        [
            self.adult_price,
            self.child_price,
            self.extra_adult_price,
            self.gst_adult_price,
            self.gst_child_price,
            self.gst_extra_adult_price,
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, component| sum.checked_add(component))
        .ok_or(PricingError::AmountOutOfRange("hotel price"))
    }
}

/// A cab or vehicle with a flat price
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    #[serde(default)]
    pub vehicle_name: String,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// An individually priced, swappable part of a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItem {
    Hotel(HotelStay),
    Vehicle(Vehicle),
}

impl LineItem {
    pub fn price(&self) -> Result<Decimal, PricingError> {
        match self {
            LineItem::Hotel(stay) => stay.price(),
            LineItem::Vehicle(vehicle) => Ok(vehicle.price),
        }
    }

    pub fn category(&self) -> LineItemCategory {
        match self {
            LineItem::Hotel(_) => LineItemCategory::Hotel,
            LineItem::Vehicle(_) => LineItemCategory::Vehicle,
        }
    }
}

/// Category of swappable option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemCategory {
    Hotel,
    Vehicle,
}

impl LineItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemCategory::Hotel => "hotel",
            LineItemCategory::Vehicle => "vehicle",
        }
    }
}

impl std::fmt::Display for LineItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LineItemCategory {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hotel" | "hotels" | "room" | "rooms" => Ok(LineItemCategory::Hotel),
            "vehicle" | "vehicles" | "cab" | "cabs" => Ok(LineItemCategory::Vehicle),
            other => Err(PricingError::UnknownCategory(other.to_string())),
        }
    }
}

/// Position of a line item inside a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "index", rename_all = "snake_case")]
pub enum LineItemSlot {
    Hotel(usize),
    Vehicle(usize),
}

impl LineItemSlot {
    pub fn category(&self) -> LineItemCategory {
        match self {
            LineItemSlot::Hotel(_) => LineItemCategory::Hotel,
            LineItemSlot::Vehicle(_) => LineItemCategory::Vehicle,
        }
    }
}

/// Snapshot of a package as returned by the package data provider
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    pub destination: String,
    pub tax_percent: Decimal,
    /// Per-person price published upstream; when absent it is derived
    pub per_person_override: Option<Decimal>,
    pub travelers: Travelers,
    pub hotels: Vec<HotelStay>,
    pub vehicles: Vec<Vehicle>,
}

impl Package {
    /// All line items, hotels first.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.hotels
            .iter()
            .cloned()
            .map(LineItem::Hotel)
            .chain(self.vehicles.iter().cloned().map(LineItem::Vehicle))
            .collect()
    }

    /// Line item currently occupying `slot`
    pub fn line_item(&self, slot: LineItemSlot) -> Result<LineItem, PricingError> {
        let item = match slot {
            LineItemSlot::Hotel(i) => self.hotels.get(i).cloned().map(LineItem::Hotel),
            LineItemSlot::Vehicle(i) => self.vehicles.get(i).cloned().map(LineItem::Vehicle),
        };
        item.ok_or(PricingError::UnknownLineItem(slot))
    }

    /// Copy of this package with `slot` replaced by `candidate`.
    ///
    /// The replacement must be of the same category as the slot.
    pub fn swap(&self, slot: LineItemSlot, candidate: LineItem) -> Result<Package, PricingError> {
        let mut swapped = self.clone();
        match (slot, candidate) {
            (LineItemSlot::Hotel(i), LineItem::Hotel(stay)) => {
                let target = swapped
                    .hotels
                    .get_mut(i)
                    .ok_or(PricingError::UnknownLineItem(slot))?;
                *target = stay;
            }
            (LineItemSlot::Vehicle(i), LineItem::Vehicle(vehicle)) => {
                let target = swapped
                    .vehicles
                    .get_mut(i)
                    .ok_or(PricingError::UnknownLineItem(slot))?;
                *target = vehicle;
            }
            (slot, candidate) => {
                return Err(PricingError::MismatchedLineItems {
                    previous: slot.category(),
                    candidate: candidate.category(),
                })
            }
        }
        Ok(swapped)
    }
}

/// Aggregated, currently displayed price of a package configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total_price: Decimal,
    pub per_person_price: Decimal,
    pub adults: u32,
    pub children: u32,
}
