//! Pricing service functions with database access.
//!
//! These functions load package snapshots and reference data through the
//! cache and hand them to the pure calculators.

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::calculators::{aggregate, compute_delta, PriceDelta};
use super::emi::{emi_plan, standard_emi_plans, EmiPlan, EmiRounding};
use super::family::{match_family_type, FamilyType};
use super::queries;
use super::types::{
    HotelStay, LineItem, LineItemCategory, LineItemSlot, Package, Quote, Travelers, Vehicle,
};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("EMI term of {months} months is outside {min}..={max}")]
    InvalidEmiTerm { months: u32, min: u32, max: u32 },

    #[error("Cannot swap a {previous} for a {candidate}")]
    MismatchedLineItems {
        previous: LineItemCategory,
        candidate: LineItemCategory,
    },

    #[error("No line item at {0:?}")]
    UnknownLineItem(LineItemSlot),

    #[error("Unknown option category '{0}'")]
    UnknownCategory(String),

    #[error("No {category} option '{option_id}' for this package")]
    UnknownOption {
        category: LineItemCategory,
        option_id: String,
    },

    #[error("Amount out of range while computing {0}")]
    AmountOutOfRange(&'static str),
}

impl PricingError {
    /// Stable label for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::InvalidEmiTerm { .. } => "invalid_emi_term",
            PricingError::MismatchedLineItems { .. } => "mismatched_line_items",
            PricingError::UnknownLineItem(_) => "unknown_line_item",
            PricingError::UnknownCategory(_) => "unknown_category",
            PricingError::UnknownOption { .. } => "unknown_option",
            PricingError::AmountOutOfRange(_) => "amount_out_of_range",
        }
    }
}

/// Result of a swap preview
#[derive(Debug, Clone)]
pub struct SwapPreview {
    pub slot: LineItemSlot,
    pub previous: LineItem,
    pub candidate: LineItem,
    pub delta: PriceDelta,
    /// Full quote of the package with the candidate in place
    pub quote: Quote,
}

/// Quote of a package snapshot
pub fn quote_package(package: &Package) -> Result<Quote, PricingError> {
    aggregate(
        &package.line_items(),
        package.tax_percent,
        package.travelers,
        package.per_person_override,
    )
}

/// Compute the effect of putting `candidate` into `slot`.
///
/// The delta is applied to the current total; the swapped package is
/// re-aggregated separately so the tax on the delta is reflected in `quote`.
pub fn preview_swap_in(
    package: &Package,
    slot: LineItemSlot,
    candidate: LineItem,
) -> Result<SwapPreview, PricingError> {
    let previous = package.line_item(slot)?;
    let current = quote_package(package)?;
    let delta = compute_delta(&previous, &candidate, current.total_price)?;

    let swapped = package.swap(slot, candidate.clone())?;
    // The upstream per-person figure is only valid for the original selection
    let quote = aggregate(
        &swapped.line_items(),
        swapped.tax_percent,
        swapped.travelers,
        None,
    )?;

    Ok(SwapPreview {
        slot,
        previous,
        candidate,
        delta,
        quote,
    })
}

/// Load a package snapshot, through the cache.
pub async fn load_package(
    pool: &PgPool,
    cache: &AppCache,
    package_id: Uuid,
) -> Result<Arc<Package>, AppError> {
    if let Some(cached) = cache.packages.get(&package_id).await {
        tracing::debug!("Cache HIT for package: {}", package_id);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for package: {}", package_id);
    let row = queries::get_package(pool, package_id).await?;
    let hotels = queries::get_package_hotels(pool, package_id).await?;
    let vehicles = queries::get_package_vehicles(pool, package_id).await?;

    let package = Arc::new(row.into_package(hotels, vehicles));
    cache.packages.insert(package_id, package.clone()).await;

    Ok(package)
}

/// The family-type table, or an empty table if the CRM is unavailable.
pub async fn family_type_table(crm: &PgPool, cache: &AppCache) -> Arc<Vec<FamilyType>> {
    if let Some(table) = cache.get_family_types().await {
        return table;
    }

    match queries::get_family_types(crm).await {
        Ok(rows) => {
            let table: Vec<FamilyType> = rows.into_iter().map(FamilyType::from).collect();
            cache.set_family_types(table.clone()).await;
            Arc::new(table)
        }
        Err(e) => {
            tracing::warn!("Family type table unavailable, using fallback: {}", e);
            Arc::new(Vec::new())
        }
    }
}

/// Match traveler counts against the CRM family-type table
pub async fn detect_family_type(crm: &PgPool, cache: &AppCache, travelers: Travelers) -> FamilyType {
    let table = family_type_table(crm, cache).await;
    match_family_type(travelers.adults, travelers.children, travelers.infants, &table)
}

/// EMI plans for a stored package.
///
/// `months` selects a single custom term; otherwise the standard terms are
/// returned.
pub async fn package_emi_plans(
    pool: &PgPool,
    cache: &AppCache,
    package_id: Uuid,
    months: Option<u32>,
    rounding: EmiRounding,
) -> Result<(Quote, Vec<EmiPlan>), AppError> {
    let package = load_package(pool, cache, package_id).await?;
    let quote = quote_package(&package)?;

    let plans = match months {
        Some(months) => vec![emi_plan(quote.total_price, months, rounding)?],
        None => standard_emi_plans(quote.total_price, rounding),
    };

    Ok((quote, plans))
}

/// Options a package's line items of `category` can be swapped for
pub async fn swap_options(
    pool: &PgPool,
    package: &Package,
    category: LineItemCategory,
) -> Result<Vec<LineItem>, AppError> {
    let options: Vec<LineItem> = match category {
        LineItemCategory::Hotel => queries::get_hotel_options(pool, &package.destination)
            .await?
            .into_iter()
            .map(|row| LineItem::Hotel(HotelStay::from(row)))
            .collect(),
        LineItemCategory::Vehicle => queries::get_vehicle_options(pool, &package.destination)
            .await?
            .into_iter()
            .map(|row| LineItem::Vehicle(Vehicle::from(row)))
            .collect(),
    };

    tracing::debug!(
        "Found {} {} options for {}",
        options.len(),
        category.as_str(),
        package.destination
    );
    Ok(options)
}

/// Preview swapping the line item at `slot` of a stored package for the
/// option identified by `option_id`.
pub async fn preview_swap(
    pool: &PgPool,
    cache: &AppCache,
    package_id: Uuid,
    slot: LineItemSlot,
    option_id: &str,
) -> Result<SwapPreview, AppError> {
    let package = load_package(pool, cache, package_id).await?;
    let category = slot.category();

    let candidate = swap_options(pool, &package, category)
        .await?
        .into_iter()
        .find(|option| option_id_of(option) == option_id)
        .ok_or_else(|| PricingError::UnknownOption {
            category,
            option_id: option_id.to_string(),
        })?;

    let preview = preview_swap_in(&package, slot, candidate)?;
    tracing::info!(
        "Swap preview for {} {:?}: delta {} new total {}",
        package_id,
        slot,
        preview.delta.delta,
        preview.delta.new_total
    );
    Ok(preview)
}

/// Identifier a client uses to pick an option.
///
/// Hotels combine hotel, room type and meal plan since one hotel is offered
/// with several rooms and plans.
pub fn option_id_of(item: &LineItem) -> String {
    match item {
        LineItem::Hotel(stay) => format!("{}:{}:{}", stay.hotel_id, stay.room_type, stay.meal_plan),
        LineItem::Vehicle(vehicle) => vehicle.vehicle_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn package() -> Package {
        Package {
            id: Uuid::nil(),
            name: "Manali Family Trip".to_string(),
            destination: "Manali".to_string(),
            tax_percent: dec!(5),
            per_person_override: Some(dec!(11000)),
            travelers: Travelers::new(2, 0, 0),
            hotels: vec![HotelStay {
                hotel_id: "H1".to_string(),
                hotel_name: "Snow Peak".to_string(),
                room_type: "Deluxe".to_string(),
                meal_plan: "CP".to_string(),
                nights: 3,
                adult_price: dec!(10000),
                gst_adult_price: dec!(500),
                ..Default::default()
            }],
            vehicles: vec![Vehicle {
                vehicle_id: "V1".to_string(),
                vehicle_name: "Sedan".to_string(),
                price: dec!(4500),
            }],
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidEmiTerm {
            months: 24,
            min: 3,
            max: 16,
        };
        assert!(err.to_string().contains("24"));

        let err = PricingError::MismatchedLineItems {
            previous: LineItemCategory::Hotel,
            candidate: LineItemCategory::Vehicle,
        };
        assert_eq!(err.to_string(), "Cannot swap a hotel for a vehicle");

        let err = PricingError::UnknownOption {
            category: LineItemCategory::Vehicle,
            option_id: "V9".to_string(),
        };
        assert!(err.to_string().contains("V9"));

        let err = PricingError::AmountOutOfRange("tax amount");
        assert_eq!(err.kind(), "amount_out_of_range");
        assert!(err.to_string().contains("tax amount"));
    }

    #[test]
    fn test_quote_package() {
        let quote = quote_package(&package()).unwrap();
        // 10500 + 4500 = 15000, 5% tax
        assert_eq!(quote.subtotal, dec!(15000));
        assert_eq!(quote.tax_amount, dec!(750));
        assert_eq!(quote.total_price, dec!(15750));
        assert_eq!(quote.per_person_price, dec!(11000));
    }

    #[test]
    fn test_preview_swap_hotel_upgrade() {
        let candidate = LineItem::Hotel(HotelStay {
            hotel_id: "H2".to_string(),
            adult_price: dec!(12000),
            gst_adult_price: dec!(600),
            ..Default::default()
        });

        let preview = preview_swap_in(&package(), LineItemSlot::Hotel(0), candidate).unwrap();
        assert_eq!(preview.delta.delta, dec!(2100));
        assert_eq!(preview.delta.new_total, dec!(17850));
        // Re-aggregated: 12600 + 4500 = 17100 plus 5%
        assert_eq!(preview.quote.subtotal, dec!(17100));
        assert_eq!(preview.quote.total_price, dec!(17955));
        assert_eq!(preview.quote.per_person_price, dec!(8978));
    }

    #[test]
    fn test_preview_swap_vehicle_downgrade() {
        let candidate = LineItem::Vehicle(Vehicle {
            vehicle_id: "V0".to_string(),
            vehicle_name: "Hatchback".to_string(),
            price: dec!(3000),
        });

        let preview = preview_swap_in(&package(), LineItemSlot::Vehicle(0), candidate).unwrap();
        assert!(preview.delta.is_reduction());
        assert_eq!(preview.delta.new_total, dec!(14250));
    }

    #[test]
    fn test_preview_swap_out_of_range_candidate() {
        let candidate = LineItem::Vehicle(Vehicle {
            vehicle_id: "V9".to_string(),
            vehicle_name: "Coach".to_string(),
            price: rust_decimal::Decimal::MAX,
        });

        let err = preview_swap_in(&package(), LineItemSlot::Vehicle(0), candidate).unwrap_err();
        assert_eq!(err.kind(), "amount_out_of_range");
    }

    #[test]
    fn test_preview_swap_unknown_slot() {
        let err = preview_swap_in(
            &package(),
            LineItemSlot::Hotel(3),
            LineItem::Hotel(HotelStay::default()),
        )
        .unwrap_err();
        assert_eq!(err, PricingError::UnknownLineItem(LineItemSlot::Hotel(3)));
    }

    #[test]
    fn test_option_ids() {
        let package = package();
        assert_eq!(
            option_id_of(&LineItem::Hotel(package.hotels[0].clone())),
            "H1:Deluxe:CP"
        );
        assert_eq!(option_id_of(&LineItem::Vehicle(package.vehicles[0].clone())), "V1");
    }
}
