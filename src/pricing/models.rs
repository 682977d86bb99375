//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.
//! Columns are nullable upstream; the `From` conversions below are the one
//! place absent values become zero.

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::family::FamilyType;
use super::types::{HotelStay, Package, Travelers, Vehicle};

/// Package from the quote generator `packages` table
#[derive(Debug, Clone, FromRow)]
pub struct PackageRow {
    pub id: Uuid,
    pub package_name: Option<String>,
    pub destination: Option<String>,
    pub gst_percent: Option<Decimal>,
    pub per_person: Option<Decimal>,
    pub no_of_adults: Option<i32>,
    pub no_of_children: Option<i32>,
    pub no_of_infants: Option<i32>,
}

/// Hotel stay from `package_hotels` or `hotel_options`
#[derive(Debug, Clone, FromRow)]
pub struct HotelStayRow {
    pub hotel_id: String,
    pub hotel_name: Option<String>,
    pub room_type: Option<String>,
    pub meal_plan: Option<String>,
    pub no_of_nights: Option<i32>,
    pub adult_price: Option<Decimal>,
    pub child_price: Option<Decimal>,
    pub extra_adult_price: Option<Decimal>,
    pub gst_adult_price: Option<Decimal>,
    pub gst_child_price: Option<Decimal>,
    pub gst_extra_adult_price: Option<Decimal>,
}

/// Vehicle from `package_vehicles` or `vehicle_options`
#[derive(Debug, Clone, FromRow)]
pub struct VehicleRow {
    pub vehicle_id: String,
    pub vehicle_name: Option<String>,
    pub price: Option<Decimal>,
}

/// Family type from the CRM `family_type` table
#[derive(Debug, Clone, FromRow)]
pub struct FamilyTypeRow {
    pub family_id: String,
    pub family_type: Option<String>,
    pub no_of_adults: Option<i32>,
    pub no_of_children: Option<i32>,
    pub no_of_infants: Option<i32>,
}

fn count(value: Option<i32>) -> u32 {
    value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
}

fn amount(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

impl From<HotelStayRow> for HotelStay {
    fn from(row: HotelStayRow) -> Self {
        Self {
            hotel_id: row.hotel_id,
            hotel_name: row.hotel_name.unwrap_or_default(),
            room_type: row.room_type.unwrap_or_default(),
            meal_plan: row.meal_plan.unwrap_or_default(),
            nights: count(row.no_of_nights),
            adult_price: amount(row.adult_price),
            child_price: amount(row.child_price),
            extra_adult_price: amount(row.extra_adult_price),
            gst_adult_price: amount(row.gst_adult_price),
            gst_child_price: amount(row.gst_child_price),
            gst_extra_adult_price: amount(row.gst_extra_adult_price),
        }
    }
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            vehicle_id: row.vehicle_id,
            vehicle_name: row.vehicle_name.unwrap_or_default(),
            price: amount(row.price),
        }
    }
}

impl From<FamilyTypeRow> for FamilyType {
    fn from(row: FamilyTypeRow) -> Self {
        Self {
            name: row.family_type.unwrap_or_else(|| row.family_id.clone()),
            id: row.family_id,
            adults: count(row.no_of_adults),
            children: count(row.no_of_children),
            infants: count(row.no_of_infants),
        }
    }
}

impl PackageRow {
    /// Assemble the package snapshot from its row and line item rows
    pub fn into_package(self, hotels: Vec<HotelStayRow>, vehicles: Vec<VehicleRow>) -> Package {
        Package {
            id: self.id,
            name: self.package_name.unwrap_or_default(),
            destination: self.destination.unwrap_or_default(),
            tax_percent: amount(self.gst_percent),
            // A zero per-person price upstream means "not computed"
            per_person_override: self.per_person.filter(|p| !p.is_zero()),
            travelers: Travelers::new(
                count(self.no_of_adults),
                count(self.no_of_children),
                count(self.no_of_infants),
            ),
            hotels: hotels.into_iter().map(HotelStay::from).collect(),
            vehicles: vehicles.into_iter().map(Vehicle::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hotel_row() -> HotelStayRow {
        HotelStayRow {
            hotel_id: "H1".to_string(),
            hotel_name: Some("Sea Breeze".to_string()),
            room_type: None,
            meal_plan: Some("MAP".to_string()),
            no_of_nights: Some(3),
            adult_price: Some(dec!(10000)),
            child_price: None,
            extra_adult_price: None,
            gst_adult_price: Some(dec!(500)),
            gst_child_price: None,
            gst_extra_adult_price: None,
        }
    }

    #[test]
    fn test_hotel_row_defaults_missing_prices() {
        let stay = HotelStay::from(hotel_row());
        assert_eq!(stay.child_price, dec!(0));
        assert_eq!(stay.room_type, "");
        assert_eq!(stay.nights, 3);
        assert_eq!(stay.price().unwrap(), dec!(10500));
    }

    #[test]
    fn test_negative_counts_become_zero() {
        let row = FamilyTypeRow {
            family_id: "XX".to_string(),
            family_type: None,
            no_of_adults: Some(-1),
            no_of_children: None,
            no_of_infants: Some(1),
        };
        let ft = FamilyType::from(row);
        assert_eq!(ft.name, "XX");
        assert_eq!((ft.adults, ft.children, ft.infants), (0, 0, 1));
    }

    #[test]
    fn test_package_row_assembly() {
        let row = PackageRow {
            id: Uuid::nil(),
            package_name: Some("Kerala Escape".to_string()),
            destination: Some("Kerala".to_string()),
            gst_percent: None,
            per_person: Some(dec!(0)),
            no_of_adults: Some(2),
            no_of_children: Some(1),
            no_of_infants: None,
        };
        let vehicles = vec![VehicleRow {
            vehicle_id: "V1".to_string(),
            vehicle_name: None,
            price: None,
        }];

        let package = row.into_package(vec![hotel_row()], vehicles);
        assert_eq!(package.tax_percent, dec!(0));
        assert_eq!(package.per_person_override, None);
        assert_eq!(package.travelers, Travelers::new(2, 1, 0));
        assert_eq!(package.hotels.len(), 1);
        assert_eq!(package.vehicles[0].price, dec!(0));
    }
}
