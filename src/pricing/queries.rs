//! Database queries for the pricing engine.
//!
//! Packages, their line items and swappable options live in the quote
//! generator database; family types live in the CRM database.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{FamilyTypeRow, HotelStayRow, PackageRow, VehicleRow};

/// All family types in priority order
pub async fn get_family_types(pool: &PgPool) -> Result<Vec<FamilyTypeRow>, AppError> {
    let rows = sqlx::query_as::<_, FamilyTypeRow>(
        r#"
        SELECT family_id, family_type, no_of_adults, no_of_children, no_of_infants
        FROM family_type
        ORDER BY sort_order ASC NULLS LAST, family_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a package by id
pub async fn get_package(pool: &PgPool, package_id: Uuid) -> Result<PackageRow, AppError> {
    sqlx::query_as::<_, PackageRow>(
        r#"
        SELECT
            id, package_name, destination, gst_percent, per_person,
            no_of_adults, no_of_children, no_of_infants
        FROM packages
        WHERE id = $1
          AND deleted_at IS NULL
        "#,
    )
    .bind(package_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Hotel stays included in a package, in itinerary order
pub async fn get_package_hotels(
    pool: &PgPool,
    package_id: Uuid,
) -> Result<Vec<HotelStayRow>, AppError> {
    let rows = sqlx::query_as::<_, HotelStayRow>(
        r#"
        SELECT
            hotel_id, hotel_name, room_type, meal_plan, no_of_nights,
            adult_price, child_price, extra_adult_price,
            gst_adult_price, gst_child_price, gst_extra_adult_price
        FROM package_hotels
        WHERE package_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Vehicles included in a package
pub async fn get_package_vehicles(
    pool: &PgPool,
    package_id: Uuid,
) -> Result<Vec<VehicleRow>, AppError> {
    let rows = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT vehicle_id, vehicle_name, price
        FROM package_vehicles
        WHERE package_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Hotel, room and meal plan combinations offered for a destination
pub async fn get_hotel_options(
    pool: &PgPool,
    destination: &str,
) -> Result<Vec<HotelStayRow>, AppError> {
    let rows = sqlx::query_as::<_, HotelStayRow>(
        r#"
        SELECT
            hotel_id, hotel_name, room_type, meal_plan, no_of_nights,
            adult_price, child_price, extra_adult_price,
            gst_adult_price, gst_child_price, gst_extra_adult_price
        FROM hotel_options
        WHERE destination = $1
          AND is_active = TRUE
        ORDER BY hotel_name ASC, room_type ASC, meal_plan ASC
        "#,
    )
    .bind(destination)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Vehicles offered for a destination
pub async fn get_vehicle_options(
    pool: &PgPool,
    destination: &str,
) -> Result<Vec<VehicleRow>, AppError> {
    let rows = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT vehicle_id, vehicle_name, price
        FROM vehicle_options
        WHERE destination = $1
          AND is_active = TRUE
        ORDER BY price ASC NULLS LAST, vehicle_name ASC
        "#,
    )
    .bind(destination)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
