//! HTTP routes for the pricing engine.
//!
//! `/api/pricing/*` endpoints are pure: they price whatever the client posts.
//! `/api/packages/*` endpoints load package snapshots from the quote database.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::AppState;

use super::calculators::{aggregate, compute_delta};
use super::emi::{emi_plan, standard_emi_plans};
use super::requests::{
    DeltaRequest, EmiOptionsRequest, EmiRequest, FamilyTypeRequest, PackageEmiQuery,
    QuoteRequest, SwapRequest,
};
use super::responses::{
    DeltaResponse, EmiOptionsResponse, EmiPlanResponse, FamilyTypeResponse, MoneyResponse,
    OptionResponse, OptionsResponse, PackageEmiResponse, PackageQuoteResponse, QuoteResponse,
    SwapPreviewResponse,
};
use super::services::{self, PricingError};
use super::types::LineItemCategory;

/// Pricing API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/emi", post(calculate_emi))
        .route("/api/pricing/emi/options", post(emi_options))
        .route("/api/pricing/quote", post(calculate_quote))
        .route("/api/pricing/delta", post(calculate_delta))
        .route("/api/pricing/family-type", post(family_type))
        .route("/api/packages/:package_id/quote", get(package_quote))
        .route("/api/packages/:package_id/emi", get(package_emi))
        .route("/api/packages/:package_id/options/:category", get(package_options))
        .route("/api/packages/:package_id/swap", post(package_swap))
}

/// EMI plan for a posted total
pub async fn calculate_emi(AppJson(req): AppJson<EmiRequest>) -> Result<Json<EmiPlanResponse>> {
    let plan = emi_plan(req.total_price, req.months, req.rounding)?;
    Ok(Json(EmiPlanResponse::from(&plan)))
}

/// Standard EMI plans for a posted total
pub async fn emi_options(AppJson(req): AppJson<EmiOptionsRequest>) -> Json<EmiOptionsResponse> {
    let plans = standard_emi_plans(req.total_price, req.rounding);
    Json(EmiOptionsResponse::new(&plans))
}

/// Quote for posted line items
pub async fn calculate_quote(
    AppJson(req): AppJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote = aggregate(&req.line_items, req.tax_percent, req.travelers(), req.per_person)?;
    Ok(Json(QuoteResponse::from(&quote)))
}

/// Delta between two posted line items
pub async fn calculate_delta(
    AppJson(req): AppJson<DeltaRequest>,
) -> Result<Json<DeltaResponse>> {
    let delta = compute_delta(&req.previous, &req.candidate, req.current_total)?;
    Ok(Json(DeltaResponse::from(&delta)))
}

/// Family type for posted traveler counts
async fn family_type(
    State(state): State<AppState>,
    AppJson(travelers): AppJson<FamilyTypeRequest>,
) -> Json<FamilyTypeResponse> {
    let family_type = services::detect_family_type(&state.crm, &state.cache, travelers).await;
    Json(FamilyTypeResponse {
        travelers,
        family_type,
    })
}

/// Quote of a stored package
async fn package_quote(
    State(state): State<AppState>,
    AppPath(package_id): AppPath<Uuid>,
) -> Result<Json<PackageQuoteResponse>> {
    let package = services::load_package(&state.quotes, &state.cache, package_id).await?;
    let quote = services::quote_package(&package)?;
    Ok(Json(PackageQuoteResponse::new(&package, &quote)))
}

/// EMI plans of a stored package
async fn package_emi(
    State(state): State<AppState>,
    AppPath(package_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<PackageEmiQuery>,
) -> Result<Json<PackageEmiResponse>> {
    let (quote, plans) = services::package_emi_plans(
        &state.quotes,
        &state.cache,
        package_id,
        query.months,
        query.rounding,
    )
    .await?;

    Ok(Json(PackageEmiResponse {
        package_id,
        total_price: MoneyResponse::inr(quote.total_price),
        plans: plans.iter().map(EmiPlanResponse::from).collect(),
    }))
}

/// Swap options for a stored package
async fn package_options(
    State(state): State<AppState>,
    AppPath((package_id, category)): AppPath<(Uuid, String)>,
) -> Result<Json<OptionsResponse>> {
    let category: LineItemCategory = category.parse()?;
    let package = services::load_package(&state.quotes, &state.cache, package_id).await?;
    let options = services::swap_options(&state.quotes, &package, category).await?;

    let options = options
        .into_iter()
        .map(|item| -> std::result::Result<OptionResponse, PricingError> {
            Ok(OptionResponse {
                option_id: services::option_id_of(&item),
                price: MoneyResponse::inr(item.price()?),
                item,
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Json(OptionsResponse {
        package_id,
        category,
        options,
    }))
}

/// Swap preview for a stored package
async fn package_swap(
    State(state): State<AppState>,
    AppPath(package_id): AppPath<Uuid>,
    AppJson(req): AppJson<SwapRequest>,
) -> Result<Json<SwapPreviewResponse>> {
    let preview = services::preview_swap(
        &state.quotes,
        &state.cache,
        package_id,
        req.slot,
        &req.option_id,
    )
    .await?;

    Ok(Json(SwapPreviewResponse::from(preview)))
}
