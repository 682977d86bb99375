//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::cache::CacheStats;

use super::calculators::PriceDelta;
use super::emi::{EmiPlan, EmiRounding};
use super::family::FamilyType;
use super::format::format_inr;
use super::services::SwapPreview;
use super::types::{LineItem, LineItemCategory, LineItemSlot, Package, Quote, Travelers};

const CURRENCY: &str = "INR";

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    /// Display string with Indian digit grouping, e.g. `₹1,23,456`
    pub formatted: String,
}

impl MoneyResponse {
    pub fn inr(amount: Decimal) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            formatted: format_inr(amount),
        }
    }
}

/// Response for an EMI plan
#[derive(Debug, Serialize)]
pub struct EmiPlanResponse {
    pub months: u32,
    pub monthly_amount: MoneyResponse,
    pub total_amount: MoneyResponse,
    pub processing_fee: MoneyResponse,
    pub final_installment: MoneyResponse,
    pub rounding: EmiRounding,
}

impl From<&EmiPlan> for EmiPlanResponse {
    fn from(plan: &EmiPlan) -> Self {
        Self {
            months: plan.months,
            monthly_amount: MoneyResponse::inr(plan.monthly_amount),
            total_amount: MoneyResponse::inr(plan.total_amount),
            processing_fee: MoneyResponse::inr(plan.processing_fee),
            final_installment: MoneyResponse::inr(plan.final_installment()),
            rounding: plan.rounding,
        }
    }
}

/// Response listing several EMI plans
#[derive(Debug, Serialize)]
pub struct EmiOptionsResponse {
    pub plans: Vec<EmiPlanResponse>,
}

impl EmiOptionsResponse {
    pub fn new(plans: &[EmiPlan]) -> Self {
        Self {
            plans: plans.iter().map(EmiPlanResponse::from).collect(),
        }
    }
}

/// Response for an aggregated quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub subtotal: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_percent: Decimal,
    pub tax_amount: MoneyResponse,
    pub total_price: MoneyResponse,
    pub per_person_price: MoneyResponse,
    pub adults: u32,
    pub children: u32,
    pub calculated_at: DateTime<Utc>,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        Self {
            subtotal: MoneyResponse::inr(quote.subtotal),
            tax_percent: quote.tax_percent,
            tax_amount: MoneyResponse::inr(quote.tax_amount),
            total_price: MoneyResponse::inr(quote.total_price),
            per_person_price: MoneyResponse::inr(quote.per_person_price),
            adults: quote.adults,
            children: quote.children,
            calculated_at: Utc::now(),
        }
    }
}

/// Response for a price delta
#[derive(Debug, Serialize)]
pub struct DeltaResponse {
    pub previous_price: MoneyResponse,
    pub candidate_price: MoneyResponse,
    pub delta: MoneyResponse,
    pub new_total: MoneyResponse,
    pub is_reduction: bool,
}

impl From<&PriceDelta> for DeltaResponse {
    fn from(delta: &PriceDelta) -> Self {
        Self {
            previous_price: MoneyResponse::inr(delta.previous_price),
            candidate_price: MoneyResponse::inr(delta.candidate_price),
            delta: MoneyResponse::inr(delta.delta),
            new_total: MoneyResponse::inr(delta.new_total),
            is_reduction: delta.is_reduction(),
        }
    }
}

/// Response for family-type detection
#[derive(Debug, Serialize)]
pub struct FamilyTypeResponse {
    pub travelers: Travelers,
    pub family_type: FamilyType,
}

/// Response for a stored package quote
#[derive(Debug, Serialize)]
pub struct PackageQuoteResponse {
    pub package_id: Uuid,
    pub package_name: String,
    pub destination: String,
    pub quote: QuoteResponse,
}

impl PackageQuoteResponse {
    pub fn new(package: &Package, quote: &Quote) -> Self {
        Self {
            package_id: package.id,
            package_name: package.name.clone(),
            destination: package.destination.clone(),
            quote: QuoteResponse::from(quote),
        }
    }
}

/// Response for stored package EMI plans
#[derive(Debug, Serialize)]
pub struct PackageEmiResponse {
    pub package_id: Uuid,
    pub total_price: MoneyResponse,
    pub plans: Vec<EmiPlanResponse>,
}

/// A swappable option with its identifier
#[derive(Debug, Serialize)]
pub struct OptionResponse {
    pub option_id: String,
    pub price: MoneyResponse,
    pub item: LineItem,
}

/// Response listing swap options
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub package_id: Uuid,
    pub category: LineItemCategory,
    pub options: Vec<OptionResponse>,
}

/// Response for a swap preview
#[derive(Debug, Serialize)]
pub struct SwapPreviewResponse {
    pub slot: LineItemSlot,
    pub previous: LineItem,
    pub candidate: LineItem,
    pub delta: DeltaResponse,
    pub quote: QuoteResponse,
}

impl From<SwapPreview> for SwapPreviewResponse {
    fn from(preview: SwapPreview) -> Self {
        Self {
            slot: preview.slot,
            delta: DeltaResponse::from(&preview.delta),
            quote: QuoteResponse::from(&preview.quote),
            previous: preview.previous,
            candidate: preview.candidate,
        }
    }
}

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
}
