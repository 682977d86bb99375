//! Quote pricing engine for travel packages.
//!
//! Pure calculators (EMI, family-type matching, swap deltas, quote
//! aggregation, display formatting) plus the services and HTTP routes that
//! feed them package snapshots from the quote and CRM databases.

pub mod calculators;
pub mod emi;
pub mod family;
pub mod format;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod types;

// Re-export commonly used items
pub use calculators::{aggregate, compute_delta, monthly_installment, round_money, PriceDelta};
pub use emi::{emi_plan, EmiPlan, EmiRounding};
pub use family::{match_family_type, FamilyType};
pub use format::{format_inr, NumberLocale};
pub use routes::router;
pub use services::{PricingError, SwapPreview};
pub use types::{HotelStay, LineItem, LineItemSlot, Package, Quote, Travelers, Vehicle};
