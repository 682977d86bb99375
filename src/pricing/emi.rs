//! EMI plans built on top of the installment calculators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::{estimated_installment, monthly_installment};
use super::services::PricingError;

/// Terms offered on every quote card
pub const STANDARD_TERMS: [u32; 3] = [3, 6, 12];

/// Shortest custom term
pub const MIN_TERM_MONTHS: u32 = 3;

/// Longest custom term
pub const MAX_TERM_MONTHS: u32 = 16;

/// How the per-month amount is rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmiRounding {
    /// Round up; the schedule always collects the full total
    #[default]
    Ceiling,
    /// Nearest rupee; for indicative listing prices
    Nearest,
}

/// A derived installment plan for a quote total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmiPlan {
    pub months: u32,
    pub monthly_amount: Decimal,
    pub total_amount: Decimal,
    pub processing_fee: Decimal,
    pub rounding: EmiRounding,
}

impl EmiPlan {
    /// Individual installments.
    ///
    /// Each installment is the monthly amount, capped at what is still owed,
    /// so the last one absorbs any rounding and the schedule sums to the
    /// total. With `Nearest` rounding the final installment may instead be
    /// larger than the others.
    pub fn schedule(&self) -> Vec<Decimal> {
        let mut remaining = self.total_amount;
        let mut installments = Vec::with_capacity(self.months as usize);

        for n in 0..self.months {
            let installment = if n + 1 == self.months {
                remaining
            } else {
                self.monthly_amount.min(remaining)
            };
            remaining -= installment;
            installments.push(installment);
        }

        installments
    }

    /// Amount of the last installment
    pub fn final_installment(&self) -> Decimal {
        self.schedule().last().copied().unwrap_or(Decimal::ZERO)
    }
}

/// Check that `months` is an offered term
pub fn validate_term(months: u32) -> Result<u32, PricingError> {
    if (MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&months) {
        Ok(months)
    } else {
        Err(PricingError::InvalidEmiTerm {
            months,
            min: MIN_TERM_MONTHS,
            max: MAX_TERM_MONTHS,
        })
    }
}

/// Build an EMI plan for `total` over `months`.
///
/// Negative totals are treated as zero.
pub fn emi_plan(total: Decimal, months: u32, rounding: EmiRounding) -> Result<EmiPlan, PricingError> {
    let months = validate_term(months)?;
    let total = total.max(Decimal::ZERO);

    let monthly_amount = match rounding {
        EmiRounding::Ceiling => monthly_installment(total, months),
        EmiRounding::Nearest => estimated_installment(total, months),
    };

    Ok(EmiPlan {
        months,
        monthly_amount,
        total_amount: total,
        processing_fee: Decimal::ZERO,
        rounding,
    })
}

/// Plans for every standard term, shortest first.
pub fn standard_emi_plans(total: Decimal, rounding: EmiRounding) -> Vec<EmiPlan> {
    STANDARD_TERMS
        .iter()
        .filter_map(|&months| emi_plan(total, months, rounding).ok())
        .collect()
}
