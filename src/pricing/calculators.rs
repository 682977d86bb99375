//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::services::PricingError;
use super::types::{LineItem, Quote, Travelers};

/// Weight of a child when splitting a package total per person
pub const CHILD_WEIGHT: Decimal = dec!(0.5);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use tripxplo_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round half away from zero to whole rupees.
pub fn round_rupees(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-installment amount of a total split over `months`.
///
/// Always rounds up, so `months * result >= total`. Zero months yields zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use tripxplo_pricing::pricing::monthly_installment;
///
/// assert_eq!(monthly_installment(dec!(28050), 6), dec!(4675));
/// assert_eq!(monthly_installment(dec!(28051), 6), dec!(4676));
/// ```
pub fn monthly_installment(total: Decimal, months: u32) -> Decimal {
    if months == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(months)).ceil()
}

/// Estimated installment: plain division rounded to the nearest rupee.
///
/// Used for indicative figures on listing cards, where a slight
/// under-collection does not matter.
pub fn estimated_installment(total: Decimal, months: u32) -> Decimal {
    if months == 0 {
        return Decimal::ZERO;
    }
    round_rupees(total / Decimal::from(months))
}

/// Signed difference produced by swapping one line item for another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDelta {
    pub previous_price: Decimal,
    pub candidate_price: Decimal,
    pub delta: Decimal,
    pub new_total: Decimal,
}

impl PriceDelta {
    /// A downgrade lowers the total
    pub fn is_reduction(&self) -> bool {
        self.delta.is_sign_negative() && !self.delta.is_zero()
    }
}

/// Compute the price change of replacing `previous` with `candidate`.
///
/// Hotel stays compare the sum of all price and tax components, vehicles
/// compare their flat price. The new total never drops below zero.
pub fn compute_delta(
    previous: &LineItem,
    candidate: &LineItem,
    current_total: Decimal,
) -> Result<PriceDelta, PricingError> {
    if previous.category() != candidate.category() {
        return Err(PricingError::MismatchedLineItems {
            previous: previous.category(),
            candidate: candidate.category(),
        });
    }

    let previous_price = previous.price()?;
    let candidate_price = candidate.price()?;
    let delta = candidate_price
        .checked_sub(previous_price)
        .ok_or(PricingError::AmountOutOfRange("price delta"))?;
    let new_total = current_total
        .checked_add(delta)
        .ok_or(PricingError::AmountOutOfRange("new total"))?;

    Ok(PriceDelta {
        previous_price,
        candidate_price,
        delta,
        new_total: new_total.max(Decimal::ZERO),
    })
}

/// Person count used for per-person pricing: adults plus half-weighted children.
pub fn person_weight(travelers: Travelers) -> Decimal {
    Decimal::from(travelers.adults) + Decimal::from(travelers.children) * CHILD_WEIGHT
}

/// Per-person share of a total, rounded to whole rupees.
///
/// Returns zero when there is nobody to split between.
pub fn per_person_price(total: Decimal, travelers: Travelers) -> Result<Decimal, PricingError> {
    let weight = person_weight(travelers);
    if weight <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    total
        .checked_div(weight)
        .map(round_rupees)
        .ok_or(PricingError::AmountOutOfRange("per-person price"))
}

/// Combine line items and tax into a quote.
///
/// The tax amount is rounded to 2 places before it is added, so
/// `total_price == subtotal + tax_amount` holds exactly. Amounts that
/// leave the `Decimal` range are an error rather than a panic.
pub fn aggregate(
    items: &[LineItem],
    tax_percent: Decimal,
    travelers: Travelers,
    per_person_override: Option<Decimal>,
) -> Result<Quote, PricingError> {
    let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.price()?)
            .ok_or(PricingError::AmountOutOfRange("subtotal"))
    })?;
    let tax_amount = subtotal
        .checked_mul(tax_percent)
        .and_then(|taxed| taxed.checked_div(Decimal::ONE_HUNDRED))
        .map(|tax| round_money(tax, 2))
        .ok_or(PricingError::AmountOutOfRange("tax amount"))?;
    let total_price = subtotal
        .checked_add(tax_amount)
        .ok_or(PricingError::AmountOutOfRange("total price"))?;

    let per_person_price = match per_person_override {
        Some(price) => price,
        None => per_person_price(total_price, travelers)?,
    };

    Ok(Quote {
        subtotal,
        tax_percent,
        tax_amount,
        total_price,
        per_person_price,
        adults: travelers.adults,
        children: travelers.children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::types::{HotelStay, LineItemCategory, Vehicle};

    fn hotel(adult: Decimal, gst_adult: Decimal) -> LineItem {
        LineItem::Hotel(HotelStay {
            hotel_id: "H".to_string(),
            adult_price: adult,
            gst_adult_price: gst_adult,
            ..Default::default()
        })
    }

    fn vehicle(price: Decimal) -> LineItem {
        LineItem::Vehicle(Vehicle {
            vehicle_id: "V".to_string(),
            vehicle_name: "Innova".to_string(),
            price,
        })
    }

    fn aggregate_subtotal(subtotal: Decimal, tax_percent: Decimal, travelers: Travelers) -> Quote {
        aggregate(&[vehicle(subtotal)], tax_percent, travelers, None).unwrap()
    }

    // ==================== installment tests ====================

    #[test]
    fn test_installment_exact_division() {
        assert_eq!(monthly_installment(dec!(28050), 6), dec!(4675));
    }

    #[test]
    fn test_installment_rounds_up() {
        assert_eq!(monthly_installment(dec!(28051), 6), dec!(4676));
    }

    #[test]
    fn test_installment_single_month_is_ceiling() {
        assert_eq!(monthly_installment(dec!(999.01), 1), dec!(1000));
        assert_eq!(monthly_installment(dec!(1000), 1), dec!(1000));
    }

    #[test]
    fn test_installment_never_under_collects() {
        let totals = [dec!(0), dec!(1), dec!(99.99), dec!(28051), dec!(123456.78)];
        for total in totals {
            for months in 1..=16u32 {
                let monthly = monthly_installment(total, months);
                assert!(
                    monthly * Decimal::from(months) >= total,
                    "{} over {} months under-collects",
                    total,
                    months
                );
            }
        }
    }

    #[test]
    fn test_installment_zero_months() {
        assert_eq!(monthly_installment(dec!(1000), 0), dec!(0));
        assert_eq!(estimated_installment(dec!(1000), 0), dec!(0));
    }

    #[test]
    fn test_estimated_installment_rounds_to_nearest() {
        // 28051 / 6 = 4675.1666...
        assert_eq!(estimated_installment(dec!(28051), 6), dec!(4675));
        // 28054 / 6 = 4675.666...
        assert_eq!(estimated_installment(dec!(28054), 6), dec!(4676));
        // 9 / 2 = 4.5 rounds away from zero
        assert_eq!(estimated_installment(dec!(9), 2), dec!(5));
    }

    // ==================== delta tests ====================

    #[test]
    fn test_hotel_swap_delta() {
        let previous = hotel(dec!(10000), dec!(500));
        let candidate = hotel(dec!(12000), dec!(600));

        let delta = compute_delta(&previous, &candidate, dec!(50000)).unwrap();
        assert_eq!(delta.delta, dec!(2100));
        assert_eq!(delta.new_total, dec!(52100));
        assert!(!delta.is_reduction());
    }

    #[test]
    fn test_downgrade_is_a_reduction() {
        let delta = compute_delta(&vehicle(dec!(4500)), &vehicle(dec!(3000)), dec!(20000)).unwrap();
        assert_eq!(delta.delta, dec!(-1500));
        assert_eq!(delta.new_total, dec!(18500));
        assert!(delta.is_reduction());
    }

    #[test]
    fn test_identical_items_have_zero_delta() {
        let item = hotel(dec!(7000), dec!(350));
        let delta = compute_delta(&item, &item.clone(), dec!(31000)).unwrap();
        assert_eq!(delta.delta, dec!(0));
        assert_eq!(delta.new_total, dec!(31000));
        assert!(!delta.is_reduction());
    }

    #[test]
    fn test_new_total_floors_at_zero() {
        let delta = compute_delta(&vehicle(dec!(5000)), &vehicle(dec!(0)), dec!(1000)).unwrap();
        assert_eq!(delta.delta, dec!(-5000));
        assert_eq!(delta.new_total, dec!(0));
    }

    #[test]
    fn test_delta_rejects_mixed_categories() {
        let err = compute_delta(&hotel(dec!(1), dec!(0)), &vehicle(dec!(1)), dec!(0)).unwrap_err();
        assert_eq!(
            err,
            PricingError::MismatchedLineItems {
                previous: LineItemCategory::Hotel,
                candidate: LineItemCategory::Vehicle,
            }
        );
    }

    #[test]
    fn test_delta_out_of_range_is_an_error() {
        let err =
            compute_delta(&vehicle(Decimal::MIN), &vehicle(Decimal::MAX), dec!(0)).unwrap_err();
        assert_eq!(err, PricingError::AmountOutOfRange("price delta"));

        let err = compute_delta(&vehicle(dec!(0)), &vehicle(dec!(10)), Decimal::MAX).unwrap_err();
        assert_eq!(err, PricingError::AmountOutOfRange("new total"));
    }

    // ==================== aggregate tests ====================

    #[test]
    fn test_aggregate_applies_tax() {
        let quote = aggregate_subtotal(dec!(25000), dec!(5), Travelers::new(2, 0, 0));
        assert_eq!(quote.subtotal, dec!(25000));
        assert_eq!(quote.tax_amount, dec!(1250));
        assert_eq!(quote.total_price, dec!(26250));
        assert_eq!(quote.per_person_price, dec!(13125));
    }

    #[test]
    fn test_aggregate_sums_line_items() {
        let items = vec![hotel(dec!(10000), dec!(500)), vehicle(dec!(4500))];
        let quote = aggregate(&items, dec!(0), Travelers::new(2, 0, 0), None).unwrap();
        assert_eq!(quote.subtotal, dec!(15000));
        assert_eq!(quote.total_price, dec!(15000));
    }

    #[test]
    fn test_aggregate_children_count_half() {
        let items = vec![vehicle(dec!(25000))];
        // weight = 2 + 2 * 0.5 = 3
        let quote = aggregate(&items, dec!(0), Travelers::new(2, 2, 1), None).unwrap();
        assert_eq!(quote.per_person_price, dec!(8333));
        assert_eq!(quote.adults, 2);
        assert_eq!(quote.children, 2);
    }

    #[test]
    fn test_aggregate_uses_upstream_per_person() {
        let items = vec![vehicle(dec!(25000))];
        let quote =
            aggregate(&items, dec!(5), Travelers::new(2, 0, 0), Some(dec!(12999))).unwrap();
        assert_eq!(quote.per_person_price, dec!(12999));
    }

    #[test]
    fn test_aggregate_without_travelers() {
        let quote = aggregate_subtotal(dec!(25000), dec!(5), Travelers::default());
        assert_eq!(quote.total_price, dec!(26250));
        assert_eq!(quote.per_person_price, dec!(0));
    }

    #[test]
    fn test_aggregate_rounds_tax_to_paise() {
        let quote = aggregate_subtotal(dec!(999.99), dec!(18), Travelers::new(1, 0, 0));
        // 179.9982 -> 180.00
        assert_eq!(quote.tax_amount, dec!(180.00));
        assert_eq!(quote.total_price, quote.subtotal + quote.tax_amount);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let items = vec![hotel(dec!(10000), dec!(500)), vehicle(dec!(3333.33))];
        let travelers = Travelers::new(3, 1, 0);
        assert_eq!(
            aggregate(&items, dec!(5), travelers, None).unwrap(),
            aggregate(&items, dec!(5), travelers, None).unwrap()
        );
    }

    #[test]
    fn test_aggregate_empty() {
        let quote = aggregate(&[], dec!(5), Travelers::new(2, 0, 0), None).unwrap();
        assert_eq!(quote.total_price, dec!(0));
        assert_eq!(quote.per_person_price, dec!(0));
    }

    #[test]
    fn test_aggregate_subtotal_overflow_is_an_error() {
        let items = vec![vehicle(Decimal::MAX), vehicle(Decimal::MAX)];
        let err = aggregate(&items, dec!(0), Travelers::new(2, 0, 0), None).unwrap_err();
        assert_eq!(err, PricingError::AmountOutOfRange("subtotal"));
    }

    #[test]
    fn test_aggregate_tax_overflow_is_an_error() {
        let items = vec![vehicle(Decimal::MAX)];
        let err = aggregate(&items, dec!(5), Travelers::new(2, 0, 0), None).unwrap_err();
        assert_eq!(err, PricingError::AmountOutOfRange("tax amount"));
    }

    #[test]
    fn test_per_person_overflow_is_an_error() {
        // A lone child weighs 0.5, so the share doubles the total
        let err = per_person_price(Decimal::MAX, Travelers::new(0, 1, 0)).unwrap_err();
        assert_eq!(err, PricingError::AmountOutOfRange("per-person price"));
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
    }

    #[test]
    fn test_round_rupees_half_away_from_zero() {
        assert_eq!(round_rupees(dec!(2.5)), dec!(3));
        assert_eq!(round_rupees(dec!(-2.5)), dec!(-3));
        assert_eq!(round_rupees(dec!(8333.333)), dec!(8333));
    }
}
