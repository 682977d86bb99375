//! Locale-aware display formatting for amounts.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Digit grouping convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberLocale {
    /// en-IN: 12,34,567
    #[default]
    Indian,
    /// en-US: 1,234,567
    International,
}

/// Format `amount` with grouping separators and a fixed number of decimals.
///
/// Rounds half away from zero.
pub fn format_number(amount: Decimal, locale: NumberLocale, fraction_digits: u32) -> String {
    let rounded = amount.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", fraction_digits as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + plain.len() / 2 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a rupee amount for display: `₹12,34,567`, `-₹2,100`.
pub fn format_inr(amount: Decimal) -> String {
    format_currency(amount, "₹", NumberLocale::Indian, 0)
}

/// Format with a currency symbol placed after the sign.
pub fn format_currency(
    amount: Decimal,
    symbol: &str,
    locale: NumberLocale,
    fraction_digits: u32,
) -> String {
    let number = format_number(amount, locale, fraction_digits);
    match number.strip_prefix('-') {
        Some(unsigned) => format!("-{}{}", symbol, unsigned),
        None => format!("{}{}", symbol, number),
    }
}

fn group_digits(digits: &str, locale: NumberLocale) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let group = match locale {
        NumberLocale::Indian => 2,
        NumberLocale::International => 3,
    };

    // Split the head into groups from the right
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(last_three);
    out
}
