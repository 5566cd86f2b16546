//! Amount helpers shared by the allocation calculator and the payment form.
//!
//! All amounts are INR held as `Decimal`. Nothing here fails: out-of-range
//! values are clamped, never rejected.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{CURRENCY_SYMBOL, DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION};

/// Rounds an amount to the stored precision (paise), midpoint away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Floors an amount at zero.
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Clamps `value` into `[min, max]`.
///
/// When the bounds cross (`max < min`) the lower bound wins, so the result is
/// never below `min`.
pub fn clamp_amount(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.min(max).max(min)
}

/// Formats an amount the way the back office displays money: rupee symbol,
/// Indian digit grouping (`12,34,567`) and no fractional digits.
pub fn format_currency(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let grouped = group_indian(&digits);
    if negative {
        format!("-{}{}", CURRENCY_SYMBOL, grouped)
    } else {
        format!("{}{}", CURRENCY_SYMBOL, grouped)
    }
}

/// Formats an optional amount, rendering a missing value as `-`.
pub fn format_optional_currency(amount: Option<Decimal>) -> String {
    amount.map(format_currency).unwrap_or_else(|| "-".to_string())
}

// Last three digits form one group, every group before that has two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
