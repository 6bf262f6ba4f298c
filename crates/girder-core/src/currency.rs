//! Indian-rupee currency formatting for generated reports.
//!
//! All report artifacts use the en-IN convention: `₹` symbol, zero decimal
//! places, and Indian digit grouping (last three digits, then groups of two):
//! `₹12,34,567`. Generated documents must stay bit-compatible across releases.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as `₹12,34,567`. Rounds to whole rupees, half away from zero.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative();
    let whole = rounded.abs().to_i128().unwrap_or(0);

    let digits = whole.to_string();
    let grouped = group_indian(&digits);

    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let head_bytes = head.as_bytes();
    let mut end = head_bytes.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_amounts_have_no_grouping() {
        assert_eq!(format_inr(Decimal::from(0)), "₹0");
        assert_eq!(format_inr(Decimal::from(800)), "₹800");
    }

    #[test]
    fn indian_grouping_applies_above_one_thousand() {
        assert_eq!(format_inr(Decimal::from(1_500)), "₹1,500");
        assert_eq!(format_inr(Decimal::from(150_000)), "₹1,50,000");
        assert_eq!(format_inr(Decimal::from(1_234_567)), "₹12,34,567");
        assert_eq!(format_inr(Decimal::from(123_456_789)), "₹12,34,56,789");
    }

    #[test]
    fn rounds_to_whole_rupees() {
        assert_eq!(format_inr(Decimal::new(9996, 1)), "₹1,000");
        assert_eq!(format_inr(Decimal::new(9994, 1)), "₹999");
    }

    #[test]
    fn negative_amounts_keep_grouping() {
        assert_eq!(format_inr(Decimal::from(-150_000)), "-₹1,50,000");
    }
}
