//! Price parsing and INR formatting.
//!
//! Prices are rupees per 10 grams. Display formatting follows the Indian
//! numbering system: the last three integer digits form one group, every
//! group above that has two digits (`73,00,000.00`).

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a raw price input.
///
/// Returns `Some` only if the input parses as a decimal and is strictly
/// positive; everything else is rejected.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let value = raw.trim().parse::<Decimal>().ok()?;
    (value > Decimal::ZERO).then_some(value)
}

/// Format a price as Indian Rupees with exactly two fraction digits.
pub fn format_inr(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let text = rounded.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("\u{20B9}{}.{}", group_indian(int_part), frac_part)
}

/// Group integer digits per the Indian numbering system.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
