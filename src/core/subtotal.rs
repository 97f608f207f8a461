use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::utils::error::{FormError, Result};

/// Parses the raw quantity field like a browser's `parseInt`: optional sign,
/// then the leading digit run; the rest is ignored (`"2.5"` → 2, `"3abc"` → 3).
/// No digits at all counts as 0. Digit runs beyond `i64` saturate.
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -value
    } else {
        value
    }
}

/// Quantities of zero or less become 1. Quantities that do not fit the
/// form's integer field are rejected instead of truncated.
pub fn clamp_quantity(quantity: i64) -> Result<u32> {
    if quantity <= 0 {
        return Ok(1);
    }
    u32::try_from(quantity).map_err(|_| FormError::ValidationError {
        message: format!("Quantity {} is too large", quantity),
    })
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `unit_price × quantity` rounded to cents. Fails when the product does not
/// fit a `Decimal`.
pub fn subtotal(unit_price: Decimal, quantity: u32) -> Result<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round_money)
        .ok_or_else(|| FormError::ValidationError {
            message: format!("Subtotal of {} x {} is too large", quantity, unit_price),
        })
}

/// Two decimal places, always: `4.5` → `"4.50"`.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// Reads a price from the lookup response. Missing or null prices count as zero,
/// numbers and numeric strings are accepted, negative prices are rejected.
pub fn parse_price(value: Option<&serde_json::Value>) -> Result<Decimal> {
    let price = match value {
        None | Some(serde_json::Value::Null) => Decimal::ZERO,
        Some(serde_json::Value::Number(n)) => decimal_from_str(&n.to_string())?,
        Some(serde_json::Value::String(s)) => decimal_from_str(s.trim())?,
        Some(other) => {
            return Err(FormError::InvalidResponseError {
                message: format!("price is not a number: {}", other),
            })
        }
    };

    if price.is_sign_negative() && !price.is_zero() {
        return Err(FormError::InvalidResponseError {
            message: format!("price is negative: {}", price),
        });
    }
    Ok(price)
}

fn decimal_from_str(s: &str) -> Result<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| FormError::InvalidResponseError {
            message: format!("price '{}' is not a decimal: {}", s, e),
        })
}
