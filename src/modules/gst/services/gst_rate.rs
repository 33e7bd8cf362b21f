use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Standard Indian GST slabs
pub const STANDARD_GST_RATES: [Decimal; 5] = [
    Decimal::ZERO,
    Decimal::from_parts(5, 0, 0, false, 0),
    Decimal::from_parts(12, 0, 0, false, 0),
    Decimal::from_parts(18, 0, 0, false, 0),
    Decimal::from_parts(28, 0, 0, false, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    Standard,
    Custom,
}

pub fn is_standard_rate(rate: Decimal) -> bool {
    STANDARD_GST_RATES.contains(&rate)
}

/// Classify a rate, or `None` when it is outside [0, 100]
pub fn classify_gst_rate(rate: Decimal) -> Option<RateKind> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return None;
    }

    if is_standard_rate(rate) {
        Some(RateKind::Standard)
    } else {
        Some(RateKind::Custom)
    }
}

/// Without `allow_custom` only the standard slabs are accepted
pub fn validate_gst_rate(rate: Decimal, allow_custom: bool) -> bool {
    match classify_gst_rate(rate) {
        Some(RateKind::Standard) => true,
        Some(RateKind::Custom) => allow_custom,
        None => false,
    }
}

/// `price / (1 + rate/100)`: the tax-exclusive part of a GST-inclusive price
pub fn base_from_inclusive_unit_price(price: Decimal, rate: Decimal) -> Result<Decimal> {
    if rate.is_zero() {
        return Ok(price);
    }

    let divisor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
    price.checked_div(divisor).ok_or_else(|| {
        AppError::computation(format!(
            "Cannot strip {}% GST from inclusive price {}",
            rate, price
        ))
    })
}
