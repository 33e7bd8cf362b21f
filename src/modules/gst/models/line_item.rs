// A line item is one row of a bill as the shopkeeper entered it: a resolved
// unit price and GST rate (prefilled from the product catalog), a quantity and
// an optional discount. Line items are inputs only; they are never mutated by
// the calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Whether a bill carries GST at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum BillGstType {
    #[default]
    Gst,
    /// Every line is billed at 0% regardless of its stored rate
    NonGst,
}

/// Whether unit prices already contain GST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum GstMode {
    Inclusive,
    #[default]
    Exclusive,
}

impl fmt::Display for BillGstType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillGstType::Gst => write!(f, "GST"),
            BillGstType::NonGst => write!(f, "NON_GST"),
        }
    }
}

impl FromStr for BillGstType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "GST" => Ok(BillGstType::Gst),
            "NON_GST" | "NONGST" => Ok(BillGstType::NonGst),
            _ => Err(format!("Invalid bill GST type: {}", s)),
        }
    }
}

impl TryFrom<String> for BillGstType {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for GstMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GstMode::Inclusive => write!(f, "INCLUSIVE"),
            GstMode::Exclusive => write!(f, "EXCLUSIVE"),
        }
    }
}

impl FromStr for GstMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCLUSIVE" => Ok(GstMode::Inclusive),
            "EXCLUSIVE" => Ok(GstMode::Exclusive),
            _ => Err(format!("Invalid GST mode: {}. Must be INCLUSIVE or EXCLUSIVE", s)),
        }
    }
}

impl TryFrom<String> for GstMode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Bill-level tax settings, passed explicitly into every calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillTaxConfig {
    pub bill_gst_type: BillGstType,
    pub gst_mode: GstMode,
}

impl BillTaxConfig {
    pub fn new(bill_gst_type: BillGstType, gst_mode: GstMode) -> Self {
        Self {
            bill_gst_type,
            gst_mode,
        }
    }

    pub fn exclusive() -> Self {
        Self::new(BillGstType::Gst, GstMode::Exclusive)
    }

    pub fn inclusive() -> Self {
        Self::new(BillGstType::Gst, GstMode::Inclusive)
    }

    pub fn non_gst() -> Self {
        Self::new(BillGstType::NonGst, GstMode::Exclusive)
    }

    /// Rate actually charged on a line: NON_GST bills override every rate to 0
    pub fn effective_rate(&self, stored_rate: Decimal) -> Decimal {
        match self.bill_gst_type {
            BillGstType::Gst => stored_rate,
            BillGstType::NonGst => Decimal::ZERO,
        }
    }

    /// Whether tax embedded in the price has to be stripped before discounting
    pub fn strips_inclusive_tax(&self, effective_rate: Decimal) -> bool {
        self.bill_gst_type == BillGstType::Gst
            && self.gst_mode == GstMode::Inclusive
            && effective_rate > Decimal::ZERO
    }
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// Represents a single row of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Price per unit, tax-inclusive or exclusive depending on the bill's mode
    #[serde(alias = "price")]
    pub unit_price: Decimal,

    /// Quantity sold; fractional quantities (weights, lengths) are allowed
    #[serde(alias = "qty", default = "default_quantity")]
    pub quantity: Decimal,

    /// Discount percentage in [0, 100], applied before tax
    #[serde(default)]
    pub discount_percent: Decimal,

    /// GST rate percentage in [0, 100]
    #[serde(alias = "gst_rate", default)]
    pub gst_rate_percent: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// HSN/SAC classification code, echoed back for invoice printing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
}

impl LineItem {
    pub fn new(unit_price: Decimal, quantity: Decimal, gst_rate_percent: Decimal) -> Self {
        Self {
            unit_price,
            quantity,
            discount_percent: Decimal::ZERO,
            gst_rate_percent,
            product_name: None,
            hsn_code: None,
        }
    }

    pub fn with_discount(mut self, discount_percent: Decimal) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    /// Validate every field; `line_no` is 1-based and only used in messages
    pub fn validate(&self, line_no: usize) -> Result<()> {
        Self::validate_unit_price(line_no, self.unit_price)?;
        Self::validate_quantity(line_no, self.quantity)?;
        Self::validate_percent(line_no, "Discount percent", self.discount_percent)?;
        Self::validate_percent(line_no, "GST rate", self.gst_rate_percent)?;

        Ok(())
    }

    fn validate_unit_price(line_no: usize, unit_price: Decimal) -> Result<()> {
        if unit_price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Line {}: unit price must be non-negative, got: {}",
                line_no, unit_price
            )));
        }

        Ok(())
    }

    fn validate_quantity(line_no: usize, quantity: Decimal) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Line {}: quantity must be greater than 0, got: {}",
                line_no, quantity
            )));
        }

        Ok(())
    }

    fn validate_percent(line_no: usize, field: &str, value: Decimal) -> Result<()> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(AppError::validation(format!(
                "Line {}: {} must be between 0 and 100, got: {}",
                line_no, field, value
            )));
        }

        Ok(())
    }
}
