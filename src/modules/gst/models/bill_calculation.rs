use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Computed figures for one line item.
///
/// Intermediate amounts keep full decimal precision so that bill totals can be
/// summed first and rounded once; only `final_total` is rounded to paise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCalculation {
    /// Unit price with any embedded GST stripped
    pub unit_price_base: Decimal,
    /// unit_price × quantity as entered (tax-inclusive in INCLUSIVE mode)
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    /// Post-discount, pre-tax amount GST is charged on
    pub taxable_amount: Decimal,
    /// Rate actually applied (0 on NON_GST bills)
    pub gst_rate_percent: Decimal,
    pub cgst_rate_percent: Decimal,
    pub sgst_rate_percent: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub gst_amount: Decimal,
    /// taxable_amount + gst_amount, rounded to 2 decimal places
    pub final_total: Decimal,
}

/// Rate-wise aggregate, rounded to 2 decimal places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstSummaryEntry {
    pub taxable_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub total_gst: Decimal,
    pub final_total: Decimal,
}

/// Bill-level totals, each summed at full precision and rounded once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillTotals {
    pub total_taxable_amount: Decimal,
    pub total_discount_amount: Decimal,
    pub total_cgst_amount: Decimal,
    pub total_sgst_amount: Decimal,
    pub total_gst_amount: Decimal,
    pub grand_total: Decimal,
    /// Keyed by effective GST rate; the 0% bucket is always kept
    pub gst_summary: BTreeMap<Decimal, GstSummaryEntry>,
}

/// Result of calculating a whole bill; `lines` follows input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillCalculation {
    pub lines: Vec<LineCalculation>,
    pub totals: BillTotals,
}
