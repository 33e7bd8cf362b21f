use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::GstConfig;
use crate::core::error::AppError;
use crate::core::{percent_of, round_money, Result};
use crate::modules::gst::models::{
    BillCalculation, BillTaxConfig, BillTotals, GstSummaryEntry, LineCalculation, LineItem,
};
use crate::modules::gst::services::gst_rate::{base_from_inclusive_unit_price, is_standard_rate};

const TWO: Decimal = Decimal::TWO;

/// BillCalculator computes per-line GST figures and bill totals.
///
/// Discount is always taken off the tax-exclusive base: in INCLUSIVE mode the
/// embedded GST is stripped from `unit_price × quantity` first, then the
/// discount, then GST is charged on what remains. Aggregates are summed at
/// full precision and rounded once.
#[derive(Debug, Clone)]
pub struct BillCalculator {
    allow_custom_rates: bool,
}

impl BillCalculator {
    pub fn new() -> Self {
        Self {
            allow_custom_rates: true,
        }
    }

    /// Only accept the standard GST slabs
    pub fn standard_rates_only() -> Self {
        Self {
            allow_custom_rates: false,
        }
    }

    pub fn from_config(config: &GstConfig) -> Self {
        Self {
            allow_custom_rates: config.allow_custom_rates,
        }
    }

    /// Calculate every line and the bill totals.
    ///
    /// All lines are validated before anything is computed, so a failure never
    /// yields partial results. An empty bill is valid and totals to zero.
    pub fn calculate(&self, lines: &[LineItem], config: BillTaxConfig) -> Result<BillCalculation> {
        for (idx, line) in lines.iter().enumerate() {
            self.validate_line(idx + 1, line)?;
        }

        let calculated = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| Self::calculate_line(idx + 1, line, config))
            .collect::<Result<Vec<_>>>()?;

        let totals = Self::aggregate(&calculated)?;

        tracing::debug!(
            lines = calculated.len(),
            bill_gst_type = %config.bill_gst_type,
            gst_mode = %config.gst_mode,
            grand_total = %totals.grand_total,
            "Bill calculated"
        );

        Ok(BillCalculation {
            lines: calculated,
            totals,
        })
    }

    /// EXCLUSIVE-mode GST calculation, used as the degraded-mode estimate when
    /// the bill's real tax configuration is unavailable
    pub fn estimate_exclusive(&self, lines: &[LineItem]) -> Result<BillCalculation> {
        self.calculate(lines, BillTaxConfig::exclusive())
    }

    fn validate_line(&self, line_no: usize, line: &LineItem) -> Result<()> {
        line.validate(line_no)?;

        if !self.allow_custom_rates && !is_standard_rate(line.gst_rate_percent) {
            return Err(AppError::validation(format!(
                "Line {}: GST rate {} is not a standard rate (0, 5, 12, 18, 28)",
                line_no, line.gst_rate_percent
            )));
        }

        Ok(())
    }

    /// Calculate a single, already validated line
    pub fn calculate_line(
        line_no: usize,
        line: &LineItem,
        config: BillTaxConfig,
    ) -> Result<LineCalculation> {
        let overflow = |what: &str| {
            AppError::computation(format!("Line {}: {} is out of range", line_no, what))
        };

        let rate = config.effective_rate(line.gst_rate_percent);

        let base_amount = line
            .unit_price
            .checked_mul(line.quantity)
            .ok_or_else(|| overflow("base amount"))?;

        let (pre_discount, unit_price_base) = if config.strips_inclusive_tax(rate) {
            (
                base_from_inclusive_unit_price(base_amount, rate)?,
                base_from_inclusive_unit_price(line.unit_price, rate)?,
            )
        } else {
            (base_amount, line.unit_price)
        };

        let discount_amount = percent_of(pre_discount, line.discount_percent)
            .ok_or_else(|| overflow("discount amount"))?;
        let taxable_amount = pre_discount
            .checked_sub(discount_amount)
            .ok_or_else(|| overflow("taxable amount"))?;

        let half_gst = percent_of(taxable_amount, rate)
            .ok_or_else(|| overflow("GST amount"))?
            / TWO;
        let gst_amount = half_gst + half_gst;

        let raw_total = taxable_amount
            .checked_add(gst_amount)
            .ok_or_else(|| overflow("line total"))?;

        let half_rate = rate / TWO;

        Ok(LineCalculation {
            unit_price_base,
            base_amount,
            discount_amount,
            taxable_amount,
            gst_rate_percent: rate,
            cgst_rate_percent: half_rate,
            sgst_rate_percent: half_rate,
            cgst_amount: half_gst,
            sgst_amount: half_gst,
            gst_amount,
            final_total: round_money(raw_total),
        })
    }

    fn aggregate(lines: &[LineCalculation]) -> Result<BillTotals> {
        let mut bill = Accumulator::default();
        let mut by_rate: BTreeMap<Decimal, Accumulator> = BTreeMap::new();

        for line in lines {
            bill.add(line)?;
            by_rate
                .entry(line.gst_rate_percent.normalize())
                .or_default()
                .add(line)?;
        }

        let gst_summary = by_rate
            .into_iter()
            .map(|(rate, acc)| acc.summary_entry().map(|entry| (rate, entry)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(BillTotals {
            total_taxable_amount: round_money(bill.taxable),
            total_discount_amount: round_money(bill.discount),
            total_cgst_amount: round_money(bill.cgst),
            total_sgst_amount: round_money(bill.sgst),
            total_gst_amount: round_money(bill.gst),
            grand_total: round_money(bill.raw_total()?),
            gst_summary,
        })
    }
}

impl Default for BillCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Running full-precision sums over a set of lines
#[derive(Debug, Default)]
struct Accumulator {
    taxable: Decimal,
    discount: Decimal,
    cgst: Decimal,
    sgst: Decimal,
    gst: Decimal,
}

impl Accumulator {
    fn add(&mut self, line: &LineCalculation) -> Result<()> {
        let sum = |acc: Decimal, value: Decimal| {
            acc.checked_add(value)
                .ok_or_else(|| AppError::computation("Bill total is out of range"))
        };

        self.taxable = sum(self.taxable, line.taxable_amount)?;
        self.discount = sum(self.discount, line.discount_amount)?;
        self.cgst = sum(self.cgst, line.cgst_amount)?;
        self.sgst = sum(self.sgst, line.sgst_amount)?;
        self.gst = sum(self.gst, line.gst_amount)?;

        Ok(())
    }

    fn raw_total(&self) -> Result<Decimal> {
        self.taxable
            .checked_add(self.gst)
            .ok_or_else(|| AppError::computation("Bill total is out of range"))
    }

    fn summary_entry(&self) -> Result<GstSummaryEntry> {
        Ok(GstSummaryEntry {
            taxable_amount: round_money(self.taxable),
            cgst_amount: round_money(self.cgst),
            sgst_amount: round_money(self.sgst),
            total_gst: round_money(self.gst),
            final_total: round_money(self.raw_total()?),
        })
    }
}
