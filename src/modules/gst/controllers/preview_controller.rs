//! GST preview endpoints
//!
//! Lets the billing UI compute live bill totals without saving anything. The
//! UI renders `line_calculations`, `gst_summary` and `totals` as returned.

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::GstConfig;
use crate::core::error::AppError;
use crate::core::round_money;
use crate::middleware::RequestIdValue;
use crate::modules::gst::models::{
    BillCalculation, BillGstType, BillTaxConfig, BillTotals, GstMode, GstSummaryEntry,
    LineCalculation, LineItem,
};
use crate::modules::gst::services::{classify_gst_rate, validate_gst_rate, BillCalculator, RateKind};

/// Body of POST /api/preview/gst
#[derive(Debug, Deserialize)]
pub struct GstPreviewRequest {
    #[serde(alias = "items", default)]
    pub line_items: Vec<LineItem>,
    /// Falls back to the configured default mode when omitted
    #[serde(alias = "bill_mode", default)]
    pub gst_mode: Option<GstMode>,
    #[serde(default)]
    pub bill_gst_type: BillGstType,
}

/// One calculated row, amounts rounded to 2 decimal places
#[derive(Debug, Serialize, Deserialize)]
pub struct LineCalculationResponse {
    pub item_index: usize,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub hsn_code: Option<String>,
    pub unit_price_base: Decimal,
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    pub taxable_amount: Decimal,
    pub gst_rate_percent: Decimal,
    pub cgst_rate_percent: Decimal,
    pub sgst_rate_percent: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub gst_amount: Decimal,
    pub final_total: Decimal,
}

impl LineCalculationResponse {
    fn new(item_index: usize, item: &LineItem, calc: &LineCalculation) -> Self {
        Self {
            item_index,
            product_name: item.product_name.clone(),
            hsn_code: item.hsn_code.clone(),
            unit_price_base: round_money(calc.unit_price_base),
            base_amount: round_money(calc.base_amount),
            discount_amount: round_money(calc.discount_amount),
            taxable_amount: round_money(calc.taxable_amount),
            gst_rate_percent: round_money(calc.gst_rate_percent),
            cgst_rate_percent: round_money(calc.cgst_rate_percent),
            sgst_rate_percent: round_money(calc.sgst_rate_percent),
            cgst_amount: round_money(calc.cgst_amount),
            sgst_amount: round_money(calc.sgst_amount),
            gst_amount: round_money(calc.gst_amount),
            final_total: calc.final_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalsResponse {
    pub total_taxable_amount: Decimal,
    pub total_discount_amount: Decimal,
    pub total_cgst_amount: Decimal,
    pub total_sgst_amount: Decimal,
    pub total_gst_amount: Decimal,
    pub grand_total: Decimal,
}

impl From<&BillTotals> for TotalsResponse {
    fn from(totals: &BillTotals) -> Self {
        Self {
            total_taxable_amount: totals.total_taxable_amount,
            total_discount_amount: totals.total_discount_amount,
            total_cgst_amount: totals.total_cgst_amount,
            total_sgst_amount: totals.total_sgst_amount,
            total_gst_amount: totals.total_gst_amount,
            grand_total: totals.grand_total,
        }
    }
}

/// Summary key for a rate: two decimal places (`"18.00"`) unless the rate is
/// finer than that, in which case all of its digits are kept (`"0.125"`), so
/// distinct rates never share a key
pub fn rate_key(rate: Decimal) -> String {
    let normalized = rate.normalize();
    if normalized.scale() <= 2 {
        round_money(normalized).to_string()
    } else {
        normalized.to_string()
    }
}

/// Success envelope; summary keys come from [`rate_key`]
#[derive(Debug, Serialize, Deserialize)]
pub struct GstPreviewResponse {
    pub success: bool,
    pub gst_mode: GstMode,
    pub bill_gst_type: BillGstType,
    pub line_calculations: Vec<LineCalculationResponse>,
    pub gst_summary: BTreeMap<String, GstSummaryEntry>,
    pub totals: TotalsResponse,
}

impl GstPreviewResponse {
    fn new(config: BillTaxConfig, items: &[LineItem], calculation: &BillCalculation) -> Self {
        let line_calculations = items
            .iter()
            .zip(&calculation.lines)
            .enumerate()
            .map(|(idx, (item, calc))| LineCalculationResponse::new(idx, item, calc))
            .collect();

        let gst_summary = calculation
            .totals
            .gst_summary
            .iter()
            .map(|(rate, entry)| (rate_key(*rate), entry.clone()))
            .collect();

        Self {
            success: true,
            gst_mode: config.gst_mode,
            bill_gst_type: config.bill_gst_type,
            line_calculations,
            gst_summary,
            totals: TotalsResponse::from(&calculation.totals),
        }
    }
}

/// Preview GST calculations for a bill without saving it
///
/// POST /api/preview/gst
pub async fn preview_gst(
    req: HttpRequest,
    calculator: web::Data<BillCalculator>,
    settings: web::Data<GstConfig>,
    request: web::Json<GstPreviewRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let config = BillTaxConfig::new(
        request.bill_gst_type,
        request.gst_mode.unwrap_or(settings.default_mode),
    );

    let request_id = req
        .extensions()
        .get::<RequestIdValue>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let calculation = match calculator.calculate(&request.line_items, config) {
        Ok(calculation) => calculation,
        Err(err @ AppError::Validation(_)) => {
            tracing::warn!(request_id = %request_id, error = %err, "GST preview rejected");
            return Err(err);
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "GST preview failed");
            return Err(err);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        lines = calculation.lines.len(),
        grand_total = %calculation.totals.grand_total,
        "GST preview computed"
    );

    Ok(HttpResponse::Ok().json(GstPreviewResponse::new(
        config,
        &request.line_items,
        &calculation,
    )))
}

/// Body of POST /api/preview/validate-gst-rate; the rate may be a string or number
#[derive(Debug, Deserialize)]
pub struct ValidateGstRateRequest {
    #[serde(default)]
    pub gst_rate: Option<serde_json::Value>,
    #[serde(default)]
    pub allow_custom: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateGstRateResponse {
    pub success: bool,
    pub valid: bool,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(rename = "type", default)]
    pub rate_type: Option<RateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn parse_rate(value: Option<&serde_json::Value>) -> Option<Decimal> {
    match value {
        None | Some(serde_json::Value::Null) => Some(Decimal::ZERO),
        Some(serde_json::Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Some(_) => None,
    }
}

/// Check a single GST rate against the standard slabs
///
/// POST /api/preview/validate-gst-rate
pub async fn validate_rate(request: web::Json<ValidateGstRateRequest>) -> HttpResponse {
    let Some(rate) = parse_rate(request.gst_rate.as_ref()) else {
        return HttpResponse::Ok().json(ValidateGstRateResponse {
            success: true,
            valid: false,
            rate: None,
            rate_type: None,
            error: Some("Invalid numeric value".to_string()),
        });
    };

    let valid = validate_gst_rate(rate, request.allow_custom);

    HttpResponse::Ok().json(ValidateGstRateResponse {
        success: true,
        valid,
        rate: Some(rate.to_string()),
        rate_type: if valid { classify_gst_rate(rate) } else { None },
        error: None,
    })
}

/// Configure GST preview routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/preview")
            .route("/gst", web::post().to(preview_gst))
            .route("/validate-gst-rate", web::post().to(validate_rate)),
    );
}
