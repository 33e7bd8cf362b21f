//! GST Bill Calculation Service Library
//!
//! Authoritative GST-aware bill calculation (inclusive/exclusive pricing,
//! discount-before-tax, CGST/SGST split, rate-wise summary) plus the HTTP
//! preview API the billing UI calls for live totals.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::gst;
pub use modules::gst::{BillCalculator, BillTaxConfig, LineItem};
