pub mod controllers;
pub mod models;
pub mod services;

pub use models::{BillCalculation, BillGstType, BillTaxConfig, GstMode, LineCalculation, LineItem};
pub use services::BillCalculator;
