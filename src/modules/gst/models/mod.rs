pub mod bill_calculation;
pub mod line_item;

pub use bill_calculation::{BillCalculation, BillTotals, GstSummaryEntry, LineCalculation};
pub use line_item::{BillGstType, BillTaxConfig, GstMode, LineItem};
