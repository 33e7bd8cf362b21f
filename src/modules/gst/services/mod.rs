pub mod bill_calculator;
pub mod gst_rate;

pub use bill_calculator::BillCalculator;
pub use gst_rate::{
    base_from_inclusive_unit_price, classify_gst_rate, is_standard_rate, validate_gst_rate,
    RateKind, STANDARD_GST_RATES,
};
