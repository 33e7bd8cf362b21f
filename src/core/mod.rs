pub mod error;
pub mod money;

pub use error::{AppError, Result};
pub use money::{format_inr, percent_of, round_money};
