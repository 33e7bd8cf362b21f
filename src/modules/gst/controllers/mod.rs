pub mod preview_controller;

pub use preview_controller::configure;
