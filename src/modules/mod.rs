pub mod gst;
pub mod health;

use actix_web::web;

use crate::config::GstConfig;
use crate::middleware::json_error_handler;
use gst::services::BillCalculator;

/// Largest accepted JSON body; bills with hundreds of rows stay well below it
const JSON_BODY_LIMIT: usize = 256 * 1024;

/// Register shared state and every route of the service
pub fn configure(gst_config: GstConfig) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let calculator = BillCalculator::from_config(&gst_config);

        cfg.app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .app_data(web::Data::new(calculator))
        .app_data(web::Data::new(gst_config));

        health::controllers::configure(cfg);
        gst::controllers::configure(cfg);
    }
}
