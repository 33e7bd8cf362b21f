use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::modules::gst::models::BillTaxConfig;
use crate::modules::gst::services::BillCalculator;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub application: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub calculator: bool,
    pub application: bool,
}

/// GET /health - Liveness probe
/// Returns 200 if the application is alive (can respond to requests)
pub async fn health_check() -> impl Responder {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: HealthChecks {
            application: "healthy".to_string(),
        },
    };

    HttpResponse::Ok().json(response)
}

/// GET /ready - Readiness probe
/// Runs an empty bill through the registered calculator
pub async fn readiness_check(calculator: Option<web::Data<BillCalculator>>) -> impl Responder {
    let calculator_ready = match calculator {
        Some(calculator) => match calculator.calculate(&[], BillTaxConfig::exclusive()) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Calculator readiness check failed: {}", e);
                false
            }
        },
        None => {
            tracing::error!("Calculator readiness check failed: calculator not registered");
            false
        }
    };

    let response = ReadinessResponse {
        ready: calculator_ready,
        checks: ReadinessChecks {
            calculator: calculator_ready,
            application: true,
        },
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
