use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use gstbill::config::{Config, LogFormat};
use gstbill::middleware::{RateLimiter, RequestId};
use gstbill::modules;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gstbill={},actix_web=info", config.app.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.app.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header("x-request-id")
        .expose_headers(vec!["x-request-id"])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!("Starting GST bill calculation service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!(
        allow_custom_rates = config.gst.allow_custom_rates,
        default_mode = %config.gst.default_mode,
        "GST policy loaded"
    );

    let rate_limiter = RateLimiter::new(config.security.rate_limit_per_minute)?;
    let bind_address = config.server.bind_address();
    let gst_config = config.gst.clone();
    let allowed_origins = config.security.cors_allowed_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(rate_limiter.clone())
            .wrap(cors(&allowed_origins))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(modules::configure(gst_config.clone()))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
