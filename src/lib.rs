pub mod captcha;
pub mod config;
pub mod contact;
pub mod email;
pub mod error;
pub mod log_store;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::captcha::SiteVerifier;
use crate::config::Config;
use crate::contact::pipeline::ContactPipeline;
use crate::email::SmtpMailer;
use crate::log_store::{CsvLogStore, LogStore};
use crate::state::{AppState, SharedState};

/// HTTP-level settings that sit outside the pipeline.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origins: Vec<String>,
    pub max_body_size: usize,
}

/// Wire the production collaborators from config and build the router.
pub fn build_app(config: Config) -> Result<Router, String> {
    let mailer = SmtpMailer::new(&config.smtp).map_err(|e| format!("SMTP setup failed: {e}"))?;
    tracing::info!("SMTP relay configured ({})", config.smtp.host);

    let verifier = SiteVerifier::new(config.captcha)?;

    let log_store: Option<Arc<dyn LogStore>> = match config.log_path {
        Some(path) => {
            tracing::info!("Submission log enabled at {path}");
            Some(Arc::new(CsvLogStore::new(path)))
        }
        None => {
            tracing::info!("Submission log disabled");
            None
        }
    };

    let pipeline = ContactPipeline::new(
        config.contact,
        Arc::new(verifier),
        Arc::new(mailer),
        log_store,
    );

    let settings = HttpSettings {
        cors_origins: config.cors_origins,
        max_body_size: config.max_body_size,
    };

    Ok(build_router(Arc::new(AppState { pipeline }), &settings))
}

pub fn build_router(state: SharedState, settings: &HttpSettings) -> Router {
    let layers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.cors_origins));

    Router::new()
        .merge(routes::contact_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(settings.max_body_size))
        .layer(layers)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {origin}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
}

async fn health() -> &'static str {
    "ok"
}
