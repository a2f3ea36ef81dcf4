use std::sync::Arc;
use axum::{
    http::{header::HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod handlers {
    pub mod contact_dtos;
    pub mod contact_handlers;
}
pub mod models {
    pub mod lead_models;
}
pub mod utils {
    pub mod i18n;
    pub mod lead_email;
    pub mod mailer;
}
pub mod api {
    pub mod emailjs;
}
pub mod config;
pub mod contact_form;
pub mod relay;

use handlers::contact_handlers;
use relay::LeadRelay;

pub struct AppState {
    pub relay: Arc<dyn LeadRelay>,
}

impl AppState {
    pub fn new(relay: Arc<dyn LeadRelay>) -> Self {
        Self { relay }
    }
}

pub fn router(state: Arc<AppState>, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route("/api/health", get(contact_handlers::health_check))
        .route("/api/send-email", post(contact_handlers::send_email))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::POST])
                .allow_origin(AllowOrigin::exact(allowed_origin))
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true),
        )
        .with_state(state)
}
