use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use rolodex_config::Config;

use crate::{
    AppState,
    handlers::{
        create_contact_handler, delete_contact_handler, get_contact_handler,
        get_photo_handler, health_handler, list_contacts_handler,
        upload_photo_handler,
    },
};

pub const CONTACTS: &str = "/contacts";
pub const CONTACT_ITEM: &str = "/contacts/{id}";
pub const CONTACT_PHOTO: &str = "/contacts/photo";
pub const HEALTH: &str = "/health";

/// Contact routes without any middleware.
///
/// Photos are served under `photo_url_prefix`, the same prefix the photo
/// store uses when it builds URLs. `/contacts/photo` is a static segment and
/// wins over `/contacts/{id}`, so a contact whose id is literally `photo` is
/// only reachable through listing.
pub fn create_contacts_router(photo_url_prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            CONTACTS,
            get(list_contacts_handler).post(create_contact_handler),
        )
        .route(CONTACT_PHOTO, put(upload_photo_handler))
        .route(&photo_route(photo_url_prefix), get(get_photo_handler))
        .route(
            CONTACT_ITEM,
            get(get_contact_handler).delete(delete_contact_handler),
        )
}

/// Full application: contact routes, health check, tracing, CORS and the
/// request body limit that bounds photo uploads.
pub fn create_app(state: AppState) -> Router {
    let config = state.config_handle();

    Router::new()
        .merge(create_contacts_router(&config.photos.url_prefix))
        .route(HEALTH, get(health_handler))
        .layer(DefaultBodyLimit::max(config.photos.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config)),
        )
        .with_state(state)
}

/// `/contacts/image/` becomes `/contacts/image/{filename}`.
pub fn photo_route(url_prefix: &str) -> String {
    format!("{url_prefix}{{filename}}")
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::IF_NONE_MATCH])
        .expose_headers([header::LOCATION, header::ETAG])
}
