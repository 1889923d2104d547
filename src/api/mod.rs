use crate::{api::handlers::root, db};
use anyhow::Result;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa_axum::router::OpenApiRouter;

pub(crate) mod cookies;
pub(crate) mod flash;
pub(crate) mod handlers;
mod openapi;
mod views;

pub use handlers::auth::{AuthConfig, Principal};
pub use openapi::openapi;

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Assemble the full application: documented routes, checklist pages and
/// the shared middleware stack.
pub fn app(pool: SqlitePool, auth_config: AuthConfig) -> Router {
    let (router, _openapi) = router().split_for_parts();
    let router = handlers::checklist::routes(router).route("/", get(root::root));

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(Arc::new(auth_config)))
            .layer(Extension(pool)),
    )
}

/// router
/// # Errors
/// Returns an error if the database cannot be opened or the server fails to start
pub async fn new(port: u16, dsn: &str, auth_config: AuthConfig) -> Result<()> {
    let pool = db::connect(dsn).await?;

    let app = app(pool.clone(), auth_config);

    let listener = TcpListener::bind(format!("[::]:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    pool.close().await;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let method = request.method().as_str();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!(
        "http-request",
        http.method = method,
        http.route = path,
        request_id
    )
}
