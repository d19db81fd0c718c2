use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, characters, favorites, planets, users};

/// Every routed endpoint, served by `GET /`.
pub const ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /health",
    "POST /login",
    "GET /user",
    "POST /user",
    "GET /user/{id}/",
    "GET /personajes",
    "POST /personajes",
    "GET /personajes/{id}/",
    "GET /planetas",
    "POST /planetas",
    "GET /planetas/{id}/",
    "GET /favoritos",
    "POST /favoritos",
    "GET /favoritos/{id}/",
    "DELETE /favoritos/{id}",
];

#[derive(Debug, Serialize)]
pub struct Sitemap {
    pub endpoints: &'static [&'static str],
}

async fn sitemap() -> Json<Sitemap> {
    Json(Sitemap {
        endpoints: ENDPOINTS,
    })
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(sitemap))
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(users::router())
        .merge(characters::router())
        .merge(planets::router())
        .merge(favorites::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}
