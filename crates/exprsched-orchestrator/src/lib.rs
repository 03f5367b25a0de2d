//! HTTP API layer for the arithmetic expression scheduler (C7).
//!
//! The router is assembled from one module per resource, each exposing a
//! `fn router(state: AppState) -> Router`, following this codebase's
//! thin-entrypoint / shared-state pattern.

pub mod dto;
pub mod extract;
pub mod http_error;
pub mod openapi;
pub mod routes;
pub mod state;
#[cfg(test)]
pub(crate) mod test_support;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router: per-resource routes, the Swagger UI, and the
/// cross-cutting middleware stack (CORS, request tracing, panic recovery).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::calculate::router(state.clone()))
        .merge(routes::expressions::router(state.clone()))
        .merge(routes::internal_task::router(state.clone()))
        .merge(routes::health::router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}
