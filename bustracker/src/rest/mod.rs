// Bus Tracker
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use bustracker_core::rest::{ErrorResponse, RestError};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

mod bus_delete;
mod bus_get;
mod bus_update_post;
mod buses_get;
mod buses_post;
mod health_get;
#[cfg(test)]
mod testutils;

/// Returns true if `path` falls under the API prefix.
fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Answers requests that did not match any route, including requests to known paths that use an
/// unsupported method.
///
/// Paths under the API prefix get an `ErrorResponse` so that clients can rely on JSON payloads
/// everywhere in the API.  Anything else gets a bare 404.
async fn fallback(request: Request) -> Response {
    if is_api_path(request.uri().path()) {
        (axum::http::StatusCode::NOT_FOUND, axum::Json(ErrorResponse::new("API endpoint not found")))
            .into_response()
    } else {
        axum::http::StatusCode::NOT_FOUND.into_response()
    }
}

/// Converts a panic raised by a handler into an internal error.
fn panic_to_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic payload".to_owned()
    };
    RestError::InternalError(format!("Handler panicked: {}", details)).into_response()
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};
    Router::new()
        .route(
            "/api/buses",
            get(buses_get::handler).post(buses_post::handler).fallback(fallback),
        )
        .route("/api/buses/update", post(bus_update_post::handler).fallback(fallback))
        .route(
            "/api/buses/:bus_number",
            get(bus_get::handler).delete(bus_delete::handler).fallback(fallback),
        )
        .route("/api/health", get(health_get::handler).fallback(fallback))
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(panic_to_response))
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
