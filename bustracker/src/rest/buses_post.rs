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

//! API to register a new bus.

use crate::driver::Driver;
use crate::model::{Bus, BusDraft};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, http};
use bustracker_core::rest::{JsonBody, RestError};
use serde::Serialize;

/// Message returned to the client.
#[derive(Serialize)]
struct Response {
    /// Confirmation of the creation.
    message: &'static str,

    /// The bus as stored in the database.
    bus: Bus,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(draft): JsonBody<BusDraft>,
) -> Result<(http::StatusCode, impl IntoResponse), RestError> {
    let bus = driver.create_bus(draft).await?;
    Ok((http::StatusCode::CREATED, Json(Response { message: "Bus created successfully", bus })))
}
