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

//! API to change the status of a bus.

use crate::driver::Driver;
use crate::model::{Bus, StatusUpdate};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use bustracker_core::rest::{JsonBody, RestError};
use serde::Serialize;

/// Message returned to the client.
#[derive(Serialize)]
struct Response {
    /// Confirmation of the update.
    message: &'static str,

    /// The bus after the update.
    bus: Bus,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<impl IntoResponse, RestError> {
    let bus = driver.update_bus_status(update).await?;
    Ok(Json(Response { message: "Bus status updated successfully", bus }))
}
