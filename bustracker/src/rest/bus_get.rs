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

//! API to get the details of a single bus.

use crate::driver::Driver;
use crate::model::BusNumber;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use bustracker_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(bus_number): Path<String>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let bus_number = BusNumber::new(bus_number)?;
    let bus = driver.get_bus(&bus_number).await?;
    Ok(Json(bus))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use bustracker_core::rest::testutils::*;

    fn route(bus_number: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/buses/{}", bus_number))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.put_bus("B1", BusStatus::OnTime).await;
        let b2 = context.put_bus("B2", BusStatus::Left).await;

        let response = OneShotBuilder::new(context.into_app(), route("B2"))
            .send_empty()
            .await
            .expect_json::<Bus>()
            .await;
        assert_eq!(b2, response);
    }

    #[tokio::test]
    async fn test_percent_encoded_bus_number() {
        let context = TestContext::setup().await;

        let bus = context.put_bus("Line 5", BusStatus::Delayed).await;

        let response = OneShotBuilder::new(context.into_app(), route("Line%205"))
            .send_empty()
            .await
            .expect_json::<Bus>()
            .await;
        assert_eq!(bus, response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        context.put_bus("B1", BusStatus::OnTime).await;

        OneShotBuilder::new(context.into_app(), route("B10"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Bus not found$")
            .await;
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;

        context.close_db().await;

        OneShotBuilder::new(context.app(), route("B1"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Internal server error$")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("irrelevant"));
}
