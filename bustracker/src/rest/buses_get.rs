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

//! API to list all buses.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use bustracker_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let buses = driver.get_buses().await?;
    Ok(Json(buses))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use bustracker_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/buses".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Bus>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_sorted_by_bus_number() {
        let context = TestContext::setup().await;

        let b3 = context.put_bus("B3", BusStatus::Delayed).await;
        let b1 = context.put_bus("B1", BusStatus::OnTime).await;
        let b20 = context.put_bus("B20", BusStatus::Left).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Bus>>()
            .await;
        assert_eq!(vec![b1, b20, b3], response);
    }

    #[tokio::test]
    async fn test_wire_format() {
        let context = TestContext::setup().await;

        context.put_bus("B1", BusStatus::OnTime).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<serde_json::Value>()
            .await;
        assert_eq!(
            serde_json::json!([{
                "busNumber": "B1",
                "startingPoint": "Hostel",
                "destination": "Library",
                "departureTime": "08:00 AM",
                "arrivalTime": "08:15 AM",
                "status": "On Time",
                "lastUpdated": "2024-03-01T06:00:00Z",
                "createdAt": "2024-03-01T06:00:00Z",
                "updatedAt": "2024-03-01T06:00:00Z",
            }]),
            response
        );
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;

        context.close_db().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Internal server error$")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
