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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::{Bus, BusNumber, BusStatus, NewBus};
use crate::rest::app;
use axum::Router;
use bustracker_core::clocks::Clock;
use bustracker_core::clocks::testutils::SettableClock;
use bustracker_core::db::{Db, DbError};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app, for direct access.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock backing the app, which tests can move forward.
    clock: Arc<SettableClock>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Creates an app backed by an in-memory database with the schema initialized.
    pub(crate) async fn setup() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(bustracker_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2024-03-01 06:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        let app = app(driver);
        Self { db, clock, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Returns the current time according to the test clock.
    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now_utc()
    }

    /// Moves the test clock forward by `delta`.
    pub(crate) fn advance(&self, delta: Duration) {
        self.clock.advance(delta)
    }

    /// Stores a bus named `number` with the given `status` by directly modifying the database.
    pub(crate) async fn put_bus(&self, number: &'static str, status: BusStatus) -> Bus {
        let bus = Bus::create(
            NewBus::new(
                BusNumber::from(number),
                "Hostel".to_owned(),
                "Library".to_owned(),
                "08:00 AM".to_owned(),
                "08:15 AM".to_owned(),
                Some(status),
            ),
            self.now(),
        );
        db::put_new_bus(&mut self.db.ex().await.unwrap(), &bus).await.unwrap();
        bus
    }

    /// Gets the bus named `number` directly from the database.
    pub(crate) async fn get_bus(&self, number: &'static str) -> Bus {
        db::get_bus(&mut self.db.ex().await.unwrap(), &BusNumber::from(number)).await.unwrap()
    }

    /// Checks if the bus named `number` exists in the database.
    pub(crate) async fn has_bus(&self, number: &'static str) -> bool {
        match db::get_bus(&mut self.db.ex().await.unwrap(), &BusNumber::from(number)).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Closes the database so that any further access by the app fails.
    pub(crate) async fn close_db(&self) {
        self.db.close().await;
    }

    /// Counts the buses in the database.
    pub(crate) async fn count_buses(&self) -> usize {
        db::count_buses(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
