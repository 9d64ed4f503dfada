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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::{Bus, BusNumber, BusStatus, NewBus};
use bustracker_core::clocks::Clock;
use bustracker_core::clocks::testutils::SettableClock;
use bustracker_core::db::{Db, DbError};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver, for direct access.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock backing the driver, which tests can move forward.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Creates a driver backed by an in-memory database with the schema initialized.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(bustracker_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2024-03-01 06:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Gets a clone of the driver under test.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates a driver that shares the database of this context but reads time from `clock`.
    pub(crate) fn driver_with_clock(&self, clock: Arc<dyn Clock + Send + Sync>) -> Driver {
        Driver::new(self.db.clone(), clock)
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
                format!("Stop {}", number),
                "Campus".to_owned(),
                "09:00 AM".to_owned(),
                "09:30 AM".to_owned(),
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

    /// Counts the buses in the database.
    pub(crate) async fn count_buses(&self) -> usize {
        db::count_buses(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
