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

//! Business logic for the service.

use bustracker_core::clocks::Clock;
use bustracker_core::db::Db;
use std::sync::Arc;
use time::OffsetDateTime;

mod bus;
mod buses;
mod health;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they run a single statement or
/// start and commit a transaction, so it's incorrect for the caller to use two separate calls.  For
/// this reason, these operations consume the driver in an attempt to minimize the possibility of
/// executing two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock used to stamp records and to compute the uptime.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Time at which the driver was created, which we take as the service start time.
    boot_time: OffsetDateTime,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let boot_time = clock.now_utc();
        Self { db, clock, boot_time }
    }
}
