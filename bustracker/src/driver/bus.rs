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

//! Operations on one bus.

use crate::db;
use crate::driver::Driver;
use crate::model::{Bus, BusDraft, BusNumber, StatusUpdate};
use crate::validation::{validate_new_bus, validate_status_update};
use bustracker_core::db::DbError;
use bustracker_core::driver::{DriverError, DriverResult};
use log::info;

/// Converts a database error into a driver error, describing missing entries as missing buses.
fn bus_not_found(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound("Bus not found".to_owned()),
        e => e.into(),
    }
}

impl Driver {
    /// Gets the bus identified by `bus_number`.
    pub(crate) async fn get_bus(self, bus_number: &BusNumber) -> DriverResult<Bus> {
        let bus = db::get_bus(&mut self.db.ex().await?, bus_number).await.map_err(bus_not_found)?;
        Ok(bus)
    }

    /// Registers a new bus described by `draft`.
    ///
    /// Bus numbers are unique so this fails if the bus already exists, in which case the existing
    /// bus is left unmodified.
    pub(crate) async fn create_bus(self, draft: BusDraft) -> DriverResult<Bus> {
        let new = validate_new_bus(draft)?;
        let bus = Bus::create(new, self.clock.now_utc());

        db::put_new_bus(&mut self.db.ex().await?, &bus).await.map_err(|e| match e {
            DbError::AlreadyExists => {
                DriverError::AlreadyExists("Bus with this number already exists".to_owned())
            }
            e => e.into(),
        })?;

        info!("New bus added: {}", bus.summary());
        Ok(bus)
    }

    /// Changes the status of the bus named in `update`.
    pub(crate) async fn update_bus_status(self, update: StatusUpdate) -> DriverResult<Bus> {
        let (bus_number, status) = validate_status_update(update)?;

        let bus = db::update_bus_status(
            &mut self.db.ex().await?,
            &bus_number,
            status,
            self.clock.now_utc(),
        )
        .await
        .map_err(bus_not_found)?;

        info!("Bus {} status updated to {}", bus_number.as_str(), status);
        Ok(bus)
    }

    /// Deletes the bus identified by `bus_number`.
    pub(crate) async fn delete_bus(self, bus_number: &BusNumber) -> DriverResult<()> {
        db::delete_bus(&mut self.db.ex().await?, bus_number).await.map_err(bus_not_found)?;

        info!("Bus {} deleted", bus_number.as_str());
        Ok(())
    }
}
