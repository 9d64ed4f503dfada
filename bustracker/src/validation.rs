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

//! Checks applied to client requests before they reach the database.
//!
//! Everything in here is pure: the functions only look at their inputs and turn unvalidated
//! request payloads into the types that the rest of the service operates on.

use crate::model::{BusDraft, BusNumber, BusStatus, NewBus, StatusUpdate};
use bustracker_core::driver::DriverError;
use std::str::FromStr;

/// Validation errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Indicates that a required field was absent or empty.
    #[error("{0}")]
    MissingField(String),

    /// Indicates that a field holds a value outside of its enumerated set.
    #[error("{0}")]
    InvalidEnum(String),
}

impl From<ValidationError> for DriverError {
    fn from(e: ValidationError) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

/// Result type for this module.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Returns the value of an optional field if it is present and not empty.
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Checks that a `draft` carries every detail needed to register a new bus.
pub fn validate_new_bus(draft: BusDraft) -> ValidationResult<NewBus> {
    let missing = || ValidationError::MissingField("All bus details are required".to_owned());

    let bus_number = non_empty(draft.bus_number).ok_or_else(missing)?;
    let starting_point = non_empty(draft.starting_point).ok_or_else(missing)?;
    let destination = non_empty(draft.destination).ok_or_else(missing)?;
    let arrival_time = non_empty(draft.arrival_time).ok_or_else(missing)?;
    let departure_time = non_empty(draft.departure_time).ok_or_else(missing)?;

    let status = non_empty(draft.status).map(|s| BusStatus::from_str(&s)).transpose()?;

    let bus_number = BusNumber::new(bus_number).map_err(|_| missing())?;
    Ok(NewBus::new(
        bus_number,
        starting_point,
        destination,
        departure_time,
        arrival_time,
        status,
    ))
}

/// Checks that an `update` names the bus to modify and its new status.
///
/// Missing fields are reported before an unknown status.
pub fn validate_status_update(update: StatusUpdate) -> ValidationResult<(BusNumber, BusStatus)> {
    let missing = || ValidationError::MissingField("Bus number and status are required".to_owned());

    let bus_number = non_empty(update.bus_number).ok_or_else(missing)?;
    let status = non_empty(update.status).ok_or_else(missing)?;

    let bus_number = BusNumber::new(bus_number).map_err(|_| missing())?;
    let status = BusStatus::from_str(&status)?;
    Ok((bus_number, status))
}
