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

//! High-level data types.

use crate::validation::ValidationError;
use bustracker_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::de::Visitor;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Newtype pattern for the identifier of a bus, which is its business key.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct BusNumber(String);

impl BusNumber {
    /// Creates a new bus number from an untrusted string `s`, making sure it is not empty.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("Bus number cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the bus number.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&'static str> for BusNumber {
    /// Creates a new bus number from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        BusNumber::new(s).expect("Hardcoded bus numbers must be valid")
    }
}

/// Operational state of a bus.  This is a closed set: anything else is rejected as soon as it is
/// parsed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BusStatus {
    /// The bus runs according to its schedule.
    #[default]
    OnTime,

    /// The bus runs behind its schedule.
    Delayed,

    /// The bus has already departed.
    Left,
}

impl BusStatus {
    /// Returns the textual representation of the status as exposed to clients and as stored in the
    /// database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusStatus::OnTime => "On Time",
            BusStatus::Delayed => "Delayed",
            BusStatus::Left => "Left",
        }
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On Time" => Ok(BusStatus::OnTime),
            "Delayed" => Ok(BusStatus::Delayed),
            "Left" => Ok(BusStatus::Left),
            _ => Err(ValidationError::InvalidEnum("Invalid status value".to_owned())),
        }
    }
}

impl Serialize for BusStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A deserialization visitor for a `BusStatus`.
struct BusStatusVisitor;

impl Visitor<'_> for BusStatusVisitor {
    type Value = BusStatus;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("one of \"On Time\", \"Delayed\" or \"Left\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        BusStatus::from_str(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for BusStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(BusStatusVisitor)
    }
}

/// Unvalidated contents of a request to register a new bus.
///
/// Every field is optional and kept as raw text so that missing fields and unknown statuses can be
/// reported with a domain-specific message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
#[serde(default, rename_all = "camelCase")]
pub struct BusDraft {
    /// Identifier of the new bus.
    pub bus_number: Option<String>,

    /// Where the route starts.
    pub starting_point: Option<String>,

    /// Where the route ends.
    pub destination: Option<String>,

    /// Scheduled arrival time, free-form.
    pub arrival_time: Option<String>,

    /// Scheduled departure time, free-form.
    pub departure_time: Option<String>,

    /// Initial status of the bus.  Absent or empty means the default.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub status: Option<String>,
}

/// Unvalidated contents of a request to change the status of a bus.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
#[serde(default, rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Identifier of the bus to update.
    pub bus_number: Option<String>,

    /// New status for the bus, not yet checked against the known statuses.
    pub status: Option<String>,
}

/// Validated details of a bus that is about to be created.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub struct NewBus {
    /// Identifier of the new bus.
    bus_number: BusNumber,

    /// Where the route starts.
    starting_point: String,

    /// Where the route ends.
    destination: String,

    /// Scheduled departure time, free-form.
    departure_time: String,

    /// Scheduled arrival time, free-form.
    arrival_time: String,

    /// Requested initial status, or `None` to use the default.
    status: Option<BusStatus>,
}

/// A bus record as stored in the database and returned to clients.
#[derive(Clone, Constructor, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    /// Identifier of the bus.
    bus_number: BusNumber,

    /// Where the route starts.
    starting_point: String,

    /// Where the route ends.
    destination: String,

    /// Scheduled departure time, free-form.
    departure_time: String,

    /// Scheduled arrival time, free-form.
    arrival_time: String,

    /// Current status of the bus.
    status: BusStatus,

    /// Time of the last status change.
    #[serde(with = "time::serde::rfc3339")]
    last_updated: OffsetDateTime,

    /// Time when the record was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time of the last mutation of the record.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Bus {
    /// Materializes a `new` bus as of `now`, applying the default status if none was requested.
    pub fn create(new: NewBus, now: OffsetDateTime) -> Self {
        Self {
            bus_number: new.bus_number,
            starting_point: new.starting_point,
            destination: new.destination,
            departure_time: new.departure_time,
            arrival_time: new.arrival_time,
            status: new.status.unwrap_or_default(),
            last_updated: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Formats the bus as a one-line summary of its route, schedule and status.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} → {} | {} → {} | Status: {}",
            self.bus_number.as_str(),
            self.starting_point,
            self.destination,
            self.departure_time,
            self.arrival_time,
            self.status
        )
    }
}

/// Report about the health of the service.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub struct Health {
    /// Fixed indicator that the service is able to respond.
    pub status: String,

    /// Time at which the report was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Seconds elapsed since the service started.
    pub uptime: f64,
}
