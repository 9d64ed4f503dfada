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

//! Sample data to populate a fresh database with.

use crate::model::{BusNumber, BusStatus, NewBus};
use bustracker_core::model::ModelResult;

/// Raw fixture rows: bus number, starting point, destination, departure, arrival and status.
const BUSES: &[(&str, &str, &str, &str, &str, BusStatus)] = &[
    ("B1", "Main Gate", "Engineering Block", "07:30 AM", "07:45 AM", BusStatus::OnTime),
    ("B2", "Hostel", "Library", "08:00 AM", "08:15 AM", BusStatus::OnTime),
    ("B3", "Parking", "Admin Block", "08:30 AM", "08:45 AM", BusStatus::Delayed),
    ("B4", "Campus", "City Center", "09:00 AM", "09:30 AM", BusStatus::Left),
    ("B5", "Hostel", "Campus", "08:15 AM", "09:00 AM", BusStatus::OnTime),
    ("B6", "Metro Station", "College", "07:00 AM", "07:20 AM", BusStatus::OnTime),
    ("B7", "Sports Complex", "Cafeteria", "12:00 PM", "12:10 PM", BusStatus::Delayed),
    ("B8", "Medical Center", "Hostel", "06:00 PM", "06:15 PM", BusStatus::OnTime),
    ("B9", "City Center", "Campus", "07:45 AM", "08:15 AM", BusStatus::OnTime),
    ("B10", "Auditorium", "Main Gate", "05:30 PM", "05:45 PM", BusStatus::Left),
];

/// Returns the buses used to seed the database, in their natural order.
pub fn sample_buses() -> ModelResult<Vec<NewBus>> {
    BUSES
        .iter()
        .map(|(number, from, to, departs, arrives, status)| {
            Ok(NewBus::new(
                BusNumber::new(*number)?,
                (*from).to_owned(),
                (*to).to_owned(),
                (*departs).to_owned(),
                (*arrives).to_owned(),
                Some(*status),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_buses_are_unique() {
        let buses = sample_buses().unwrap();
        assert_eq!(10, buses.len());
        let numbers = buses.iter().map(|b| b.bus_number().as_str()).collect::<HashSet<_>>();
        assert_eq!(10, numbers.len());
    }

    #[test]
    fn test_sample_buses_have_explicit_status() {
        let buses = sample_buses().unwrap();
        assert_eq!(&Some(BusStatus::OnTime), buses[0].status());
        assert_eq!(&Some(BusStatus::Delayed), buses[2].status());
        assert_eq!(&Some(BusStatus::Left), buses[9].status());
        assert_eq!("B10", buses[9].bus_number().as_str());
        assert_eq!("Auditorium", buses[9].starting_point());
    }
}
