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

//! Operations on the collection of buses.

use crate::db;
use crate::driver::Driver;
use crate::model::{Bus, NewBus};
use bustracker_core::driver::DriverResult;
use log::info;

impl Driver {
    /// Gets all buses sorted by bus number.
    pub(crate) async fn get_buses(self) -> DriverResult<Vec<Bus>> {
        let buses = db::get_buses(&mut self.db.ex().await?).await?;
        Ok(buses)
    }

    /// Replaces the whole collection of buses with `buses` and returns the new collection.
    ///
    /// This happens within a single transaction: if anything fails, the previous contents of the
    /// database are left untouched.
    pub(crate) async fn seed_buses(self, buses: Vec<NewBus>) -> DriverResult<Vec<Bus>> {
        let now = self.clock.now_utc();
        let buses = buses.into_iter().map(|new| Bus::create(new, now)).collect::<Vec<Bus>>();

        let mut tx = self.db.begin().await?;
        let deleted = db::delete_all_buses(tx.ex()).await?;
        info!("Cleared {} existing buses", deleted);
        db::put_buses(tx.ex(), &buses).await?;
        let buses = db::get_buses(tx.ex()).await?;
        tx.commit().await?;

        Ok(buses)
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::testutils::*;
    use crate::fixtures::sample_buses;
    use crate::model::{BusNumber, BusStatus, NewBus};
    use bustracker_core::driver::DriverError;

    #[tokio::test]
    async fn test_get_buses_none() {
        let context = TestContext::setup().await;

        let buses = context.driver().get_buses().await.unwrap();
        assert!(buses.is_empty());
    }

    #[tokio::test]
    async fn test_get_buses_sorted() {
        let context = TestContext::setup().await;

        let b2 = context.put_bus("B2", BusStatus::OnTime).await;
        let b10 = context.put_bus("B10", BusStatus::Left).await;
        let b1 = context.put_bus("B1", BusStatus::Delayed).await;

        let buses = context.driver().get_buses().await.unwrap();
        assert_eq!(vec![b1, b10, b2], buses);
    }

    #[tokio::test]
    async fn test_seed_buses_empty_database() {
        let context = TestContext::setup().await;

        let buses = context.driver().seed_buses(sample_buses().unwrap()).await.unwrap();
        assert_eq!(10, buses.len());
        assert_eq!("B1", buses[0].bus_number().as_str());
        assert_eq!("B10", buses[1].bus_number().as_str());
        assert_eq!("B9", buses[9].bus_number().as_str());
        for bus in &buses {
            assert_eq!(context.now(), *bus.created_at());
        }

        assert_eq!(10, context.count_buses().await);
    }

    #[tokio::test]
    async fn test_seed_buses_replaces_existing() {
        let context = TestContext::setup().await;

        context.put_bus("X1", BusStatus::OnTime).await;
        context.put_bus("B1", BusStatus::Left).await;

        context.driver().seed_buses(sample_buses().unwrap()).await.unwrap();

        assert_eq!(10, context.count_buses().await);
        assert!(!context.has_bus("X1").await);
        assert_eq!(BusStatus::OnTime, *context.get_bus("B1").await.status());
    }

    #[tokio::test]
    async fn test_seed_buses_rolls_back_on_failure() {
        let context = TestContext::setup().await;

        context.put_bus("X1", BusStatus::OnTime).await;

        let duplicate = || {
            NewBus::new(
                BusNumber::from("B1"),
                "Hostel".to_owned(),
                "Library".to_owned(),
                "08:00 AM".to_owned(),
                "08:15 AM".to_owned(),
                None,
            )
        };
        match context.driver().seed_buses(vec![duplicate(), duplicate()]).await {
            Err(DriverError::AlreadyExists(_)) => (),
            e => panic!("Must have failed with AlreadyExists but got {:?}", e),
        }

        assert_eq!(1, context.count_buses().await);
        assert!(context.has_bus("X1").await);
    }
}
