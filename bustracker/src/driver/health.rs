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

//! Operations to report on the state of the service.

use crate::driver::Driver;
use crate::model::Health;

impl Driver {
    /// Reports that the service is alive along with how long it has been running.
    pub(crate) fn health(self) -> Health {
        let now = self.clock.now_utc();
        let uptime = (now - self.boot_time).as_seconds_f64().max(0.0);
        Health { status: "OK".to_owned(), timestamp: now, uptime }
    }
}
