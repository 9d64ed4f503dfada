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

//! Shared plumbing for the bus tracker service.
//!
//! The service is structured in the following layers, and every layer has a counterpart module in
//! this crate that provides the generic pieces:
//!
//! 1.  `model`: High-level data types that represent concepts in the domain of the application.
//!     There should be no logic in here beyond construction-time validation.
//!
//! 1.  `db`: The persistence layer.  Services write free functions that take an `Executor` and
//!     issue queries against every supported database backend.
//!
//! 1.  `driver`: The business logic layer.  Services provide their own `Driver` type that holds
//!     the database handle plus any other in-memory state, and that coordinates access to the
//!     database.
//!
//! 1.  `rest`: The HTTP layer.  Services provide an `axum::Router` whose handlers are backed by
//!     the `Driver`.
//!
//! 1.  `main`: The launcher.  Its sole purpose is to gather configuration data from environment
//!     variables and to hand control to the library.
//!
//! Every layer has its own result and error types, such as `DbResult` and `DbError`.  Errors
//! float to the top of the app with the `?` operator and are translated to HTTP status codes once
//! they leave the REST layer.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod clocks;
pub mod db;
pub mod driver;
pub mod env;
pub mod model;
pub mod rest;
