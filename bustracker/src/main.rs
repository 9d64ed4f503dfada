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

//! Entry point to the bus tracker service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bustracker::{ServiceOptions, connect, serve};
use log::{error, info};
use std::process::ExitCode;

/// Waits until the user asks the process to terminate.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C; the server will only stop when killed: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match ServiceOptions::from_env("BUSTRACKER") {
        Ok(opts) => opts,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let bind_addr = opts.bind_addr();

    let db = match connect(opts.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open the database: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Connected to the database");

    let result = serve(bind_addr, db.clone(), shutdown_signal()).await;
    db.close().await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
