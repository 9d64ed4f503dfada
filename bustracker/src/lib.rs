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

//! Bus schedule and status tracking service.
//!
//! The service exposes a JSON API to list, inspect, register, update and remove buses, backed
//! by either SQLite or PostgreSQL.  A companion binary resets the database to a fixed set of
//! sample buses.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

#[cfg(feature = "postgres")]
use bustracker_core::db::postgres::{PostgresDb, PostgresOptions};
use bustracker_core::clocks::SystemClock;
use bustracker_core::db::{Db, DbResult};
use bustracker_core::driver::DriverResult;
use bustracker_core::env::get_optional_var;
use log::info;
use std::error::Error;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

mod db;
mod driver;
use driver::Driver;
mod fixtures;
mod model;
mod rest;
use rest::app;
mod validation;

/// Port to listen on when none is configured.
const DEFAULT_PORT: u16 = 3000;

/// Database to use when none is configured.
const DEFAULT_DATABASE_URL: &str = "sqlite:bustracker.db?mode=rwc";

/// Returns true if `url` points to a PostgreSQL server.
fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

/// Options to establish a connection to the database.
#[derive(Debug)]
pub enum DatabaseOptions {
    /// Connect to a PostgreSQL server.
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),

    /// Open an SQLite database described by the given connection string.
    #[cfg(feature = "sqlite")]
    Sqlite(String),
}

impl DatabaseOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This reads `<prefix>_URL` to pick the backend and, for PostgreSQL, the optional
    /// `<prefix>_MIN_CONNECTIONS` and `<prefix>_MAX_CONNECTIONS` pool limits.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let url = get_optional_var::<String>(prefix, "URL")?
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        if is_postgres_url(&url) {
            #[cfg(feature = "postgres")]
            return PostgresOptions::from_env(prefix).map(DatabaseOptions::Postgres);

            #[cfg(not(feature = "postgres"))]
            return Err(format!("PostgreSQL support not built in; cannot use {}_URL", prefix));
        }

        #[cfg(feature = "sqlite")]
        return Ok(DatabaseOptions::Sqlite(url));

        #[cfg(not(feature = "sqlite"))]
        return Err(format!("SQLite support not built in; cannot use {}_URL", prefix));
    }
}

/// Configuration of the service.
#[derive(Debug)]
pub struct ServiceOptions {
    /// Port to listen on.
    pub port: u16,

    /// Database connection details.
    pub database: DatabaseOptions,
}

impl ServiceOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT` and `<prefix>_DATABASE_URL`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let port = get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT);
        let database = DatabaseOptions::from_env(&format!("{}_DATABASE", prefix))?;
        Ok(Self { port, database })
    }

    /// Returns the address the server should bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Initializes the schema of a freshly-opened `db`.
async fn init_db(db: &Arc<dyn Db + Send + Sync>) -> DbResult<()> {
    db::init_schema(&mut db.ex().await?).await
}

/// Opens the database described by `opts` and makes sure its schema exists.
///
/// The caller is responsible for calling `close` on the returned database once done.
pub async fn connect(opts: DatabaseOptions) -> DbResult<Arc<dyn Db + Send + Sync>> {
    let db: Arc<dyn Db + Send + Sync> = match opts {
        #[cfg(feature = "postgres")]
        DatabaseOptions::Postgres(opts) => Arc::new(PostgresDb::connect(opts)?),

        #[cfg(feature = "sqlite")]
        DatabaseOptions::Sqlite(conn_str) => {
            Arc::new(bustracker_core::db::sqlite::connect(&conn_str).await?)
        }
    };

    if let Err(e) = init_db(&db).await {
        db.close().await;
        return Err(e);
    }
    Ok(db)
}

/// Serves the application on `bind_addr` backed by `db` until `shutdown` completes.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve<F>(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    shutdown: F,
) -> Result<(), Box<dyn Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let driver = Driver::new(db, Arc::new(SystemClock::default()));
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    info!("Server running on {}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Replaces the contents of `db` with the sample buses and returns how many were inserted.
pub async fn seed(db: Arc<dyn Db + Send + Sync>) -> DriverResult<usize> {
    let driver = Driver::new(db, Arc::new(SystemClock::default()));
    let buses = driver.seed_buses(fixtures::sample_buses()?).await?;
    for bus in &buses {
        info!("{}", bus.summary());
    }
    info!("Total buses: {}", buses.len());
    Ok(buses.len())
}
