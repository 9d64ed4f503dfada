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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::{Bus, BusNumber, BusStatus};
#[cfg(feature = "postgres")]
use bustracker_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use bustracker_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use bustracker_core::db::{DbError, DbResult, Executor, count_as_usize, ensure_one_upsert};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use time::OffsetDateTime;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Parses a status as stored in the database.
fn parse_status(status: &str) -> DbResult<BusStatus> {
    BusStatus::from_str(status).map_err(|e| {
        DbError::DataIntegrityError(format!("Unknown status '{}' in database: {}", status, e))
    })
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Bus {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let bus_number: String = row.try_get("bus_number").map_err(postgres::map_sqlx_error)?;
        let starting_point: String =
            row.try_get("starting_point").map_err(postgres::map_sqlx_error)?;
        let destination: String = row.try_get("destination").map_err(postgres::map_sqlx_error)?;
        let departure_time: String =
            row.try_get("departure_time").map_err(postgres::map_sqlx_error)?;
        let arrival_time: String = row.try_get("arrival_time").map_err(postgres::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(postgres::map_sqlx_error)?;
        let last_updated: OffsetDateTime =
            row.try_get("last_updated").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Bus::new(
            BusNumber::new(bus_number)?,
            starting_point,
            destination,
            departure_time,
            arrival_time,
            parse_status(&status)?,
            last_updated,
            created_at,
            updated_at,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Bus {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        /// Extracts the timestamp stored in the `<name>_secs` and `<name>_nsecs` columns.
        fn get_timestamp(row: &SqliteRow, name: &str) -> DbResult<OffsetDateTime> {
            let secs: i64 =
                row.try_get(format!("{}_secs", name).as_str()).map_err(sqlite::map_sqlx_error)?;
            let nsecs: i64 =
                row.try_get(format!("{}_nsecs", name).as_str()).map_err(sqlite::map_sqlx_error)?;
            build_timestamp(secs, nsecs)
        }

        let bus_number: String = row.try_get("bus_number").map_err(sqlite::map_sqlx_error)?;
        let starting_point: String =
            row.try_get("starting_point").map_err(sqlite::map_sqlx_error)?;
        let destination: String = row.try_get("destination").map_err(sqlite::map_sqlx_error)?;
        let departure_time: String =
            row.try_get("departure_time").map_err(sqlite::map_sqlx_error)?;
        let arrival_time: String = row.try_get("arrival_time").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;

        Ok(Bus::new(
            BusNumber::new(bus_number)?,
            starting_point,
            destination,
            departure_time,
            arrival_time,
            parse_status(&status)?,
            get_timestamp(&row, "last_updated")?,
            get_timestamp(&row, "created_at")?,
            get_timestamp(&row, "updated_at")?,
        ))
    }
}

/// Gets all buses sorted by their bus number.
///
/// The sorting is byte-wise so `B10` comes before `B2`.
pub async fn get_buses(ex: &mut Executor) -> DbResult<Vec<Bus>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = r#"SELECT * FROM buses ORDER BY bus_number COLLATE "C""#;
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Bus::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM buses ORDER BY bus_number";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Bus::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the bus identified by `bus_number`.
pub async fn get_bus(ex: &mut Executor, bus_number: &BusNumber) -> DbResult<Bus> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM buses WHERE bus_number = $1";
            let row = sqlx::query(query_str)
                .bind(bus_number.as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                Some(row) => Bus::try_from(row),
                None => Err(DbError::NotFound),
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM buses WHERE bus_number = ?";
            let row = sqlx::query(query_str)
                .bind(bus_number.as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match row {
                Some(row) => Bus::try_from(row),
                None => Err(DbError::NotFound),
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Inserts a new `bus` in a single statement.
///
/// Fails with `DbError::AlreadyExists` if a bus with the same number is already stored, in which
/// case the stored bus is left untouched.
pub async fn put_new_bus(ex: &mut Executor, bus: &Bus) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO buses (
                    bus_number, starting_point, destination, departure_time, arrival_time,
                    status, last_updated, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";
            let done = sqlx::query(query_str)
                .bind(bus.bus_number().as_str())
                .bind(bus.starting_point().as_str())
                .bind(bus.destination().as_str())
                .bind(bus.departure_time().as_str())
                .bind(bus.arrival_time().as_str())
                .bind(bus.status().as_str())
                .bind(*bus.last_updated())
                .bind(*bus.created_at())
                .bind(*bus.updated_at())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (last_updated_secs, last_updated_nsecs) = unpack_timestamp(*bus.last_updated())?;
            let (created_at_secs, created_at_nsecs) = unpack_timestamp(*bus.created_at())?;
            let (updated_at_secs, updated_at_nsecs) = unpack_timestamp(*bus.updated_at())?;

            let query_str = "
                INSERT INTO buses (
                    bus_number, starting_point, destination, departure_time, arrival_time,
                    status, last_updated_secs, last_updated_nsecs, created_at_secs,
                    created_at_nsecs, updated_at_secs, updated_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(bus.bus_number().as_str())
                .bind(bus.starting_point().as_str())
                .bind(bus.destination().as_str())
                .bind(bus.departure_time().as_str())
                .bind(bus.arrival_time().as_str())
                .bind(bus.status().as_str())
                .bind(last_updated_secs)
                .bind(last_updated_nsecs)
                .bind(created_at_secs)
                .bind(created_at_nsecs)
                .bind(updated_at_secs)
                .bind(updated_at_nsecs)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_upsert(rows_affected)
}

/// Inserts all `buses`, stopping at the first failure.
///
/// Callers should run this within a transaction so that a failure leaves no partial results.
pub async fn put_buses(ex: &mut Executor, buses: &[Bus]) -> DbResult<()> {
    for bus in buses {
        put_new_bus(ex, bus).await?;
    }
    Ok(())
}

/// Changes the `status` of the bus identified by `bus_number` and records `now` as the time of
/// the change.  Returns the bus after the modification.
pub async fn update_bus_status(
    ex: &mut Executor,
    bus_number: &BusNumber,
    status: BusStatus,
    now: OffsetDateTime,
) -> DbResult<Bus> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE buses
                SET status = $1, last_updated = $2, updated_at = $2
                WHERE bus_number = $3
                RETURNING *";
            sqlx::query(query_str)
                .bind(status.as_str())
                .bind(now)
                .bind(bus_number.as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .map(Bus::try_from)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (now_secs, now_nsecs) = unpack_timestamp(now)?;

            let query_str = "
                UPDATE buses
                SET
                    status = ?,
                    last_updated_secs = ?, last_updated_nsecs = ?,
                    updated_at_secs = ?, updated_at_nsecs = ?
                WHERE bus_number = ?
                RETURNING *";
            sqlx::query(query_str)
                .bind(status.as_str())
                .bind(now_secs)
                .bind(now_nsecs)
                .bind(now_secs)
                .bind(now_nsecs)
                .bind(bus_number.as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .map(Bus::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.unwrap_or(Err(DbError::NotFound))
}

/// Deletes the bus identified by `bus_number`.
pub async fn delete_bus(ex: &mut Executor, bus_number: &BusNumber) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM buses WHERE bus_number = $1";
            let done = sqlx::query(query_str)
                .bind(bus_number.as_str())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM buses WHERE bus_number = ?";
            let done = sqlx::query(query_str)
                .bind(bus_number.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Deletes all buses and returns how many there were.
pub async fn delete_all_buses(ex: &mut Executor) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM buses")
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM buses")
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Counts the number of stored buses.
pub async fn count_buses(ex: &mut Executor) -> DbResult<usize> {
    let count: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query("SELECT COUNT(*) AS count FROM buses")
            .fetch_one(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error)?
            .try_get("count")
            .map_err(postgres::map_sqlx_error)?,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlx::query("SELECT COUNT(*) AS count FROM buses")
            .fetch_one(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?
            .try_get("count")
            .map_err(sqlite::map_sqlx_error)?,

        #[allow(unused)]
        _ => unreachable!(),
    };
    count_as_usize(count)
}
