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

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use async_trait::async_trait;
use log::warn;
use sqlx::Transaction;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use time::OffsetDateTime;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Opens a connection pool against the SQLite database described by `conn_str`.
///
/// The connection string can be a plain file name, `:memory:`, or a `sqlite:` URL with options
/// such as `sqlite:bustracker.db?mode=rwc` to create the file if it does not exist.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let pool = SqlitePool::connect(conn_str).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A generic database executor implementation for SQLite.
#[derive(Debug)]
pub enum SqliteExecutor {
    /// An executor backed by a pool.  Operations issued via this executor aren't guaranteed to
    /// happen on the same connection.
    PoolExec(PoolConnection<Sqlite>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Sqlite>),
}

impl SqliteExecutor {
    /// Returns the raw connection behind this executor so that it can be handed to `sqlx` query
    /// functions.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        match self {
            SqliteExecutor::PoolExec(conn) => &mut **conn,
            SqliteExecutor::TxExec(tx) => &mut **tx,
        }
    }

    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            SqliteExecutor::PoolExec(_) => unreachable!("Do not call commit on direct executors"),
            SqliteExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }
}

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: SqlitePool,
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(Executor::Sqlite(SqliteExecutor::PoolExec(conn)))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::Sqlite(SqliteExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
///
/// The `schema` can contain multiple statements and all of them must be idempotent.
pub async fn run_schema(e: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(e.conn()).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Converts a timestamp as extracted from the database into an `OffsetDateTime`.
///
/// The input parameters must both be positive.  The reason why their types are `i64`s instead of
/// the `u64` you would expect is because the numeric types exposed by sqlx and SQLite are all
/// signed.  We could simply cast the types and accept negative representations in the database,
/// but that would pose difficulties when attempting to compare timestamps via relation operators
/// in SQL queries.
pub fn build_timestamp(timestamp_sec: i64, timestamp_nsec: i64) -> DbResult<OffsetDateTime> {
    if timestamp_sec < 0 || timestamp_nsec < 0 {
        return Err(DbError::DataIntegrityError(format!(
            "Timestamp cannot have negative quantities: sec={}, nsec={}",
            timestamp_sec, timestamp_nsec
        )));
    }

    match OffsetDateTime::from_unix_timestamp_nanos(
        (i128::from(timestamp_sec) * 1_000_000_000) + (i128::from(timestamp_nsec)),
    ) {
        Ok(timestamp) => Ok(timestamp),
        Err(e) => Err(DbError::DataIntegrityError(format!("Invalid timestamp: {}", e))),
    }
}

/// Converts a timestamp into the seconds and nanoseconds pair needed by the database.
///
/// Timestamps before the Unix epoch cannot be represented and yield a `DataIntegrityError` so
/// that `build_timestamp` never sees a negative pair.
pub fn unpack_timestamp(ts: OffsetDateTime) -> DbResult<(i64, i64)> {
    let nanos = ts.unix_timestamp_nanos();
    if nanos < 0 {
        return Err(DbError::DataIntegrityError(format!(
            "Cannot store a timestamp before the epoch: {}",
            ts
        )));
    }
    match (i64::try_from(nanos / 1_000_000_000), i64::try_from(nanos % 1_000_000_000)) {
        (Ok(sec), Ok(nsec)) => Ok((sec, nsec)),
        _ => Err(DbError::DataIntegrityError(format!("Timestamp out of range: {}", ts))),
    }
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// Initializes the test database.
    ///
    /// The pool holds a single connection so that rollbacks of dropped transactions complete
    /// before the next statement runs.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        let pool = SqlitePoolOptions::new().max_connections(1).connect(":memory:").await.unwrap();
        SqliteDb { pool }
    }
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use crate::db::tests::generate_db_rw_tests;
    use std::sync::Arc;

    generate_db_rw_tests!(Arc::new(setup().await) as Arc<dyn Db + Send + Sync>);

    #[tokio::test]
    async fn test_run_schema_multiple_statements() {
        let db = setup().await;
        {
            let mut ex = db.pool.acquire().await.map(SqliteExecutor::PoolExec).unwrap();
            run_schema(
                &mut ex,
                "CREATE TABLE IF NOT EXISTS a (i INTEGER);
                CREATE TABLE IF NOT EXISTS b (j INTEGER);
                INSERT INTO b (j) VALUES (5);",
            )
            .await
            .unwrap();

            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM b").fetch_one(ex.conn()).await.unwrap();
            assert_eq!(1, count);
        }
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_sqlx_error_unique() {
        let db = setup().await;
        {
            let mut ex = db.pool.acquire().await.map(SqliteExecutor::PoolExec).unwrap();
            run_schema(&mut ex, "CREATE TABLE t (k TEXT PRIMARY KEY); INSERT INTO t VALUES ('x');")
                .await
                .unwrap();
            let err = sqlx::query("INSERT INTO t VALUES ('x')")
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)
                .unwrap_err();
            assert_eq!(DbError::AlreadyExists, err);
        }
        db.close().await;
    }

    #[test]
    fn test_build_unpack_timestamp_zero() {
        let d = OffsetDateTime::from_unix_timestamp(0).unwrap();
        let (secs, nsecs) = unpack_timestamp(d).unwrap();
        assert_eq!(0, secs);
        assert_eq!(0, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_unpack_timestamp_nsecs_precision() {
        let d = OffsetDateTime::from_unix_timestamp_nanos(1234567899876543215i128).unwrap();
        let (secs, nsecs) = unpack_timestamp(d).unwrap();
        assert_eq!(1234567899i64, secs);
        assert_eq!(876543215i64, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_unpack_timestamp_before_epoch() {
        let d = OffsetDateTime::from_unix_timestamp(-10).unwrap();
        match unpack_timestamp(d) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }
    }

    #[test]
    fn test_build_timestamp_negative() {
        match build_timestamp(-1, 0) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }

        match build_timestamp(0, -1) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }
    }

    #[test]
    fn test_build_timestamp_too_big() {
        match build_timestamp(123456789123456789i64, 0) {
            Err(_) => (),
            Ok(_) => panic!("Must have failed"),
        }
    }
}
