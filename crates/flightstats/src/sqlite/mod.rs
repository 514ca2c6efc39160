use std::ops::Deref;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

const LIVENESS_PROBE_SQL: &str = "SELECT 1";

/// Process-wide handle on the flight database.
///
/// The store never holds a connection itself. Every call to [`FlightStore::acquire`] opens a
/// fresh read-only connection that is closed when the returned [`ScopedConnection`] drops, so
/// callers share no mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightStore {
    path: PathBuf,
}

impl FlightStore {
    /// Opens the store and runs one liveness probe. Any failure here is fatal for startup.
    ///
    /// The path is made absolute first, so a file name such as `file:flights.sqlite3` is always
    /// read as a file and never as a SQLite URI.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("flight database does not exist: {}", path.display());
        }
        let path = std::path::absolute(path).with_context(|| {
            format!("failed to resolve flight database path: {}", path.display())
        })?;

        let store = Self { path };
        let path = store.path.as_path();
        store.probe().with_context(|| {
            format!(
                "liveness probe failed for flight database: {}",
                path.display()
            )
        })?;
        info!(path = %path.display(), "flight database ready");

        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn acquire(&self) -> Result<ScopedConnection> {
        let connection = open_read_only_connection(&self.path)?;
        debug!(path = %self.path.display(), "connection acquired");
        Ok(ScopedConnection {
            connection,
            path: self.path.clone(),
        })
    }

    pub fn with_connection<T>(&self, operation: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let connection = self.acquire()?;
        operation(&connection)
    }

    fn probe(&self) -> Result<()> {
        self.with_connection(|connection| {
            let value = connection
                .query_row(LIVENESS_PROBE_SQL, [], |row| row.get::<usize, i64>(0))
                .context("failed to execute liveness probe")?;
            if value != 1 {
                bail!("liveness probe returned unexpected value {value}");
            }
            Ok(())
        })
    }
}

/// A connection borrowed for the duration of one operation; closed on drop.
#[derive(Debug)]
pub struct ScopedConnection {
    connection: Connection,
    path: PathBuf,
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "connection released");
    }
}

pub fn open_read_only_connection(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags)
        .with_context(|| format!("failed to open sqlite database: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::FlightStore;
    use rusqlite::{Connection, OpenFlags};
    use std::path::PathBuf;

    fn temp_db_path(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("flightstats-{label}-{nanos}.sqlite"))
    }

    fn create_database(label: &str) -> PathBuf {
        let path = temp_db_path(label);
        let connection = Connection::open(&path).expect("sqlite file should open");
        connection
            .execute_batch("CREATE TABLE airlines (id INTEGER PRIMARY KEY, airline TEXT NOT NULL);")
            .expect("fixture schema should apply");
        path
    }

    #[test]
    fn open_rejects_missing_database_file() {
        let path = temp_db_path("missing");
        let err = FlightStore::open(&path).expect_err("missing database must fail startup");

        assert!(
            err.to_string().contains("flight database does not exist"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn open_probes_existing_database() {
        let path = create_database("probe");
        let store = FlightStore::open(&path).expect("existing database should open");

        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn acquired_connections_are_read_only() {
        let path = create_database("read-only");
        let store = FlightStore::open(&path).expect("existing database should open");
        let connection = store.acquire().expect("connection should be acquired");

        let err = connection
            .execute("INSERT INTO airlines (id, airline) VALUES (1, 'AA')", [])
            .expect_err("writes must be rejected");
        assert!(
            err.to_string().to_lowercase().contains("readonly"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn uri_like_file_name_opens_as_plain_file() {
        let dir = temp_db_path("uri-dir").with_extension("d");
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        let path = dir.join("file:flights.sqlite3?mode=memory");
        let connection = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .expect("sqlite file should be creatable");
        connection
            .execute_batch(
                "CREATE TABLE airlines (id INTEGER PRIMARY KEY, airline TEXT NOT NULL);
                 INSERT INTO airlines (id, airline) VALUES (1, 'AA');",
            )
            .expect("fixture should apply");
        drop(connection);

        let store = FlightStore::open(&path).expect("file should open as a plain path");
        assert!(store.path().is_absolute());
        let count = store
            .with_connection(|connection| {
                Ok(connection.query_row("SELECT COUNT(*) FROM airlines", [], |row| {
                    row.get::<usize, i64>(0)
                })?)
            })
            .expect("rows should be readable from the file");
        assert_eq!(count, 1);
    }

    #[test]
    fn each_acquisition_is_independent() {
        let path = create_database("independent");
        let store = FlightStore::open(&path).expect("existing database should open");

        let first = store.acquire().expect("first connection should be acquired");
        let second = store.acquire().expect("second connection should be acquired");
        let count = |connection: &Connection| {
            connection
                .query_row("SELECT COUNT(*) FROM airlines", [], |row| row.get::<usize, i64>(0))
                .expect("count should succeed")
        };

        assert_eq!(count(&*first), 0);
        drop(first);
        assert_eq!(count(&*second), 0);
    }
}
