//! SQLite-backed store. Every object is a row in `objects`; a [`Batch`]
//! runs inside one transaction, so a failing op rolls back the ops before it.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use crate::batch::{Batch, Op};
use crate::error::StorageError;
use crate::{Store, check_key};

/// File name of the record database inside a data directory.
pub const DATABASE_FILE: &str = "periop.db";

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../migrations/001_objects.sql"))];

#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        restrict_permissions(path)?;
        Self::init(conn)
    }

    /// Open the database file inside `dir`.
    pub fn open_dir(dir: &Path) -> Result<Self, StorageError> {
        Self::open(&dir.join(DATABASE_FILE))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn configure_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA synchronous=FULL;",
    )?;
    Ok(())
}

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version = current_version(conn);

    for &(version, sql) in MIGRATIONS {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }
    Ok(())
}

/// 0 when no schema exists yet.
fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|source| {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        check_key(key)?;
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row("SELECT body FROM objects WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        body.map(String::into_bytes)
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT key FROM objects WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn commit(&self, batch: Batch) -> Result<(), StorageError> {
        let mut conn = self.lock()?;
        // Dropping `tx` on an early return rolls the whole batch back.
        let tx = conn.transaction()?;
        let count = batch.len();
        for op in batch.into_ops() {
            check_key(op.key())?;
            match op {
                Op::Put { key, body } => {
                    let text = String::from_utf8(body)
                        .map_err(|_| StorageError::InvalidBody { key: key.clone() })?;
                    tx.execute(
                        "INSERT INTO objects (key, body) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET body = excluded.body",
                        params![key, text],
                    )?;
                }
                Op::Delete { key } => {
                    tx.execute("DELETE FROM objects WHERE key = ?1", params![key])?;
                }
            }
        }
        tx.commit()?;
        tracing::debug!(ops = count, "Batch committed");
        Ok(())
    }
}
