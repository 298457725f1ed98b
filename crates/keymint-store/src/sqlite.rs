//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for keymint. It uses rusqlite with
//! bundled SQLite. Each `save` runs in its own transaction so the uniqueness
//! check and the write are atomic, also across processes sharing the file.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use keymint_core::{now_millis, Permissions, TokenId, TokenRecord, TokenSecret};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{check_resave, SaveResult, Store};

/// How long a writer waits for another process's lock before failing.
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&conn)
    }

    /// Execute a blocking operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&mut conn)
    }
}

// Helper to convert a row to TokenRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TokenRecord> {
    let id: String = row.get("id")?;
    let secret: String = row.get("secret")?;
    let expires_at: Option<i64> = row.get("expires_at")?;
    let permissions: i64 = row.get("permissions")?;
    let created_at: i64 = row.get("created_at")?;

    let id = TokenId::parse(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let secret = TokenSecret::from_hex(&secret).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(TokenRecord::from_parts(
        id,
        secret,
        expires_at,
        Permissions::from_bits(permissions as u64),
        created_at,
    ))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

const SELECT_TOKEN: &str =
    "SELECT id, secret, expires_at, permissions, created_at FROM tokens WHERE id = ?1";

impl Store for SqliteStore {
    fn save(&self, record: &TokenRecord) -> Result<SaveResult> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let id = record.id().to_string();
            let now = now_millis();

            let existing = tx
                .query_row(SELECT_TOKEN, params![id], row_to_record)
                .optional()?;

            let result = match existing {
                Some(existing) => {
                    let result = check_resave(&existing, record)?;
                    if result == SaveResult::Updated {
                        tx.execute(
                            "UPDATE tokens SET permissions = ?1, updated_at = ?2 WHERE id = ?3",
                            params![record.permissions().bits() as i64, now, id],
                        )?;
                    }
                    result
                }
                None => {
                    let inserted = tx.execute(
                        "INSERT INTO tokens (
                            id, secret, expires_at, permissions, created_at, updated_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![
                            id,
                            record.secret().to_hex(),
                            record.expires_at(),
                            record.permissions().bits() as i64,
                            record.created_at(),
                            now,
                        ],
                    );

                    match inserted {
                        Ok(_) => SaveResult::Inserted,
                        Err(e) if is_constraint_violation(&e) => {
                            return Err(StoreError::Conflict(format!(
                                "token {} collides with an existing id or secret",
                                id
                            )));
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            };

            tx.commit()?;
            tracing::debug!(token = %id, ?result, permissions = record.permissions().bits(), "saved token");
            Ok(result)
        })
    }

    fn get(&self, id: &TokenId) -> Result<Option<TokenRecord>> {
        let id = id.to_string();
        self.with_conn(|conn| {
            Ok(conn
                .query_row(SELECT_TOKEN, params![id], row_to_record)
                .optional()?)
        })
    }

    fn has(&self, id: &TokenId) -> Result<bool> {
        let id = id.to_string();
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT 1 FROM tokens WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
