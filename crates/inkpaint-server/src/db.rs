//! SQLite persistence for users and drawings.

use inkpaint_core::api::{Drawing, DrawingId, DrawingSummary, UserId, UserInfo};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A unique constraint rejected the write.
    #[error("Row already exists")]
    Conflict,
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return DbError::Conflict;
            }
        }
        DbError::Sqlx(err)
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// A user row, including the password hash.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

impl UserRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// The public part of the row.
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

fn drawing_from_row(row: &SqliteRow) -> Result<Drawing, sqlx::Error> {
    Ok(Drawing {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        data: row.try_get("data")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Handle to the database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url` and migrate it.
    pub async fn connect(url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let db = Self { pool };
        db.migrate().await?;
        tracing::info!("Database ready at {}", url);
        Ok(db)
    }

    /// A private in-memory database, used by tests.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        // Every connection to :memory: is a separate database; keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes. Safe to run more than once.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drawings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_drawings_user_created ON drawings(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> DbResult<UserId> {
        let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn user_by_username(&self, username: &str) -> DbResult<Option<UserRow>> {
        let row = sqlx::query(
            "SELECT id, username, email, password, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(UserRow::from_row).transpose()?)
    }

    pub async fn user_by_id(&self, id: UserId) -> DbResult<Option<UserRow>> {
        let row =
            sqlx::query("SELECT id, username, email, password, created_at FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.as_ref().map(UserRow::from_row).transpose()?)
    }

    pub async fn insert_drawing(&self, user_id: UserId, name: &str, data: &str) -> DbResult<DrawingId> {
        let result = sqlx::query("INSERT INTO drawings (user_id, name, data) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(name)
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// The user's drawings, newest first, without payloads.
    pub async fn list_drawings(&self, user_id: UserId) -> DbResult<Vec<DrawingSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at FROM drawings
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut drawings = Vec::with_capacity(rows.len());
        for row in &rows {
            drawings.push(DrawingSummary {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                created_at: row.try_get("created_at")?,
            });
        }
        Ok(drawings)
    }

    /// Drawing `id` if it belongs to `user_id`.
    pub async fn get_drawing(&self, id: DrawingId, user_id: UserId) -> DbResult<Option<Drawing>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, data, created_at FROM drawings WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(drawing_from_row).transpose()?)
    }

    /// Delete drawing `id` if it belongs to `user_id`. Returns whether a row went away.
    pub async fn delete_drawing(&self, id: DrawingId, user_id: UserId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM drawings WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
