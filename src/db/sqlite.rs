use crate::db::models::{Account, NewAccount, SeedOutcome};
use crate::db::schema::SQLITE_INIT;
use crate::error::BootstrapError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `database_url`, creating the database file when missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, BootstrapError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

/// Execute the bundled DDL one statement at a time.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), BootstrapError> {
    // sqlx::query runs a single statement
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s)
            .execute(pool)
            .await
            .map_err(BootstrapError::Schema)?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct AccountsStorage {
    pool: SqlitePool,
}

impl AccountsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, BootstrapError> {
        let account = sqlx::query_as::<_, Account>(
            r#"SELECT id, username, password_hash, online, last_seen
               FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn count_by_username(&self, username: &str) -> Result<i64, BootstrapError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn list(&self) -> Result<Vec<Account>, BootstrapError> {
        let rows = sqlx::query_as::<_, Account>(
            r#"SELECT id, username, password_hash, online, last_seen
               FROM users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert `account` unless its username is already taken. The lookup and
    /// the insert share one transaction, which is committed before returning.
    pub async fn insert_if_absent(&self, account: NewAccount) -> Result<SeedOutcome, BootstrapError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(&account.username)
            .fetch_optional(&mut *tx)
            .await?;
        if let Some((id,)) = existing {
            tx.commit().await?;
            return Ok(SeedOutcome::AlreadyPresent { id });
        }

        let id = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, online)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.online)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        Ok(SeedOutcome::Created { id })
    }
}
