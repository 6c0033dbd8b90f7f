// src/users/store.rs
// SQLite-backed credential store. Exclusive owner of user rows; every
// mutation runs inside a transaction so a failed write leaves the table
// unchanged.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::users::models::{Role, User, UserRecord, normalize_username};

pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the users table if missing. COLLATE NOCASE backs the
    /// case-insensitive uniqueness invariant even under concurrent writes;
    /// the lowercase normalization at write time keeps stored names canonical.
    pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// First-run bootstrap: seed the default admin/admin account when no
    /// admin user exists yet.
    pub async fn seed_default_admin(&self) -> anyhow::Result<()> {
        if self.find_by_username("admin").await?.is_some() {
            return Ok(());
        }
        self.create("admin", "admin", Role::Admin).await?;
        warn!("Default admin user created (admin/admin) - change this password");
        Ok(())
    }

    pub async fn create(&self, username: &str, password: &str, role: Role) -> ApiResult<User> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::invalid_input("Username and password required"));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(&username)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(ApiError::conflict("Username already exists"));
        }

        // The unique index decides races the SELECT above cannot see;
        // losing inserts surface as a unique violation mapped to Conflict.
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&username)
        .bind(&password_hash)
        .bind(role)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(username = %username, role = role.as_str(), "User created");
        Ok(User {
            id: result.last_insert_rowid(),
            username,
            role,
            created_at: now,
        })
    }

    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<UserRecord>> {
        let username = normalize_username(username);
        let rec = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = ?",
        )
        .bind(&username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<UserRecord>> {
        let rec = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    /// List all users, hashes excluded by construction.
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        let recs = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(recs.into_iter().map(User::from).collect())
    }

    /// Update username and/or role. Password changes go through
    /// `set_password` only.
    pub async fn update(
        &self,
        id: i64,
        username: Option<&str>,
        role: Option<Role>,
    ) -> ApiResult<User> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Err(ApiError::not_found("User not found"));
        };

        let new_username = match username {
            Some(name) => {
                let name = normalize_username(name);
                if name.is_empty() {
                    return Err(ApiError::invalid_input("Username required"));
                }
                let taken: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM users WHERE username = ? AND id != ?")
                        .bind(&name)
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if taken.is_some() {
                    return Err(ApiError::conflict("Username already exists"));
                }
                name
            }
            None => current.username.clone(),
        };
        let new_role = role.unwrap_or(current.role);

        sqlx::query("UPDATE users SET username = ?, role = ? WHERE id = ?")
            .bind(&new_username)
            .bind(new_role)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(username = %new_username, "User updated");
        Ok(User {
            id,
            username: new_username,
            role: new_role,
            created_at: current.created_at,
        })
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("User not found"));
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Recompute the stored hash for a new password. Plaintext is hashed
    /// immediately and never logged.
    pub async fn set_password(&self, id: i64, new_password: &str) -> ApiResult<()> {
        if new_password.is_empty() {
            return Err(ApiError::invalid_input("Password required"));
        }
        let password_hash = hash_password(new_password)?;
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("User not found"));
        }
        info!(user_id = id, "Password changed");
        Ok(())
    }
}
