//! User repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::vote::recompute_rating;
use crate::models::{Role, User};

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        enabled: row.try_get("enabled")?,
        created_at: row.try_get("created_at")?,
    })
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All users, by name
    pub async fn find_all(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, enabled, created_at
            FROM users
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, enabled, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find a user by exact name
    pub async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, enabled, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find a user by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, enabled, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Create a user together with an empty profile
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> DatabaseResult<User> {
        info!("Creating new user: {}", name);

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, enabled, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let user = user_from_row(&row)?;

        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Profile quote of a user
    pub async fn find_quote(&self, user_id: i64) -> DatabaseResult<Option<String>> {
        let quote: Option<Option<String>> =
            sqlx::query_scalar("SELECT quote FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(quote.flatten())
    }

    /// Set the profile quote, creating the profile when missing
    pub async fn upsert_quote(&self, user_id: i64, quote: Option<&str>) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, quote)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET quote = EXCLUDED.quote
            "#,
        )
        .bind(user_id)
        .bind(quote)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace the stored password hash
    pub async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a user and re-rate every movie they had voted on
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        let voted: Vec<i64> = sqlx::query_scalar(
            "SELECT movie_id FROM votes WHERE user_id = $1 ORDER BY movie_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // Lock order: voted movies by id, then the user row
        sqlx::query("SELECT id FROM movies WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(voted.as_slice())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for movie_id in voted {
            recompute_rating(&mut tx, movie_id).await?;
        }

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
