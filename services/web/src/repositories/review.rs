//! Review repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::models::Review;

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: row.try_get("id")?,
        comment: row.try_get("comment")?,
        author: row.try_get("author")?,
        movie_code: row.try_get("movie_code")?,
        movie_title: row.try_get("movie_title")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Review repository
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a movie, newest first
    pub async fn find_by_movie_code(&self, code: &str) -> DatabaseResult<Vec<Review>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.comment, r.created_at, u.name AS author,
                   m.code AS movie_code, m.title AS movie_title
            FROM reviews r
            JOIN profiles p ON p.id = r.profile_id
            JOIN users u ON u.id = p.user_id
            JOIN movies m ON m.id = r.movie_id
            WHERE m.code = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .iter()
            .map(review_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    /// Reviews written by a user, newest first
    pub async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Vec<Review>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.comment, r.created_at, u.name AS author,
                   m.code AS movie_code, m.title AS movie_title
            FROM reviews r
            JOIN profiles p ON p.id = r.profile_id
            JOIN users u ON u.id = p.user_id
            JOIN movies m ON m.id = r.movie_id
            WHERE u.id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .iter()
            .map(review_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    /// Find a review by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Review>> {
        let row = sqlx::query(
            r#"
            SELECT r.id, r.comment, r.created_at, u.name AS author,
                   m.code AS movie_code, m.title AS movie_title
            FROM reviews r
            JOIN profiles p ON p.id = r.profile_id
            JOIN users u ON u.id = p.user_id
            JOIN movies m ON m.id = r.movie_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(review_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Attach a review to the profile of `user_name` and the movie `code`
    ///
    /// Returns the new review id, or `None` when either side is missing.
    pub async fn insert(
        &self,
        user_name: &str,
        code: &str,
        comment: &str,
    ) -> DatabaseResult<Option<i64>> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (profile_id, movie_id, comment)
            SELECT p.id, m.id, $3
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            CROSS JOIN movies m
            WHERE u.name = $1 AND m.code = $2
            RETURNING id
            "#,
        )
        .bind(user_name)
        .bind(code)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    /// Delete a review by ID
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
