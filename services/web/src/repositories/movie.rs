//! Movie repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{like_pattern, prefix_pattern};
use crate::models::{Movie, MovieInput};

fn movie_from_row(row: &PgRow) -> Result<Movie, sqlx::Error> {
    Ok(Movie {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        title: row.try_get("title")?,
        published_date: row.try_get("published_date")?,
        rating: row.try_get("rating")?,
        vote_count: row.try_get("vote_count")?,
        synopsis: row.try_get("synopsis")?,
        trailer_url: row.try_get("trailer_url")?,
    })
}

fn movies_from_rows(rows: Vec<PgRow>) -> DatabaseResult<Vec<Movie>> {
    let movies = rows
        .iter()
        .map(movie_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(movies)
}

/// Movie repository for database operations
#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a movie by its code
    pub async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            FROM movies
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(movie_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Movies whose title contains the fragment, case-insensitively
    pub async fn find_by_title(&self, title: &str) -> DatabaseResult<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            FROM movies
            WHERE title ILIKE $1
            ORDER BY rating DESC, title
            "#,
        )
        .bind(like_pattern(title))
        .fetch_all(&self.pool)
        .await?;

        movies_from_rows(rows)
    }

    /// Best rated movies, most voted first among equals
    pub async fn find_popular(&self, limit: i64) -> DatabaseResult<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            FROM movies
            ORDER BY rating DESC, vote_count DESC, title
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        movies_from_rows(rows)
    }

    /// Every movie, by title
    pub async fn find_all(&self) -> DatabaseResult<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            FROM movies
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        movies_from_rows(rows)
    }

    /// Suggestions for type-ahead, titles starting with the fragment first
    pub async fn find_suggestions(&self, title: &str, limit: i64) -> DatabaseResult<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            FROM movies
            WHERE title ILIKE $1
            ORDER BY (title ILIKE $2) DESC, title
            LIMIT $3
            "#,
        )
        .bind(like_pattern(title))
        .bind(prefix_pattern(title))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        movies_from_rows(rows)
    }

    /// True when another movie already has this title and release date
    pub async fn exists_with_identity(
        &self,
        title: &str,
        published_date: Option<chrono::NaiveDate>,
        excluding_code: Option<&str>,
    ) -> DatabaseResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM movies
                WHERE LOWER(title) = LOWER($1)
                  AND published_date IS NOT DISTINCT FROM $2
                  AND ($3::TEXT IS NULL OR code <> $3)
            )
            "#,
        )
        .bind(title)
        .bind(published_date)
        .bind(excluding_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a new movie under the given code
    pub async fn insert(&self, code: &str, input: &MovieInput) -> DatabaseResult<Movie> {
        let row = sqlx::query(
            r#"
            INSERT INTO movies (code, title, published_date, synopsis, trailer_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            "#,
        )
        .bind(code)
        .bind(&input.title)
        .bind(input.published_date)
        .bind(&input.synopsis)
        .bind(&input.trailer_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(movie_from_row(&row)?)
    }

    /// Update the editable fields of the movie with the given code
    pub async fn update(&self, code: &str, input: &MovieInput) -> DatabaseResult<Option<Movie>> {
        let row = sqlx::query(
            r#"
            UPDATE movies
            SET title = $2, published_date = $3, synopsis = $4, trailer_url = $5
            WHERE code = $1
            RETURNING id, code, title, published_date, rating, vote_count, synopsis, trailer_url
            "#,
        )
        .bind(code)
        .bind(&input.title)
        .bind(input.published_date)
        .bind(&input.synopsis)
        .bind(&input.trailer_url)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(movie_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Delete a movie by code, reporting whether a row went away
    pub async fn delete_by_code(&self, code: &str) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
