//! Vote repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};
use tracing::debug;

use crate::models::{Vote, vote::average_rating};

fn vote_from_row(row: &PgRow) -> Result<Vote, sqlx::Error> {
    Ok(Vote {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        movie_id: row.try_get("movie_id")?,
        rating: row.try_get("rating")?,
    })
}

/// Recompute and store the aggregate rating of a movie
///
/// Runs on the caller's connection so it joins the caller's transaction.
pub(crate) async fn recompute_rating(conn: &mut PgConnection, movie_id: i64) -> DatabaseResult<i32> {
    let ratings: Vec<i32> = sqlx::query_scalar("SELECT rating FROM votes WHERE movie_id = $1")
        .bind(movie_id)
        .fetch_all(&mut *conn)
        .await?;

    let rating = average_rating(&ratings);

    sqlx::query("UPDATE movies SET rating = $2, vote_count = $3 WHERE id = $1")
        .bind(movie_id)
        .bind(rating)
        .bind(ratings.len() as i32)
        .execute(&mut *conn)
        .await?;

    debug!(
        "Movie {} rated {} over {} votes",
        movie_id,
        rating,
        ratings.len()
    );
    Ok(rating)
}

/// Vote repository
#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    /// Create a new vote repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace the user's vote and return the movie's new rating
    pub async fn upsert(&self, user_id: i64, movie_id: i64, rating: i32) -> DatabaseResult<i32> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent votes on the same movie
        sqlx::query("SELECT id FROM movies WHERE id = $1 FOR UPDATE")
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            r#"
            INSERT INTO votes (user_id, movie_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id) DO UPDATE SET rating = EXCLUDED.rating
            RETURNING id, user_id, movie_id, rating
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(rating)
        .fetch_one(&mut *tx)
        .await?;
        let vote = vote_from_row(&row)?;
        debug!("Stored vote {} of user {} on movie {}", vote.id, vote.user_id, vote.movie_id);

        let new_rating = recompute_rating(&mut tx, movie_id).await?;

        tx.commit().await?;
        Ok(new_rating)
    }
}
