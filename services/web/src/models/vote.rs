//! Vote model and rating aggregation

use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// One user's rating of one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub rating: i32,
}

/// Query string of the rate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuery {
    pub rating: i32,
    pub code: String,
}

/// Aggregate rating of a movie: the mean of its votes rounded half up
///
/// A movie without votes is rated 0.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let count = ratings.len() as i64;

    ((2 * sum + count) / (2 * count)) as i32
}
