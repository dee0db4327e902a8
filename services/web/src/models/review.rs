//! Review models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review with the author and movie it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub comment: String,
    /// Name of the authoring user
    pub author: String,
    pub movie_code: String,
    pub movie_title: String,
    pub created_at: DateTime<Utc>,
}

/// Review form posted from a movie page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub code: String,
    pub comment: String,
}
