//! Movie models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::review::Review;

/// Movie entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    /// External movie id, unique
    pub code: String,
    pub title: String,
    pub published_date: Option<NaiveDate>,
    /// Rounded mean of all votes, 0 while unrated
    pub rating: i32,
    pub vote_count: i32,
    pub synopsis: Option<String>,
    pub trailer_url: Option<String>,
}

impl Movie {
    pub fn year(&self) -> Option<i32> {
        self.published_date.map(|d| d.year())
    }
}

/// Movie with the reviews shown on its detail page
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub reviews: Vec<Review>,
}

/// Movie management form as posted by the admin page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieForm {
    /// Blank for a new movie
    pub code: Option<String>,
    pub title: String,
    /// `YYYY-MM-DD`
    pub published_date: Option<String>,
    pub synopsis: Option<String>,
    pub trailer_url: Option<String>,
}

/// Validated and normalized movie form
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInput {
    pub code: Option<String>,
    pub title: String,
    pub published_date: Option<NaiveDate>,
    pub synopsis: Option<String>,
    pub trailer_url: Option<String>,
}

/// Lightweight projection for type-ahead suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSuggestion {
    pub id: String,
    pub title: String,
}

impl From<&Movie> for MovieSuggestion {
    fn from(movie: &Movie) -> Self {
        let title = match movie.year() {
            Some(year) => format!("{} ({})", movie.title, year),
            None => movie.title.clone(),
        };

        Self {
            id: movie.code.clone(),
            title,
        }
    }
}

/// Rewrite a YouTube watch link into its embeddable form
///
/// Links that are already embeddable, or not YouTube watch links, are
/// returned unchanged.
pub fn embed_trailer_url(url: &str) -> String {
    const WATCH: &str = "watch?v=";
    const EMBED: &str = "embed/";

    match url.find(WATCH) {
        Some(index) => {
            let video = &url[index + WATCH.len()..];
            let video = video.split('&').next().unwrap_or(video);
            format!("{}{}{}", &url[..index], EMBED, video)
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(published_date: Option<NaiveDate>) -> Movie {
        Movie {
            id: 1,
            code: "tt0111161".to_string(),
            title: "The Shawshank Redemption".to_string(),
            published_date,
            rating: 5,
            vote_count: 2,
            synopsis: None,
            trailer_url: None,
        }
    }

    #[test]
    fn test_suggestion_title_carries_year() {
        let suggestion = MovieSuggestion::from(&movie(NaiveDate::from_ymd_opt(1994, 9, 23)));
        assert_eq!(suggestion.id, "tt0111161");
        assert_eq!(suggestion.title, "The Shawshank Redemption (1994)");

        let suggestion = MovieSuggestion::from(&movie(None));
        assert_eq!(suggestion.title, "The Shawshank Redemption");
    }

    #[test]
    fn test_embed_trailer_url() {
        assert_eq!(
            embed_trailer_url("https://www.youtube.com/watch?v=6hB3S9bIaco&t=10s"),
            "https://www.youtube.com/embed/6hB3S9bIaco"
        );
        assert_eq!(
            embed_trailer_url("https://www.youtube.com/embed/6hB3S9bIaco"),
            "https://www.youtube.com/embed/6hB3S9bIaco"
        );
    }

    #[test]
    fn test_details_flatten_movie_fields() {
        let details = MovieDetails {
            movie: movie(None),
            reviews: vec![],
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["code"], "tt0111161");
        assert!(value["reviews"].as_array().unwrap().is_empty());
    }
}
