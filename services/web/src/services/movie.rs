//! PostgreSQL implementation of the movie service

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::MovieService;
use crate::{
    config::CatalogConfig,
    error::{ServiceError, ServiceResult},
    models::{Movie, MovieDetails, MovieInput, MovieSuggestion},
    repositories::{MovieRepository, ReviewRepository},
};

/// Movie service backed by the movie and review repositories
#[derive(Clone)]
pub struct MovieServiceImpl {
    movies: MovieRepository,
    reviews: ReviewRepository,
    catalog: CatalogConfig,
}

impl MovieServiceImpl {
    pub fn new(movies: MovieRepository, reviews: ReviewRepository, catalog: CatalogConfig) -> Self {
        Self {
            movies,
            reviews,
            catalog,
        }
    }
}

/// Code for a movie submitted without one
pub(crate) fn generate_movie_code() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl MovieService for MovieServiceImpl {
    async fn search_movie_details_by_id(&self, code: &str) -> ServiceResult<MovieDetails> {
        let movie = self
            .movies
            .find_by_code(code)
            .await?
            .ok_or(ServiceError::NotFound("Movie"))?;
        let reviews = self.reviews.find_by_movie_code(code).await?;

        Ok(MovieDetails { movie, reviews })
    }

    async fn search_movie_by_title(&self, title: &str) -> ServiceResult<Vec<Movie>> {
        Ok(self.movies.find_by_title(title.trim()).await?)
    }

    async fn get_popular_movies(&self) -> ServiceResult<Vec<Movie>> {
        Ok(self.movies.find_popular(self.catalog.popular_limit).await?)
    }

    async fn get_all_movies(&self) -> ServiceResult<Vec<Movie>> {
        Ok(self.movies.find_all().await?)
    }

    async fn delete_movie(&self, code: &str) -> ServiceResult<()> {
        if self.movies.delete_by_code(code).await? {
            info!("Deleted movie {}", code);
            Ok(())
        } else {
            Err(ServiceError::NotFound("Movie"))
        }
    }

    async fn check_if_movie_exists(&self, movie: &MovieInput) -> ServiceResult<bool> {
        Ok(self
            .movies
            .exists_with_identity(&movie.title, movie.published_date, movie.code.as_deref())
            .await?)
    }

    async fn save_or_update_movie(&self, movie: &MovieInput) -> ServiceResult<Movie> {
        if let Some(code) = movie.code.as_deref() {
            if let Some(updated) = self.movies.update(code, movie).await? {
                info!("Updated movie {}", code);
                return Ok(updated);
            }
        }

        let code = movie.code.clone().unwrap_or_else(generate_movie_code);
        let created = self.movies.insert(&code, movie).await.map_err(|e| {
            if e.is_unique_violation() {
                ServiceError::Conflict("Movie")
            } else {
                ServiceError::Database(e)
            }
        })?;

        info!("Created movie {}", created.code);
        Ok(created)
    }

    async fn search_autocomplete_movies(
        &self,
        title: &str,
    ) -> ServiceResult<Vec<MovieSuggestion>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }

        let movies = self
            .movies
            .find_suggestions(title, self.catalog.autocomplete_limit)
            .await?;

        Ok(movies.iter().map(MovieSuggestion::from).collect())
    }
}
