//! PostgreSQL implementation of the vote service

use async_trait::async_trait;
use tracing::info;

use super::VoteService;
use crate::{
    error::{ServiceError, ServiceResult},
    repositories::{MovieRepository, UserRepository, VoteRepository},
    validation,
};

#[derive(Clone)]
pub struct VoteServiceImpl {
    votes: VoteRepository,
    users: UserRepository,
    movies: MovieRepository,
}

impl VoteServiceImpl {
    pub fn new(votes: VoteRepository, users: UserRepository, movies: MovieRepository) -> Self {
        Self {
            votes,
            users,
            movies,
        }
    }
}

#[async_trait]
impl VoteService for VoteServiceImpl {
    async fn rate_movie(&self, user_name: &str, code: &str, rating: i32) -> ServiceResult<i32> {
        if let Err(message) = validation::validate_rating(rating) {
            return Err(ServiceError::invalid("rating", message));
        }

        let user = self
            .users
            .find_by_name(user_name)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;
        let movie = self
            .movies
            .find_by_code(code)
            .await?
            .ok_or(ServiceError::NotFound("Movie"))?;

        let new_rating = self.votes.upsert(user.id, movie.id, rating).await?;
        info!(
            "{} rated {} with {}, movie now at {}",
            user.name, movie.code, rating, new_rating
        );

        Ok(new_rating)
    }
}
