//! Service interfaces consumed by the route handlers
//!
//! Handlers only see these traits. The PostgreSQL-backed implementations live
//! in the submodules; tests swap in in-memory ones.

use async_trait::async_trait;

use crate::{
    error::ServiceResult,
    models::{
        Movie, MovieDetails, MovieInput, MovieSuggestion, NewUser, Principal, Review, User,
        UserProfile,
    },
};

pub mod movie;
pub mod review;
pub mod user;
pub mod vote;

pub use movie::MovieServiceImpl;
pub use review::ReviewServiceImpl;
pub use user::UserServiceImpl;
pub use vote::VoteServiceImpl;

/// Movie catalog operations
#[async_trait]
pub trait MovieService: Send + Sync {
    /// Movie with its reviews; `NotFound` for an unknown code
    async fn search_movie_details_by_id(&self, code: &str) -> ServiceResult<MovieDetails>;

    /// Movies whose title contains `title`, ignoring case
    async fn search_movie_by_title(&self, title: &str) -> ServiceResult<Vec<Movie>>;

    /// Listing shown for an empty search
    async fn get_popular_movies(&self) -> ServiceResult<Vec<Movie>>;

    async fn get_all_movies(&self) -> ServiceResult<Vec<Movie>>;

    /// `NotFound` when nothing was deleted
    async fn delete_movie(&self, code: &str) -> ServiceResult<()>;

    /// True when a different movie already has the same title and release date
    async fn check_if_movie_exists(&self, movie: &MovieInput) -> ServiceResult<bool>;

    /// Update the movie named by `movie.code`, or insert a new one
    async fn save_or_update_movie(&self, movie: &MovieInput) -> ServiceResult<Movie>;

    async fn search_autocomplete_movies(&self, title: &str)
    -> ServiceResult<Vec<MovieSuggestion>>;
}

/// Rating operations
#[async_trait]
pub trait VoteService: Send + Sync {
    /// Record the user's rating and return the movie's new aggregate rating
    async fn rate_movie(&self, user_name: &str, code: &str, rating: i32) -> ServiceResult<i32>;
}

/// User account operations
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>>;

    async fn search_user_by_id(&self, id: i64) -> ServiceResult<User>;

    async fn search_user_with_reviews_by_id(&self, id: i64) -> ServiceResult<UserProfile>;

    async fn search_user_with_reviews_by_name(&self, name: &str) -> ServiceResult<UserProfile>;

    /// `None` means the name is available
    async fn search_user_by_name(&self, name: &str) -> ServiceResult<Option<User>>;

    /// `None` means the email is available
    async fn search_user_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    /// Hash the password and store a new standard user; `Conflict` on duplicates
    async fn save_user(&self, user: &NewUser) -> ServiceResult<User>;

    /// Blank quotes clear the field
    async fn save_or_update_quote(&self, user_name: &str, quote: &str) -> ServiceResult<()>;

    /// False for unknown emails and wrong passwords alike
    async fn check_user_password(&self, email: &str, password: &str) -> ServiceResult<bool>;

    async fn update_user_password(&self, user_name: &str, new_password: &str)
    -> ServiceResult<()>;

    async fn delete_user(&self, id: i64) -> ServiceResult<()>;
}

/// Review operations
#[async_trait]
pub trait ReviewService: Send + Sync {
    async fn add_review(&self, user_name: &str, code: &str, comment: &str)
    -> ServiceResult<Review>;

    /// `Forbidden` unless the principal wrote the review or is an admin
    async fn delete_review(&self, principal: &Principal, review_id: i64) -> ServiceResult<()>;
}
