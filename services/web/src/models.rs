//! Domain entities, form payloads and projections

pub mod movie;
pub mod review;
pub mod user;
pub mod vote;

pub use movie::{Movie, MovieDetails, MovieForm, MovieInput, MovieSuggestion};
pub use review::{Review, ReviewForm};
pub use user::{
    LoginForm, NewUser, PasswordForm, Principal, QuoteForm, Role, User, UserProfile,
};
pub use vote::{RateQuery, Vote};
