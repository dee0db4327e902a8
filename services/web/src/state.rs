//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    config::AppConfig,
    services::{MovieService, ReviewService, UserService, VoteService},
    session::SessionStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub movie_service: Arc<dyn MovieService>,
    pub user_service: Arc<dyn UserService>,
    pub vote_service: Arc<dyn VoteService>,
    pub review_service: Arc<dyn ReviewService>,
    pub sessions: Arc<dyn SessionStore>,
}
