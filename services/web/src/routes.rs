//! Web service routes

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    middleware::{require_admin, require_user, session_middleware},
    paths::{model, page, route},
    view::View,
};

pub mod login;
pub mod movie;
pub mod profile;
pub mod register;
pub mod users;

/// Status flags carried over a redirect in the query string
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlashQuery {
    pub success: Option<bool>,
    pub message: Option<String>,
}

/// Create the router for the web service
pub fn create_router(state: AppState) -> Router {
    let admin_routes: Router<AppState> = Router::new()
        .route(
            route::MOVIES,
            get(movie::get_all_movies).post(movie::add_or_update_movie),
        )
        .route(route::DELETE_MOVIE, get(movie::remove_movie))
        .route(route::USERS, get(users::get_all_users))
        .route(route::USER, get(users::get_user))
        .route(route::DELETE_USER, get(users::remove_user))
        .route_layer(middleware::from_fn(require_admin));

    let user_routes: Router<AppState> = Router::new()
        .route(route::REVIEW, post(movie::add_review))
        .route(
            route::PROFILE,
            get(profile::show_profile).post(profile::update_quote),
        )
        .route(route::PROFILE_PASSWORD, post(profile::update_password))
        .route(route::DELETE_PROFILE_REVIEW, get(profile::remove_review))
        .route_layer(middleware::from_fn(require_user));

    Router::new()
        .route(route::HEALTH, get(health_check))
        .route(route::DEFAULT, get(index))
        .route(route::INDEX, get(index))
        .route(route::MOVIE, get(movie::search_movie_details))
        .route(route::POPULAR_MOVIES, get(movie::search_by_empty_title))
        .route(route::RESULT_MOVIE, get(movie::search_movie_by_title))
        .route(
            route::AUTOCOMPLETE_MOVIES,
            get(movie::search_autocomplete_movies),
        )
        .route(route::RATE_MOVIE, get(movie::vote_movie))
        .merge(register::router())
        .merge(login::router())
        .merge(admin_routes)
        .merge(user_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "movie-pick"
    }))
}

/// Landing page listing the popular movies
pub async fn index(State(state): State<AppState>) -> ApiResult<View> {
    info!("URL request: {}", route::INDEX);
    let movies = state.movie_service.get_popular_movies().await?;

    Ok(View::new(page::INDEX).with(model::MOVIES, movies))
}
