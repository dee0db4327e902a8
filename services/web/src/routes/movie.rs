//! Movie routes: detail, search, listing, management, autocomplete, rating

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::FlashQuery;
use crate::{
    AppState,
    error::{ApiResult, ServiceError},
    models::{MovieForm, MovieSuggestion, Principal, RateQuery, ReviewForm},
    paths::{message, model, page, redirect, route},
    validation,
    view::View,
};

/// Query string of the autocomplete endpoint
#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(rename = "movieTitle")]
    pub movie_title: String,
}

/// Movie page with empty review and vote forms for `code`
fn movie_page(code: &str) -> View {
    View::new(page::MOVIE)
        .with(
            model::REVIEW,
            ReviewForm {
                code: code.to_string(),
                comment: String::new(),
            },
        )
        .with(
            model::VOTE,
            RateQuery {
                rating: 0,
                code: code.to_string(),
            },
        )
}

/// Movie details by movie code
pub async fn search_movie_details(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> View {
    info!("URL request: {}", route::MOVIE);

    match state.movie_service.search_movie_details_by_id(&code).await {
        Ok(details) => movie_page(&code).with(model::MOVIE, details),
        Err(ServiceError::NotFound(_)) => movie_page(&code)
            .with(model::MESSAGE, message::MOVIE_NOT_FOUND)
            .with_status(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to load movie {}: {}", code, e);
            movie_page(&code)
                .with(model::MESSAGE, message::FAIL)
                .with_status(e.status_code())
        }
    }
}

/// Movies matching a title
pub async fn search_movie_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<View> {
    info!("URL request: {}", route::RESULT_MOVIE);
    let movies = state.movie_service.search_movie_by_title(&title).await?;

    Ok(View::new(page::RESULT).with(model::MOVIE, movies))
}

/// Popular movies, shown when the search box was empty
pub async fn search_by_empty_title(State(state): State<AppState>) -> ApiResult<View> {
    info!("URL request: {}", route::POPULAR_MOVIES);
    let movies = state.movie_service.get_popular_movies().await?;

    Ok(View::new(page::RESULT).with(model::MOVIE, movies))
}

/// Movie management listing
pub async fn get_all_movies(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> ApiResult<View> {
    info!("URL request: {}", route::MOVIES);
    let movies = state.movie_service.get_all_movies().await?;

    Ok(View::new(page::MOVIES)
        .with(model::MOVIES, movies)
        .with(model::MOVIE, MovieForm::default())
        .with_opt(model::SUCCESS, flash.success)
        .with_opt(model::MESSAGE, flash.message))
}

/// Delete a movie and go back to the listing with a status message
pub async fn remove_movie(State(state): State<AppState>, Path(code): Path<String>) -> Redirect {
    info!("URL request: {}", route::DELETE_MOVIE);

    let status = match state.movie_service.delete_movie(&code).await {
        Ok(()) => message::SUCCESS,
        Err(ServiceError::NotFound(_)) => message::MOVIE_NOT_FOUND,
        Err(e) => {
            error!("Failed to delete movie {}: {}", code, e);
            message::FAIL
        }
    };

    Redirect::to(&redirect::movies_with_message(status))
}

/// Type-ahead suggestions as a JSON array
pub async fn search_autocomplete_movies(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> ApiResult<Json<Vec<MovieSuggestion>>> {
    info!("URL request: {}", route::AUTOCOMPLETE_MOVIES);
    let movies = state
        .movie_service
        .search_autocomplete_movies(&query.movie_title)
        .await?;

    Ok(Json(movies))
}

/// Rate a movie as the signed-in user
///
/// Answers with the new aggregate rating as plain text.
pub async fn vote_movie(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<RateQuery>,
) -> Response {
    info!("URL request: {}", route::RATE_MOVIE);

    let Some(Extension(principal)) = principal else {
        return Redirect::to(redirect::LOGIN).into_response();
    };

    match state
        .vote_service
        .rate_movie(&principal.name, &query.code, query.rating)
        .await
    {
        Ok(rating) => rating.to_string().into_response(),
        Err(e) => {
            match &e {
                ServiceError::Database(_) | ServiceError::Internal(_) => {
                    error!("Failed to rate movie {}: {}", query.code, e)
                }
                _ => warn!("Rejected rating of movie {}: {}", query.code, e),
            }
            (e.status_code(), message::FAIL).into_response()
        }
    }
}

/// Add or update a movie from the management form
pub async fn add_or_update_movie(
    State(state): State<AppState>,
    Form(form): Form<MovieForm>,
) -> Redirect {
    info!("URL request: {}", route::MOVIES);

    let movie = match validation::validate_movie(&form) {
        Ok(movie) => movie,
        Err(e) => {
            warn!("Rejected movie form: {:?}", e);
            return Redirect::to(redirect::MOVIES_FAIL);
        }
    };

    match state.movie_service.check_if_movie_exists(&movie).await {
        Ok(false) => {}
        Ok(true) => {
            warn!("Movie {} already exists", movie.title);
            return Redirect::to(redirect::MOVIES_FAIL);
        }
        Err(e) => {
            error!("Failed to check movie {}: {}", movie.title, e);
            return Redirect::to(redirect::MOVIES_FAIL);
        }
    }

    match state.movie_service.save_or_update_movie(&movie).await {
        Ok(_) => Redirect::to(redirect::MOVIES_SUCCESS),
        Err(e) => {
            error!("Failed to save movie {}: {}", movie.title, e);
            Redirect::to(redirect::MOVIES_FAIL)
        }
    }
}

/// Post a review on a movie page
pub async fn add_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<ReviewForm>,
) -> Redirect {
    info!("URL request: {}", route::REVIEW);
    let target = redirect::movie(&form.code);

    match state
        .review_service
        .add_review(&principal.name, &form.code, &form.comment)
        .await
    {
        Ok(_) => Redirect::to(&target),
        Err(e) => {
            warn!("Failed to add review on {}: {}", form.code, e);
            Redirect::to(&format!("{}?success=false", target))
        }
    }
}
