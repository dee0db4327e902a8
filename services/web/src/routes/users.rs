//! User management routes, admin only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
};
use tracing::{error, info};

use super::FlashQuery;
use crate::{
    AppState,
    error::{ApiResult, ServiceError},
    paths::{message, model, page, redirect, route},
    view::View,
};

pub async fn get_all_users(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> ApiResult<View> {
    info!("URL request: {}", route::USERS);
    let users = state.user_service.get_all_users().await?;

    Ok(View::new(page::USERS)
        .with(model::USERS, users)
        .with_opt(model::MESSAGE, flash.message))
}

/// User with their reviews
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<View> {
    info!("URL request: {}", route::USER);

    match state.user_service.search_user_with_reviews_by_id(id).await {
        Ok(user) => Ok(View::new(page::USER).with(model::USER, user)),
        Err(ServiceError::NotFound(_)) => Ok(View::new(page::USER)
            .with(model::MESSAGE, message::USER_NOT_FOUND)
            .with_status(StatusCode::NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

pub async fn remove_user(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    info!("URL request: {}", route::DELETE_USER);

    let status = match state.user_service.delete_user(id).await {
        Ok(()) => message::SUCCESS,
        Err(ServiceError::NotFound(_)) => message::USER_NOT_FOUND,
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            message::FAIL
        }
    };

    Redirect::to(&redirect::users_with_message(status))
}
