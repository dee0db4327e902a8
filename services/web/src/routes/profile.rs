//! Profile routes for the signed-in user

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use tracing::{error, info, warn};

use super::FlashQuery;
use crate::{
    AppState,
    error::{ApiResult, ServiceError},
    models::{PasswordForm, Principal, QuoteForm},
    paths::{model, page, redirect, route},
    view::View,
};

/// Own profile with quote and reviews
pub async fn show_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(flash): Query<FlashQuery>,
) -> ApiResult<View> {
    info!("URL request: {}", route::PROFILE);
    let user = state
        .user_service
        .search_user_with_reviews_by_name(&principal.name)
        .await?;

    Ok(View::new(page::PROFILE)
        .with(model::USER, user)
        .with(model::PRINCIPAL, &principal)
        .with_opt(model::SUCCESS, flash.success))
}

pub async fn update_quote(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<QuoteForm>,
) -> Redirect {
    info!("URL request: {}", route::PROFILE);

    match state
        .user_service
        .save_or_update_quote(&principal.name, &form.quote)
        .await
    {
        Ok(()) => Redirect::to(redirect::PROFILE_SUCCESS),
        Err(e) => {
            error!("Failed to update quote of {}: {}", principal.name, e);
            Redirect::to(redirect::PROFILE_FAIL)
        }
    }
}

/// Change the password after checking the current one
pub async fn update_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<PasswordForm>,
) -> ApiResult<Redirect> {
    info!("URL request: {}", route::PROFILE_PASSWORD);

    let Some(user) = state
        .user_service
        .search_user_by_name(&principal.name)
        .await?
    else {
        return Ok(Redirect::to(redirect::PROFILE_FAIL));
    };

    if !state
        .user_service
        .check_user_password(&user.email, &form.current_password)
        .await?
    {
        warn!("Wrong current password for {}", principal.name);
        return Ok(Redirect::to(redirect::PROFILE_FAIL));
    }

    match state
        .user_service
        .update_user_password(&principal.name, &form.new_password)
        .await
    {
        Ok(()) => Ok(Redirect::to(redirect::PROFILE_SUCCESS)),
        Err(ServiceError::Validation(_)) => Ok(Redirect::to(redirect::PROFILE_FAIL)),
        Err(e) => {
            error!("Failed to update password of {}: {}", principal.name, e);
            Ok(Redirect::to(redirect::PROFILE_FAIL))
        }
    }
}

/// Delete a review written by the principal, or any review for admins
pub async fn remove_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(review_id): Path<i64>,
) -> Redirect {
    info!("URL request: {}", route::DELETE_PROFILE_REVIEW);

    match state.review_service.delete_review(&principal, review_id).await {
        Ok(()) => Redirect::to(redirect::PROFILE_SUCCESS),
        Err(ServiceError::Forbidden) => {
            warn!("{} may not delete review {}", principal.name, review_id);
            Redirect::to(redirect::PROFILE_FAIL)
        }
        Err(ServiceError::NotFound(_)) => Redirect::to(redirect::PROFILE_FAIL),
        Err(e) => {
            error!("Failed to delete review {}: {}", review_id, e);
            Redirect::to(redirect::PROFILE_FAIL)
        }
    }
}
