//! Registration routes

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::FlashQuery;
use crate::{
    AppState,
    error::{ApiResult, FieldErrors, ServiceError},
    models::NewUser,
    paths::{message, model, page, redirect, route},
    validation,
    view::View,
};

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    #[serde(rename = "userName")]
    pub user_name: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Registration routes, the availability checks also answer under `/register`
pub fn router() -> Router<AppState> {
    Router::new()
        .route(route::REGISTER, get(show_register).post(register_user))
        .route(route::VALIDATE_USERNAME, get(check_username))
        .route(route::VALIDATE_EMAIL, get(check_email))
        .route(
            &format!("{}{}", route::REGISTER, route::VALIDATE_USERNAME),
            get(check_username),
        )
        .route(
            &format!("{}{}", route::REGISTER, route::VALIDATE_EMAIL),
            get(check_email),
        )
}

/// Empty registration form
pub async fn show_register(Query(flash): Query<FlashQuery>) -> View {
    info!("URL request: {}", route::REGISTER);

    View::new(page::REGISTER)
        .with(model::USER, NewUser::default())
        .with_opt(model::SUCCESS, flash.success)
}

fn register_with_errors(user: &NewUser, errors: &FieldErrors) -> View {
    View::new(page::REGISTER)
        .with(model::USER, user)
        .with(model::ERRORS, errors)
}

/// Register a new standard user
pub async fn register_user(
    State(state): State<AppState>,
    Form(user): Form<NewUser>,
) -> ApiResult<Response> {
    info!("URL request: {}", route::REGISTER);

    let mut errors = validation::validate_new_user(&user);

    if !errors.has_field("name")
        && state
            .user_service
            .search_user_by_name(&user.name)
            .await?
            .is_some()
    {
        errors.add("name", message::USER_EXISTS);
    }

    if !errors.has_field("email")
        && state
            .user_service
            .search_user_by_email(&user.email)
            .await?
            .is_some()
    {
        errors.add("email", message::EMAIL_EXISTS);
    }

    if !errors.is_empty() {
        warn!("Rejected registration of {}", user.name);
        return Ok(register_with_errors(&user, &errors).into_response());
    }

    match state.user_service.save_user(&user).await {
        Ok(saved) => {
            info!("Registered user {}", saved.name);
            Ok(Redirect::to(redirect::REGISTER_SUCCESS).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            Ok(register_with_errors(&user, &errors).into_response())
        }
        Err(ServiceError::Conflict(_)) => {
            warn!("Registration of {} lost a race on name or email", user.name);
            Ok(View::new(page::REGISTER)
                .with(model::USER, &user)
                .with(model::MESSAGE, message::FAIL)
                .into_response())
        }
        Err(e) => {
            error!("Failed to register {}: {}", user.name, e);
            Err(e.into())
        }
    }
}

/// "true" when the user name is still available
pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<String> {
    info!("URL request: {}", route::VALIDATE_USERNAME);
    let taken = state
        .user_service
        .search_user_by_name(&query.user_name)
        .await?
        .is_some();

    Ok((!taken).to_string())
}

/// "true" when the email is still available
pub async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<String> {
    info!("URL request: {}", route::VALIDATE_EMAIL);
    let taken = state
        .user_service
        .search_user_by_email(&query.email)
        .await?
        .is_some();

    Ok((!taken).to_string())
}
