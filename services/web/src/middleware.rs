//! Session resolution and role gates

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{error, warn};

use crate::{
    error::{ApiError, ServiceError},
    models::Principal,
    paths::redirect,
    state::AppState,
};

/// Attach the session principal, if any, to the request extensions
///
/// Unknown or expired tokens leave the request anonymous. The principal is
/// re-read from the user store, so a session outliving its account is dropped.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        match state.sessions.get_session(cookie.value()).await {
            Ok(Some(principal)) => {
                if let Some(current) =
                    current_principal(&state, cookie.value(), &principal).await
                {
                    req.extensions_mut().insert(current);
                }
            }
            Ok(None) => {}
            Err(e) => error!("Failed to load session: {}", e),
        }
    }

    next.run(req).await
}

/// Principal of the account behind a session, `None` once the account is gone
async fn current_principal(
    state: &AppState,
    token: &str,
    stored: &Principal,
) -> Option<Principal> {
    match state.user_service.search_user_by_id(stored.id).await {
        Ok(user) if user.enabled && user.name == stored.name => Some(Principal::from(&user)),
        Ok(_) | Err(ServiceError::NotFound(_)) => {
            warn!("Dropping stale session of {}", stored.name);
            if let Err(e) = state.sessions.delete_session(token).await {
                error!("Failed to delete session: {}", e);
            }
            None
        }
        Err(e) => {
            error!("Failed to load user {}: {}", stored.id, e);
            None
        }
    }
}

/// Send anonymous requests to the login page
pub async fn require_user(req: Request, next: Next) -> Response {
    if req.extensions().get::<Principal>().is_none() {
        return Redirect::to(redirect::LOGIN).into_response();
    }

    next.run(req).await
}

/// Admin-only routes: anonymous requests go to login, other roles are refused
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let principal = req.extensions().get::<Principal>().cloned();

    match principal {
        None => Ok(Redirect::to(redirect::LOGIN).into_response()),
        Some(principal) if !principal.is_admin() => {
            warn!(
                "{} denied access to {}",
                principal.name,
                req.uri().path()
            );
            Err(ApiError::Forbidden)
        }
        Some(_) => Ok(next.run(req).await),
    }
}
