//! Login and logout routes

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::ApiResult,
    models::{LoginForm, Principal},
    paths::{model, page, redirect, route},
    view::View,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    pub error: Option<bool>,
    pub logout: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(route::LOGIN, get(show_login).post(login))
        .route(route::LOGOUT, get(logout))
}

/// Login page
pub async fn show_login(Query(query): Query<LoginQuery>) -> View {
    info!("URL request: {}", route::LOGIN);

    View::new(page::LOGIN)
        .with_opt(model::ERROR, query.error)
        .with_opt(model::LOGOUT, query.logout)
}

/// Check credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    info!("URL request: {}", route::LOGIN);

    if !state
        .user_service
        .check_user_password(&form.email, &form.password)
        .await?
    {
        warn!("Failed login for {}", form.email);
        return Ok(Redirect::to(redirect::LOGIN_FAILED).into_response());
    }

    let Some(user) = state.user_service.search_user_by_email(&form.email).await? else {
        return Ok(Redirect::to(redirect::LOGIN_FAILED).into_response());
    };

    let token = match state.sessions.create_session(&Principal::from(&user)).await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to create session for {}: {}", user.name, e);
            return Ok(Redirect::to(redirect::LOGIN_FAILED).into_response());
        }
    };

    let cookie = Cookie::build((state.config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    info!("User {} signed in", user.name);
    Ok((jar.add(cookie), Redirect::to(redirect::INDEX)).into_response())
}

/// Drop the session and its cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    info!("URL request: {}", route::LOGOUT);
    let cookie_name = state.config.session.cookie_name.clone();

    if let Some(cookie) = jar.get(&cookie_name) {
        if let Err(e) = state.sessions.delete_session(cookie.value()).await {
            error!("Failed to delete session: {}", e);
        }
    }

    let jar = jar.remove(Cookie::build(cookie_name).path("/"));
    (jar, Redirect::to(redirect::LOGGED_OUT)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::testing::{TestApp, form_request, get_request, get_request_with_cookie, send};

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let app = TestApp::new();
        app.users.add("alice", "alice@example.com", "secret1");

        let (status, headers, _) = send(
            app.router(),
            form_request("/login", "email=alice@example.com&password=secret1", None),
        )
        .await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/index");
        let cookie = headers["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("MPSESSION="));
        assert!(cookie.contains("HttpOnly"));

        let session = cookie.split(';').next().unwrap().to_string();
        let (status, _, body) =
            send(app.router(), get_request_with_cookie("/profile", &session)).await;
        let json: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["model"]["user"]["name"], "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_redirects_with_error() {
        let app = TestApp::new();
        app.users.add("alice", "alice@example.com", "secret1");

        let (status, headers, _) = send(
            app.router(),
            form_request("/login", "email=alice@example.com&password=nope", None),
        )
        .await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/login?error=true");
        assert!(headers.get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_login_page_echoes_flags() {
        let app = TestApp::new();

        let (_, _, body) = send(app.router(), get_request("/login?logout=true")).await;
        let json: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["view"], "login");
        assert_eq!(json["model"]["logout"], true);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = TestApp::new();
        let cookie = app.login_as_user("alice").await;

        let (status, headers, _) =
            send(app.router(), get_request_with_cookie("/logout", &cookie)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/login?logout=true");

        let (status, headers, _) =
            send(app.router(), get_request_with_cookie("/profile", &cookie)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/login");
    }
}
