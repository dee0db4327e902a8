//! In-memory service fakes and request helpers for router tests

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{ServiceError, ServiceResult},
    models::{
        Movie, MovieDetails, MovieInput, MovieSuggestion, NewUser, Principal, Review, Role, User,
        UserProfile, vote::average_rating,
    },
    routes::create_router,
    services::{MovieService, ReviewService, UserService, VoteService},
    session::SessionStore,
    state::AppState,
    validation,
};

/// Password given to users created by `TestApp::login_as_*`
pub const TEST_PASSWORD: &str = "password";

struct StoredUser {
    user: User,
    password: String,
    quote: Option<String>,
}

#[derive(Default)]
struct Data {
    next_id: i64,
    movies: Vec<Movie>,
    users: Vec<StoredUser>,
    reviews: Vec<Review>,
    votes: HashMap<(i64, String), i32>,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn reviews_of(&self, name: &str) -> Vec<Review> {
        self.reviews
            .iter()
            .filter(|r| r.author == name)
            .cloned()
            .collect()
    }

    fn profile(&self, stored: &StoredUser) -> UserProfile {
        UserProfile {
            user: stored.user.clone(),
            quote: stored.quote.clone(),
            reviews: self.reviews_of(&stored.user.name),
        }
    }
}

#[derive(Clone, Default)]
struct Store(Arc<Mutex<Data>>);

impl Store {
    fn lock(&self) -> MutexGuard<'_, Data> {
        self.0.lock().unwrap()
    }
}

pub struct FakeMovieService {
    store: Store,
    popular_limit: usize,
}

impl FakeMovieService {
    pub fn add(&self, code: &str, title: &str, published: Option<(i32, u32, u32)>, rating: i32) {
        let mut data = self.store.lock();
        let id = data.next_id();
        data.movies.push(Movie {
            id,
            code: code.to_string(),
            title: title.to_string(),
            published_date: published.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            rating,
            vote_count: 0,
            synopsis: None,
            trailer_url: None,
        });
    }

    pub fn get(&self, code: &str) -> Option<Movie> {
        self.store
            .lock()
            .movies
            .iter()
            .find(|m| m.code == code)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.store.lock().movies.len()
    }
}

#[async_trait]
impl MovieService for FakeMovieService {
    async fn search_movie_details_by_id(&self, code: &str) -> ServiceResult<MovieDetails> {
        let data = self.store.lock();
        let movie = data
            .movies
            .iter()
            .find(|m| m.code == code)
            .cloned()
            .ok_or(ServiceError::NotFound("Movie"))?;
        let reviews = data
            .reviews
            .iter()
            .filter(|r| r.movie_code == code)
            .cloned()
            .collect();

        Ok(MovieDetails { movie, reviews })
    }

    async fn search_movie_by_title(&self, title: &str) -> ServiceResult<Vec<Movie>> {
        let needle = title.to_lowercase();
        Ok(self
            .store
            .lock()
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_popular_movies(&self) -> ServiceResult<Vec<Movie>> {
        let mut movies = self.store.lock().movies.clone();
        movies.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then(b.vote_count.cmp(&a.vote_count))
                .then(a.title.cmp(&b.title))
        });
        movies.truncate(self.popular_limit);
        Ok(movies)
    }

    async fn get_all_movies(&self) -> ServiceResult<Vec<Movie>> {
        let mut movies = self.store.lock().movies.clone();
        movies.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(movies)
    }

    async fn delete_movie(&self, code: &str) -> ServiceResult<()> {
        let mut data = self.store.lock();
        let before = data.movies.len();
        data.movies.retain(|m| m.code != code);
        if data.movies.len() == before {
            return Err(ServiceError::NotFound("Movie"));
        }
        data.reviews.retain(|r| r.movie_code != code);
        Ok(())
    }

    async fn check_if_movie_exists(&self, movie: &MovieInput) -> ServiceResult<bool> {
        Ok(self.store.lock().movies.iter().any(|m| {
            m.title.to_lowercase() == movie.title.to_lowercase()
                && m.published_date == movie.published_date
                && movie.code.as_deref() != Some(m.code.as_str())
        }))
    }

    async fn save_or_update_movie(&self, input: &MovieInput) -> ServiceResult<Movie> {
        let mut data = self.store.lock();

        if let Some(code) = input.code.as_deref() {
            if let Some(movie) = data.movies.iter_mut().find(|m| m.code == code) {
                movie.title = input.title.clone();
                movie.published_date = input.published_date;
                movie.synopsis = input.synopsis.clone();
                movie.trailer_url = input.trailer_url.clone();
                return Ok(movie.clone());
            }
        }

        let id = data.next_id();
        let movie = Movie {
            id,
            code: input
                .code
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            title: input.title.clone(),
            published_date: input.published_date,
            rating: 0,
            vote_count: 0,
            synopsis: input.synopsis.clone(),
            trailer_url: input.trailer_url.clone(),
        };
        data.movies.push(movie.clone());
        Ok(movie)
    }

    async fn search_autocomplete_movies(
        &self,
        title: &str,
    ) -> ServiceResult<Vec<MovieSuggestion>> {
        if title.trim().is_empty() {
            return Ok(Vec::new());
        }
        let movies = self.search_movie_by_title(title.trim()).await?;
        Ok(movies.iter().map(MovieSuggestion::from).collect())
    }
}

/// Vote fake that counts every call reaching it
pub struct FakeVoteService {
    store: Store,
    calls: AtomicUsize,
}

impl FakeVoteService {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoteService for FakeVoteService {
    async fn rate_movie(&self, user_name: &str, code: &str, rating: i32) -> ServiceResult<i32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        validation::validate_rating(rating).map_err(|msg| ServiceError::invalid("rating", msg))?;

        let mut data = self.store.lock();
        let user_id = data
            .users
            .iter()
            .find(|u| u.user.name == user_name)
            .map(|u| u.user.id)
            .ok_or(ServiceError::NotFound("User"))?;
        if !data.movies.iter().any(|m| m.code == code) {
            return Err(ServiceError::NotFound("Movie"));
        }

        data.votes.insert((user_id, code.to_string()), rating);
        let ratings: Vec<i32> = data
            .votes
            .iter()
            .filter(|((_, c), _)| c == code)
            .map(|(_, r)| *r)
            .collect();
        let aggregate = average_rating(&ratings);

        if let Some(movie) = data.movies.iter_mut().find(|m| m.code == code) {
            movie.rating = aggregate;
            movie.vote_count = ratings.len() as i32;
        }

        Ok(aggregate)
    }
}

/// User fake keeping plain-text passwords
pub struct FakeUserService {
    store: Store,
}

impl FakeUserService {
    /// Store a standard user and return its id
    pub fn add(&self, name: &str, email: &str, password: &str) -> i64 {
        self.insert(name, email, password, Role::User)
    }

    fn insert(&self, name: &str, email: &str, password: &str, role: Role) -> i64 {
        let mut data = self.store.lock();
        let id = data.next_id();
        data.users.push(StoredUser {
            user: User {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password_hash: String::new(),
                role,
                enabled: true,
                created_at: Utc::now(),
            },
            password: password.to_string(),
            quote: None,
        });
        id
    }

    pub fn count(&self) -> usize {
        self.store.lock().users.len()
    }

    pub fn id_of(&self, name: &str) -> Option<i64> {
        self.store
            .lock()
            .users
            .iter()
            .find(|u| u.user.name == name)
            .map(|u| u.user.id)
    }

    pub fn password_is(&self, name: &str, password: &str) -> bool {
        self.store
            .lock()
            .users
            .iter()
            .any(|u| u.user.name == name && u.password == password)
    }
}

#[async_trait]
impl UserService for FakeUserService {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.store.lock().users.iter().map(|u| u.user.clone()).collect())
    }

    async fn search_user_by_id(&self, id: i64) -> ServiceResult<User> {
        self.store
            .lock()
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone())
            .ok_or(ServiceError::NotFound("User"))
    }

    async fn search_user_with_reviews_by_id(&self, id: i64) -> ServiceResult<UserProfile> {
        let data = self.store.lock();
        data.users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| data.profile(u))
            .ok_or(ServiceError::NotFound("User"))
    }

    async fn search_user_with_reviews_by_name(&self, name: &str) -> ServiceResult<UserProfile> {
        let data = self.store.lock();
        data.users
            .iter()
            .find(|u| u.user.name == name)
            .map(|u| data.profile(u))
            .ok_or(ServiceError::NotFound("User"))
    }

    async fn search_user_by_name(&self, name: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .store
            .lock()
            .users
            .iter()
            .find(|u| u.user.name == name)
            .map(|u| u.user.clone()))
    }

    async fn search_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .store
            .lock()
            .users
            .iter()
            .find(|u| u.user.email.eq_ignore_ascii_case(email))
            .map(|u| u.user.clone()))
    }

    async fn save_user(&self, user: &NewUser) -> ServiceResult<User> {
        validation::validate_new_user(user).into_result()?;
        if self.search_user_by_name(&user.name).await?.is_some()
            || self.search_user_by_email(&user.email).await?.is_some()
        {
            return Err(ServiceError::Conflict("User"));
        }

        let id = self.add(&user.name, &user.email, &user.password);
        self.search_user_by_id(id).await
    }

    async fn save_or_update_quote(&self, user_name: &str, quote: &str) -> ServiceResult<()> {
        let mut data = self.store.lock();
        let stored = data
            .users
            .iter_mut()
            .find(|u| u.user.name == user_name)
            .ok_or(ServiceError::NotFound("User"))?;
        let quote = quote.trim();
        stored.quote = (!quote.is_empty()).then(|| quote.to_string());
        Ok(())
    }

    async fn check_user_password(&self, email: &str, password: &str) -> ServiceResult<bool> {
        Ok(self.store.lock().users.iter().any(|u| {
            u.user.enabled && u.user.email.eq_ignore_ascii_case(email) && u.password == password
        }))
    }

    async fn update_user_password(
        &self,
        user_name: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        validation::validate_password(new_password)
            .map_err(|msg| ServiceError::invalid("new_password", msg))?;

        let mut data = self.store.lock();
        let stored = data
            .users
            .iter_mut()
            .find(|u| u.user.name == user_name)
            .ok_or(ServiceError::NotFound("User"))?;
        stored.password = new_password.to_string();
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        let mut data = self.store.lock();
        let before = data.users.len();
        data.users.retain(|u| u.user.id != id);
        if data.users.len() == before {
            return Err(ServiceError::NotFound("User"));
        }
        data.votes.retain(|(user_id, _), _| *user_id != id);
        Ok(())
    }
}

pub struct FakeReviewService {
    store: Store,
}

impl FakeReviewService {
    /// Store a review directly and return its id
    pub fn add(&self, author: &str, code: &str, comment: &str) -> i64 {
        let mut data = self.store.lock();
        let id = data.next_id();
        let movie_title = data
            .movies
            .iter()
            .find(|m| m.code == code)
            .map(|m| m.title.clone())
            .unwrap_or_default();
        data.reviews.push(Review {
            id,
            comment: comment.to_string(),
            author: author.to_string(),
            movie_code: code.to_string(),
            movie_title,
            created_at: Utc::now(),
        });
        id
    }

    pub fn count(&self) -> usize {
        self.store.lock().reviews.len()
    }
}

#[async_trait]
impl ReviewService for FakeReviewService {
    async fn add_review(
        &self,
        user_name: &str,
        code: &str,
        comment: &str,
    ) -> ServiceResult<Review> {
        validation::validate_comment(comment)
            .map_err(|msg| ServiceError::invalid("comment", msg))?;
        if !self.store.lock().movies.iter().any(|m| m.code == code) {
            return Err(ServiceError::NotFound("Movie"));
        }

        let id = self.add(user_name, code, comment);
        self.store
            .lock()
            .reviews
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound("Review"))
    }

    async fn delete_review(&self, principal: &Principal, review_id: i64) -> ServiceResult<()> {
        let mut data = self.store.lock();
        let review = data
            .reviews
            .iter()
            .find(|r| r.id == review_id)
            .ok_or(ServiceError::NotFound("Review"))?;
        if !principal.may_modify(&review.author) {
            return Err(ServiceError::Forbidden);
        }
        data.reviews.retain(|r| r.id != review_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Principal>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, principal: &Principal) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(token.clone(), principal.clone());
        Ok(token)
    }

    async fn get_session(&self, token: &str) -> Result<Option<Principal>> {
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }
}

/// Router wired to in-memory fakes sharing one store
pub struct TestApp {
    pub movies: Arc<FakeMovieService>,
    pub users: Arc<FakeUserService>,
    pub votes: Arc<FakeVoteService>,
    pub reviews: Arc<FakeReviewService>,
    pub sessions: Arc<MemorySessionStore>,
    state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::default();
        let store = Store::default();

        let movies = Arc::new(FakeMovieService {
            store: store.clone(),
            popular_limit: config.catalog.popular_limit as usize,
        });
        let users = Arc::new(FakeUserService {
            store: store.clone(),
        });
        let votes = Arc::new(FakeVoteService {
            store: store.clone(),
            calls: AtomicUsize::new(0),
        });
        let reviews = Arc::new(FakeReviewService { store });
        let sessions = Arc::new(MemorySessionStore::default());

        let state = AppState {
            config: Arc::new(config),
            movie_service: movies.clone(),
            user_service: users.clone(),
            vote_service: votes.clone(),
            review_service: reviews.clone(),
            sessions: sessions.clone(),
        };

        Self {
            movies,
            users,
            votes,
            reviews,
            sessions,
            state,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Sign in a standard user, creating it on first use; returns the cookie header value
    pub async fn login_as_user(&self, name: &str) -> String {
        self.login_as(name, Role::User).await
    }

    pub async fn login_as_admin(&self, name: &str) -> String {
        self.login_as(name, Role::Admin).await
    }

    async fn login_as(&self, name: &str, role: Role) -> String {
        let id = match self.users.id_of(name) {
            Some(id) => id,
            None => self
                .users
                .insert(name, &format!("{}@example.com", name), TEST_PASSWORD, role),
        };

        let principal = Principal {
            id,
            name: name.to_string(),
            role,
        };
        let token = self.sessions.create_session(&principal).await.unwrap();
        format!("{}={}", self.state.config.session.cookie_name, token)
    }
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_request_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Url-encoded form POST, optionally signed in
pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Run one request through the router
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}
