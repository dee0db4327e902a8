use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod paths;
mod repositories;
mod routes;
mod services;
mod session;
mod state;
mod validation;
mod view;

#[cfg(test)]
mod testing;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool},
    error::DatabaseError,
};
use tokio::net::TcpListener;

use crate::{
    config::AppConfig,
    repositories::{MovieRepository, ReviewRepository, UserRepository, VoteRepository},
    services::{MovieServiceImpl, ReviewServiceImpl, UserServiceImpl, VoteServiceImpl},
    session::RedisSessionStore,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Movie Pick web service");

    let config = AppConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // Initialize session storage
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;
    if !redis_pool.health_check().await? {
        anyhow::bail!("Failed to connect to Redis");
    }

    // Initialize repositories
    let movie_repository = MovieRepository::new(pool.clone());
    let review_repository = ReviewRepository::new(pool.clone());
    let user_repository = UserRepository::new(pool.clone());
    let vote_repository = VoteRepository::new(pool);

    let app_state = AppState {
        movie_service: Arc::new(MovieServiceImpl::new(
            movie_repository.clone(),
            review_repository.clone(),
            config.catalog.clone(),
        )),
        user_service: Arc::new(UserServiceImpl::new(
            user_repository.clone(),
            review_repository.clone(),
        )),
        vote_service: Arc::new(VoteServiceImpl::new(
            vote_repository,
            user_repository,
            movie_repository,
        )),
        review_service: Arc::new(ReviewServiceImpl::new(review_repository)),
        sessions: Arc::new(RedisSessionStore::new(
            redis_pool,
            config.session.ttl_seconds,
        )),
        config: Arc::new(config),
    };

    // Start the web server
    let address = app_state.config.bind_address();
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&address).await?;
    info!("Movie Pick listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
