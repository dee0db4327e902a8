//! Session management using Redis

use anyhow::Result;
use async_trait::async_trait;
use common::cache::RedisPool;
use tracing::info;
use uuid::Uuid;

use crate::models::Principal;

/// Storage for signed-in sessions, keyed by an opaque token
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a session for the principal and return its token
    async fn create_session(&self, principal: &Principal) -> Result<String>;

    /// Principal behind a token, if the session is still alive
    async fn get_session(&self, token: &str) -> Result<Option<Principal>>;

    async fn delete_session(&self, token: &str) -> Result<()>;
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Session store keeping principals in Redis with a TTL
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Create a new session store
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create_session(&self, principal: &Principal) -> Result<String> {
        info!("Creating session for user: {}", principal.name);

        let token = Uuid::new_v4().to_string();
        let value = serde_json::to_string(principal)?;
        self.redis_pool
            .set(&session_key(&token), &value, Some(self.ttl_seconds))
            .await?;

        Ok(token)
    }

    async fn get_session(&self, token: &str) -> Result<Option<Principal>> {
        let value = self.redis_pool.get(&session_key(token)).await?;

        match value {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.redis_pool.delete(&session_key(token)).await?;
        Ok(())
    }
}
