//! PostgreSQL implementation of the user service

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use async_trait::async_trait;
use tracing::{info, warn};

use super::UserService;
use crate::{
    error::{ServiceError, ServiceResult},
    models::{NewUser, Role, User, UserProfile},
    repositories::{ReviewRepository, UserRepository},
    validation,
};

/// Hash a password with a fresh salt
pub(crate) fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash
pub(crate) fn verify_password(password: &str, password_hash: &str) -> ServiceResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| ServiceError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// User service backed by the user and review repositories
#[derive(Clone)]
pub struct UserServiceImpl {
    users: UserRepository,
    reviews: ReviewRepository,
}

impl UserServiceImpl {
    pub fn new(users: UserRepository, reviews: ReviewRepository) -> Self {
        Self { users, reviews }
    }

    async fn with_reviews(&self, user: User) -> ServiceResult<UserProfile> {
        let quote = self.users.find_quote(user.id).await?;
        let reviews = self.reviews.find_by_user_id(user.id).await?;

        Ok(UserProfile {
            user,
            quote,
            reviews,
        })
    }

    async fn require_by_name(&self, name: &str) -> ServiceResult<User> {
        self.users
            .find_by_name(name)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.find_all().await?)
    }

    async fn search_user_by_id(&self, id: i64) -> ServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }

    async fn search_user_with_reviews_by_id(&self, id: i64) -> ServiceResult<UserProfile> {
        let user = self.search_user_by_id(id).await?;
        self.with_reviews(user).await
    }

    async fn search_user_with_reviews_by_name(&self, name: &str) -> ServiceResult<UserProfile> {
        let user = self.require_by_name(name).await?;
        self.with_reviews(user).await
    }

    async fn search_user_by_name(&self, name: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_name(name.trim()).await?)
    }

    async fn search_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_email(email.trim()).await?)
    }

    async fn save_user(&self, user: &NewUser) -> ServiceResult<User> {
        validation::validate_new_user(user).into_result()?;

        let password_hash = hash_password(&user.password)?;
        self.users
            .create(user.name.trim(), user.email.trim(), &password_hash, Role::User)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    warn!("Duplicate registration for {}", user.name);
                    ServiceError::Conflict("User")
                } else {
                    ServiceError::Database(e)
                }
            })
    }

    async fn save_or_update_quote(&self, user_name: &str, quote: &str) -> ServiceResult<()> {
        let user = self.require_by_name(user_name).await?;
        let quote = quote.trim();
        let quote = (!quote.is_empty()).then_some(quote);

        self.users.upsert_quote(user.id, quote).await?;
        Ok(())
    }

    async fn check_user_password(&self, email: &str, password: &str) -> ServiceResult<bool> {
        match self.users.find_by_email(email.trim()).await? {
            Some(user) if user.enabled => verify_password(password, &user.password_hash),
            _ => Ok(false),
        }
    }

    async fn update_user_password(
        &self,
        user_name: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        if let Err(message) = validation::validate_password(new_password) {
            return Err(ServiceError::invalid("new_password", message));
        }

        let user = self.require_by_name(user_name).await?;
        let password_hash = hash_password(new_password)?;

        if self.users.update_password_hash(user.id, &password_hash).await? {
            info!("Password updated for {}", user.name);
            Ok(())
        } else {
            Err(ServiceError::NotFound("User"))
        }
    }

    async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        if self.users.delete(id).await? {
            info!("Deleted user {}", id);
            Ok(())
        } else {
            Err(ServiceError::NotFound("User"))
        }
    }
}
