//! User management and credential checking service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use validator::Validate;

use crate::{
    api::CredentialVerifier,
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a presented password against a stored hash
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Create a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .repository
            .users
            .username_exists(&user.username, None)
            .await?
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = self.hash_password(&user.password)?;
        self.repository
            .users
            .create(&user.username, &password_hash)
            .await
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Replace username and password of an existing user
    pub async fn update_user(&self, id: i32, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .repository
            .users
            .username_exists(&user.username, Some(id))
            .await?
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = self.hash_password(&user.password)?;
        self.repository
            .users
            .update(id, &user.username, &password_hash)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        if !self.repository.users.delete(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialVerifier for UsersService {
    async fn verify(&self, username: &str, password: &str) -> AppResult<bool> {
        let user = match self.repository.users.get_by_username(username).await? {
            Some(user) => user,
            None => return Ok(false),
        };

        match user.password {
            Some(ref hash) => self.verify_password(password, hash),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> UsersService {
        // The pool never connects: these tests only exercise hashing.
        let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/unused").unwrap();
        UsersService::new(Repository::new(pool))
    }

    #[tokio::test]
    async fn hash_then_verify_roundtrip() {
        let service = service();
        let hash = service.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(service.verify_password("correct horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn wrong_password_does_not_verify() {
        let service = service();
        let hash = service.hash_password("correct horse").unwrap();
        assert!(!service.verify_password("battery staple", &hash).unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_internal_error() {
        let service = service();
        assert!(service.verify_password("anything", "not-a-phc-string").is_err());
    }
}
