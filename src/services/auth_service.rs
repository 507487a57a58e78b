//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::JwtConfig,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user and issue a token for them
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtConfig,
        username: &str,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> AppResult<(User, String)> {
        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(AppError::AlreadyExists("Username already taken".to_string()));
        }

        if UserRepository::find_by_email(pool, email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(password)?;
        let user = UserRepository::create(pool, username, email, &password_hash, full_name).await?;
        let token = Self::issue_token(&user, jwt)?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok((user, token))
    }

    /// Login with username and password
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtConfig,
        username: &str,
        password: &str,
    ) -> AppResult<(User, String)> {
        let user = UserRepository::find_by_username(pool, username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = Self::issue_token(&user, jwt)?;
        Ok((user, token))
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, user_id: &Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(pool, user_id).await
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Sign a bearer token for `user`
    pub fn issue_token(user: &User, jwt: &JwtConfig) -> AppResult<String> {
        Self::sign(&user.id, &user.username, jwt.expiry_hours, &jwt.secret)
    }

    fn sign(user_id: &Uuid, username: &str, expiry_hours: i64, secret: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    /// Hash password using Argon2
    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_password_round_trip() {
        let hash = AuthService::hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(AuthService::verify_password("hunter22", &hash).unwrap());
        assert!(!AuthService::verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_token_carries_subject() {
        let user_id = Uuid::new_v4();
        let token = AuthService::sign(&user_id, "setter", 1, SECRET).unwrap();

        let claims = AuthService::verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "setter");
    }

    #[test]
    fn test_token_with_wrong_secret_is_invalid() {
        let token = AuthService::sign(&Uuid::new_v4(), "setter", 1, SECRET).unwrap();
        let err = AuthService::verify_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_expired_token() {
        let token = AuthService::sign(&Uuid::new_v4(), "setter", -2, SECRET).unwrap();
        let err = AuthService::verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }
}
