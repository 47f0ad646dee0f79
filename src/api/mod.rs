//! API handlers for Biblion REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Pluggable credential check, independent of the HTTP layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns true when the username exists and the presented password
    /// matches the stored hash.
    async fn verify(&self, username: &str, password: &str) -> AppResult<bool>;
}

/// Decode an HTTP Basic `Authorization` header value into (username, password)
fn decode_basic(header: &str) -> AppResult<(String, String)> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::Authentication("Invalid base64 in authorization header".to_string()))?;

    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::Authentication("Credentials are not valid UTF-8".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::Authentication("Malformed basic credentials".to_string()))?;

    Ok((username.to_string(), password.to_string()))
}

/// Check a Basic `Authorization` header against the injected verifier and
/// return the authenticated username.
async fn authorize(header: &str, verifier: &dyn CredentialVerifier) -> AppResult<String> {
    let (username, password) = decode_basic(header)?;

    if verifier.verify(&username, &password).await? {
        Ok(username)
    } else {
        Err(AppError::Authentication("Invalid username or password".to_string()))
    }
}

/// Extractor for the authenticated user on protected routes.
///
/// The two public creation endpoints simply do not take this extractor;
/// every other handler under /api does, so each request is checked
/// statelessly against the stored credentials.
pub struct AuthenticatedUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let username = authorize(header, &state.services.users).await?;

        Ok(AuthenticatedUser(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn basic_header(credentials: &str) -> String {
        format!("Basic {}", STANDARD.encode(credentials))
    }

    #[test]
    fn decodes_valid_basic_credentials() {
        let (username, password) = decode_basic(&basic_header("alice:secret")).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "secret");
    }

    #[test]
    fn password_may_contain_colons() {
        let (username, password) = decode_basic(&basic_header("alice:se:cr:et")).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "se:cr:et");
    }

    #[test]
    fn rejects_non_basic_scheme() {
        assert!(decode_basic("Bearer some.jwt.token").is_err());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_basic("Basic %%%not-base64%%%").is_err());
    }

    #[test]
    fn rejects_credentials_without_colon() {
        let header = format!("Basic {}", STANDARD.encode("alicesecret"));
        assert!(decode_basic(&header).is_err());
    }

    #[tokio::test]
    async fn authorize_accepts_matching_credentials() {
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify()
            .with(eq("alice"), eq("secret"))
            .returning(|_, _| Ok(true));

        let username = authorize(&basic_header("alice:secret"), &verifier).await.unwrap();
        assert_eq!(username, "alice");
    }

    #[tokio::test]
    async fn authorize_rejects_bad_password() {
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify().returning(|_, _| Ok(false));

        let result = authorize(&basic_header("alice:wrong"), &verifier).await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[tokio::test]
    async fn authorize_never_reaches_verifier_on_malformed_header() {
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify().times(0);

        let result = authorize("Basic not-base64!", &verifier).await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }
}
