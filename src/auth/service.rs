use crate::auth::password;
use crate::config::AuthConfig;
use crate::db::models::{User, UserProfile};
use crate::db::store::CredentialStore;
use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{encode, decode, Header, EncodingKey, DecodingKey, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Username
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

impl Claims {
    pub fn new(username: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: username.to_string(),
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

/// A user resolved from a valid bearer token, attached to the request for downstream handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub username: String,
    pub profile: UserProfile,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            profile: user.profile(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
}

pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    password_cost: u32,
    // Verified against when the username is unknown, so both login failures do the same work.
    dummy_hash: Option<String>,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let dummy_hash = password::hash_password_with_cost("dummy-password", config.password_cost)
            .map_err(|e| error!(error = %e, "failed to prepare dummy password hash"))
            .ok();

        Self {
            credentials,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            token_ttl: Duration::hours(config.token_expiry_hours),
            password_cost: config.password_cost,
            dummy_hash,
        }
    }

    /// Check a username/password pair and issue a token for it.
    ///
    /// An unknown username and a wrong password both yield [`AuthError::InvalidCredentials`].
    pub async fn login(&self, username: &str, plaintext: &str) -> Result<LoginResponse, AuthError> {
        let user = self.credentials.find_by_username(username).await?;

        let stored_hash = match &user {
            Some(user) => Some(user.password_hash.clone()),
            None => self.dummy_hash.clone(),
        };
        let matched = match stored_hash {
            Some(hash) => self.verify_password(plaintext, hash).await? && user.is_some(),
            None => false,
        };

        let Some(user) = user.filter(|_| matched) else {
            debug!(reason = AuthError::InvalidCredentials.reason(), "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let token = self.issue_token(&user.username)?;
        Ok(LoginResponse {
            user: user.profile(),
            token,
        })
    }

    /// Hash a plaintext password with the configured work factor, off the async executor.
    pub async fn hash_password(&self, plaintext: &str) -> Result<String, AuthError> {
        let plaintext = plaintext.to_string();
        let cost = self.password_cost;
        tokio::task::spawn_blocking(move || password::hash_password_with_cost(&plaintext, cost))
            .await
            .map_err(|e| AuthError::EncodingError(e.to_string()))?
    }

    async fn verify_password(&self, plaintext: &str, hash: String) -> Result<bool, AuthError> {
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
            .await
            .map_err(|e| AuthError::EncodingError(e.to_string()))
    }

    pub fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        let claims = Claims::new(username, Utc::now(), self.token_ttl);
        self.encode_claims(&claims)
    }

    pub fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::EncodingError(e.to_string()))
    }

    /// Verify signature, then expiry. Signature failures win over expiry.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Resolve a bearer token to the identity of a stored user.
    pub async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.decode_token(token)?;

        let user = self
            .credentials
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(Identity::from(&user))
    }

    /// Run the full gate over a raw `Authorization` header value.
    pub async fn verify_bearer(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;

        self.verify_token(token).await
    }
}

/// Pull the token out of a `Bearer <token>` header value. The scheme is case-insensitive.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
