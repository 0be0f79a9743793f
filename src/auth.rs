use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::AppConfig,
    error::ApiError,
    models::RoleName,
    repository::RepositoryState,
};

/// Name of the http-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Session lifetime. Tokens are implicitly invalidated at expiry.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims
///
/// The payload signed into every session token. Identity and role are embedded
/// at login time; protected handlers trust the signature, not the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's numeric id (users.user_id).
    pub sub: i32,
    /// The username at login time.
    pub username: String,
    /// The role tier at login time.
    pub role: RoleName,
    /// Expiration time. A token is never accepted after this timestamp.
    pub exp: usize,
    /// Issued-at time.
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the output of the
/// extractor below and the input of every authorization decision.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: RoleName,
}

impl AuthUser {
    /// Whether the caller holds the elevated tier.
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }

    /// The single ownership-or-elevation predicate: a caller may act on a
    /// resource they own, or on anything when elevated. Every todo handler
    /// routes its authorization branch through this.
    pub fn can_act_on(&self, owner_id: i32) -> bool {
        self.is_elevated() || self.id == owner_id
    }
}

/// AuthUser Extractor Implementation
///
/// Makes AuthUser usable as a handler argument on any protected route. The
/// token is taken from the session cookie, or from a Bearer Authorization
/// header as a fallback for non-browser clients, then decoded and validated
/// against the server secret. No database round trip happens here — identity
/// and role come from the signed claims.
///
/// Rejection: `ApiError::Unauthenticated` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the signing secret).
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        // 1. Token Extraction: session cookie first, Bearer header second.
        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => parts
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .ok_or(ApiError::Unauthenticated)?
                .to_string(),
        };

        // 2. Decode and Validate.
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = match decode::<Claims>(&token, &decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                return Err(match e.kind() {
                    // Expired sessions are the common failure for valid-but-old tokens.
                    ErrorKind::ExpiredSignature => ApiError::Unauthenticated,
                    // Bad signature, malformed token, unknown role string, etc.
                    _ => ApiError::Unauthenticated,
                });
            }
        };

        Ok(AuthUser {
            id: token_data.claims.sub,
            username: token_data.claims.username,
            role: token_data.claims.role,
        })
    }
}

/// issue_token
///
/// Signs a session token for a freshly authenticated user. Expiry is fixed at
/// [`TOKEN_TTL_HOURS`] from now.
pub fn issue_token(
    user_id: i32,
    username: &str,
    role: RoleName,
    secret: &str,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// hash_password
///
/// One-way salted hash of a plaintext password. The cost factor is bcrypt's
/// default (12), above the floor needed to resist offline brute force.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// verify_password
///
/// Library-provided comparison of a plaintext candidate against a stored hash.
/// Never a raw string equality.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))
}

/// require_permission
///
/// The request-scoped authorization guard: checks that the caller's role is
/// associated with the named permission. Pure read against the
/// role/permission association — it must run before any mutation in the
/// protected handler's body.
pub async fn require_permission(
    repo: &RepositoryState,
    caller: &AuthUser,
    permission: &str,
) -> Result<(), ApiError> {
    if repo.role_has_permission(caller.role, permission).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Permission denied".to_string()))
    }
}

/// ensure_elevated
///
/// Gate for the administration endpoints: only the elevated tier passes.
pub fn ensure_elevated(caller: &AuthUser) -> Result<(), ApiError> {
    if caller.is_elevated() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }
}
