//! User-facing JWT gate.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::{auth::AuthUser, error::ServiceError, state::SharedState};

/// Development-only identity override header. Honored outside production so
/// local clients can act as a user without minting tokens.
const DEV_USER_HEADER: &str = "x-dev-user-id";

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    user_id: Option<String>,
}

/// Require a valid HS256 user token and inject [`AuthUser`] into the request.
///
/// The caller's identity comes exclusively from the token claims (`sub`,
/// falling back to `user_id`); a user id supplied anywhere in the request
/// itself is never trusted on this gate.
pub async fn require_user(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !state.config.is_production() {
        let dev_user = request
            .headers()
            .get(DEV_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(user_id) = dev_user {
            request.extensions_mut().insert(AuthUser { user_id });
            return Ok(next.run(request).await);
        }
    }

    let Some(secret) = state.config.jwt_secret.as_deref() else {
        return Err(ServiceError::auth("user authentication is not configured"));
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::auth("missing bearer token"))?;

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|err| ServiceError::auth(format!("invalid token: {err}")))?;

    let user_id = decoded
        .claims
        .sub
        .or(decoded.claims.user_id)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ServiceError::auth("token carries no user id"))?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    #[test]
    fn test_token_round_trip() {
        let secret = "unit-test-secret";
        let token = encode(
            &Header::new(Algorithm::HS256),
            &TestClaims {
                sub: "coach-42".into(),
                exp: chrono::Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub.as_deref(), Some("coach-42"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &TestClaims {
                sub: "coach-42".into(),
                exp: chrono::Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(b"right"),
        )
        .unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"wrong"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let secret = b"unit-test-secret";
        let token = encode(
            &Header::new(Algorithm::HS256),
            &TestClaims {
                sub: "coach-42".into(),
                exp: chrono::Utc::now().timestamp() - 600,
            },
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
