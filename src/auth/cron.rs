//! Cron-caller gate: a single shared bearer secret.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{auth::constant_time_eq, error::ServiceError, state::SharedState};

/// Require `Authorization: Bearer <CRON_SECRET>`.
pub async fn require_cron(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let Some(secret) = state.config.cron_secret.as_deref() else {
        return Err(ServiceError::auth("cron authentication is not configured"));
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::auth("missing bearer token"))?;

    if !constant_time_eq(token.as_bytes(), secret.as_bytes()) {
        return Err(ServiceError::auth("invalid cron secret"));
    }

    Ok(next.run(request).await)
}
