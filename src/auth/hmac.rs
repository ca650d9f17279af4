//! Server-to-server HMAC gate.
//!
//! The game backend signs `"{timestamp}.{raw_body}"` with a shared secret and
//! sends the hex digest in `X-Brain-Signature`. Only after the signature
//! verifies is the `user_id` field inside the body considered trustworthy.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{error::ServiceError, state::SharedState};

pub const TIMESTAMP_HEADER: &str = "x-brain-timestamp";
pub const SIGNATURE_HEADER: &str = "x-brain-signature";

/// Maximum allowed clock skew between signer and verifier.
const MAX_SKEW_MS: i64 = 5 * 60 * 1000;
/// Signed bodies are small JSON documents; anything bigger is hostile.
const MAX_BODY_BYTES: usize = 64 * 1024;

type HmacSha256 = Hmac<Sha256>;

/// Verify the timestamped body signature, then replay the body downstream.
pub async fn require_server_signature(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let Some(secret) = state.config.hmac_secret.as_deref() else {
        return Err(ServiceError::auth(
            "server authentication is not configured",
        ));
    };

    let (parts, body) = request.into_parts();

    let timestamp_ms = parts
        .headers
        .get(TIMESTAMP_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or_else(|| ServiceError::auth("missing or malformed timestamp header"))?;

    if (Utc::now().timestamp_millis() - timestamp_ms).abs() > MAX_SKEW_MS {
        return Err(ServiceError::auth("signature timestamp outside window"));
    }

    let signature_hex = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("sha256="))
        .ok_or_else(|| ServiceError::auth("missing or malformed signature header"))?;

    let body_bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ServiceError::validation("request body too large"))?;

    if !verify(secret.as_bytes(), timestamp_ms, &body_bytes, signature_hex) {
        return Err(ServiceError::auth("invalid request signature"));
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}

/// Compute the hex signature for a timestamped body. The signing side of
/// [`verify`]; exercised by tests and useful for local tooling.
pub fn sign(secret: &[u8], timestamp_ms: i64, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(timestamp_ms.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Constant-time verification of a hex signature over `"{timestamp}.{body}"`.
pub fn verify(secret: &[u8], timestamp_ms: i64, body: &[u8], signature_hex: &str) -> bool {
    let Some(signature) = decode_hex(signature_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(timestamp_ms.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(value.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"brain-to-brain";

    #[test]
    fn test_sign_verify_round_trip() {
        let body = br#"{"user_id":"coach-7","overall_rating":71}"#;
        let ts = 1_764_000_000_000;
        let signature = sign(SECRET, ts, body);
        assert!(verify(SECRET, ts, body, &signature));
    }

    #[test]
    fn test_tampered_body_fails() {
        let ts = 1_764_000_000_000;
        let signature = sign(SECRET, ts, b"{\"user_id\":\"coach-7\"}");
        assert!(!verify(SECRET, ts, b"{\"user_id\":\"coach-8\"}", &signature));
    }

    #[test]
    fn test_shifted_timestamp_fails() {
        let body = b"{}";
        let signature = sign(SECRET, 1_000, body);
        assert!(!verify(SECRET, 2_000, body, &signature));
    }

    #[test]
    fn test_garbage_signature_fails() {
        assert!(!verify(SECRET, 1_000, b"{}", "sha256=nothex"));
        assert!(!verify(SECRET, 1_000, b"{}", "abc"));
        assert!(!verify(SECRET, 1_000, b"{}", ""));
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("00ff10"), Some(vec![0x00, 0xff, 0x10]));
        assert_eq!(decode_hex("0"), None);
        assert_eq!(decode_hex("zz"), None);
    }
}
