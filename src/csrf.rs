use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const SESSION_KEY: &str = "csrf_token";

/// Token for the report form. Reuses the session's token so a user with
/// several tabs open can submit from any of them.
pub fn issue_token(session: &Session) -> String {
    if let Ok(Some(token)) = session.get::<String>(SESSION_KEY) {
        return token;
    }
    let token = generate_token();
    if let Err(e) = session.insert(SESSION_KEY, &token) {
        log::warn!("Could not store CSRF token in session: {e}");
    }
    token
}

/// Check a submitted token against the one stored in the session.
pub fn verify(session: &Session, submitted: Option<&str>) -> Result<(), AppError> {
    let stored = session
        .get::<String>(SESSION_KEY)
        .unwrap_or(None)
        .unwrap_or_default();
    let submitted = submitted.unwrap_or_default();
    if stored.is_empty() {
        return Err(AppError::Csrf("no token in session".to_string()));
    }
    if !constant_time_eq(stored.as_bytes(), submitted.as_bytes()) {
        return Err(AppError::Csrf("token mismatch".to_string()));
    }
    Ok(())
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
