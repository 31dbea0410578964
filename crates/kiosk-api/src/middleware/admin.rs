//! Admin password guard.
//!
//! Admin endpoints accept the password either in the JSON body (the kiosk
//! frontend's convention) or in the `x-admin-password` header. The header
//! wins when both are present.

use axum::http::HeaderMap;
use tracing::warn;

use kiosk_core::config::AdminConfig;
use kiosk_core::error::AppError;

/// Header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Reject the request unless it carries the configured admin password.
pub fn authorize(
    admin: &AdminConfig,
    headers: &HeaderMap,
    body_password: Option<&str>,
) -> Result<(), AppError> {
    let candidate = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .or(body_password);

    match candidate {
        Some(password) if admin.verify(password) => Ok(()),
        _ => {
            warn!("Rejected admin request with invalid password");
            Err(AppError::authentication("Invalid password"))
        }
    }
}
