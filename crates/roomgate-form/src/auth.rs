//! Username validation before registration.

use roomgate_protocol::Register;

use crate::AppError;

/// Trims `raw` and turns it into a registration request.
///
/// # Errors
/// Returns [`AppError::UsernameEmpty`] when nothing but whitespace is left.
pub fn validate_username(raw: &str) -> Result<Register, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::UsernameEmpty);
    }
    Ok(Register {
        username: trimmed.to_string(),
    })
}
