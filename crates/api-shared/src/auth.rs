/// Staff API key validation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("staff API key not configured")]
    NotConfigured,
    #[error("missing API key")]
    Missing,
    #[error("invalid API key")]
    Invalid,
}

/// Validates a provided API key against the configured expected key.
///
/// The expected key is resolved once at startup and passed in; this function
/// never reads the environment.
///
/// Returns `Ok(())` if the key is valid, or an error if invalid or missing.
pub fn validate_api_key(
    provided_key: Option<&str>,
    expected_key: Option<&str>,
) -> Result<(), AuthError> {
    let expected = expected_key.ok_or(AuthError::NotConfigured)?;
    let provided = provided_key.ok_or(AuthError::Missing)?;

    if provided == expected {
        Ok(())
    } else {
        Err(AuthError::Invalid)
    }
}
