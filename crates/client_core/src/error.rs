use reqwest::StatusCode;
use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with an error body; its message is meant for the user.
    #[error(transparent)]
    Api(ApiError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn api(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Api(ApiError::new(code, message))
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api(err) => Some(err.code),
            _ => None,
        }
    }
}

pub(crate) fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::Validation,
        StatusCode::TOO_MANY_REQUESTS => ErrorCode::RateLimited,
        status if status.is_server_error() => ErrorCode::Internal,
        _ => ErrorCode::Unknown,
    }
}

/// Builds the user-facing error for a non-success response. Prefers the
/// server's own `{code, message}` body and falls back to the status line.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    if let Ok(mut api_error) = serde_json::from_str::<ApiError>(body) {
        if api_error.code == ErrorCode::Unknown {
            api_error.code = code_for_status(status);
        }
        return ClientError::Api(api_error);
    }
    let message = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
    ClientError::api(code_for_status(status), message)
}
