//! Error types for the TD Ameritrade API client.
//!
//! Every public operation in this crate returns [`Result`], so a call either
//! produces its data or exactly one [`Error`]. Each error carries a stable
//! machine-readable [`code`](Error::code) alongside its human-readable
//! message.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for TD Ameritrade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback message used when a failure carries no usable description.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// The main error type for all TD Ameritrade API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-2xx response
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// The OAuth endpoint answered without an access token
    #[error("ACCESS_TOKEN: no access token in authentication response")]
    MissingAccessToken,

    /// The refresh token has expired; the credentials were cleared and the
    /// user must authenticate again.
    #[error("Refresh token expired; re-authentication required")]
    RefreshTokenExpired,

    /// An order request failed validation before submission
    #[error("INVALID_ORDER_REQUEST: {0}")]
    InvalidOrder(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure without a more specific classification
    #[error("{0}")]
    Unknown(String),
}

impl Error {
    /// Build an [`Error::Unknown`], falling back to [`UNKNOWN_ERROR`] when
    /// no message is available.
    pub fn unknown(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Error::Unknown(m),
            _ => Error::Unknown(UNKNOWN_ERROR.to_string()),
        }
    }

    /// Stable error code for this error.
    ///
    /// # Example
    ///
    /// ```
    /// use tdameritrade_rs::Error;
    ///
    /// let err = Error::InvalidOrder("price is required".into());
    /// assert_eq!(err.code(), "INVALID_ORDER_REQUEST");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            Error::Http(_) => "NETWORK_ERROR",
            Error::Json(_) => "INVALID_RESPONSE",
            Error::Api { .. } => "HTTP_ERROR",
            Error::MissingAccessToken => "ACCESS_TOKEN",
            Error::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            Error::InvalidOrder(_) => "INVALID_ORDER_REQUEST",
            Error::InvalidInput(_) | Error::UrlParse(_) => "INVALID_INPUT",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Unknown(_) => UNKNOWN_ERROR,
        }
    }

    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::MissingAccessToken | Error::RefreshTokenExpired => true,
            Error::Api { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidOrder(_) | Error::InvalidInput(_) | Error::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response.
    ///
    /// TD Ameritrade reports failures as `{"error": "..."}`; some gateways
    /// nest the text under `error.message` or use `message` at the top level.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let detail = body
            .get("error")
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
            .or_else(|| body.get("message").and_then(|m| m.as_str()))
            .or_else(|| body.as_str())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(UNKNOWN_ERROR);

        Error::Api {
            status,
            message: detail.to_string(),
            body,
        }
    }
}
