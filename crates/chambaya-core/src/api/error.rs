//! Structured API errors.

use std::fmt;

use serde_json::Value;

/// Categories of API errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection refused, DNS, TLS and other transport failures
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// Non-2xx HTTP status
    HttpStatus,
    /// Body could not be decoded into the expected shape
    Parse,
    /// Server answered 2xx but reported failure (`ok: false`, missing data)
    Api,
    /// Request could not be built from local input (e.g. unreadable upload)
    Request,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Api => write!(f, "api"),
            ApiErrorKind::Request => write!(f, "request"),
        }
    }
}

/// Error returned by every [`super::ApiClient`] call.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
    /// Raw body or underlying error text
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Creates an HTTP status error, preferring the server's `message`.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        let message = match server_message {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };

        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            status: Some(status),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Maps a transport-level failure.
    pub fn transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ApiErrorKind::Timeout
        } else {
            ApiErrorKind::Network
        };
        Self {
            kind,
            message: format!("{kind} error: {err}"),
            status: None,
            details: None,
        }
    }

    pub fn parse(err: &serde_json::Error, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: format!("Failed to parse response: {err}"),
            status: None,
            details: Some(body.to_string()),
        }
    }

    /// Server-side failure reported inside a 2xx response.
    pub fn api(message: Option<&str>) -> Self {
        Self::new(
            ApiErrorKind::Api,
            message.unwrap_or("Invalid server response"),
        )
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Request, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
