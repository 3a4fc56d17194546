//! Provider error types with retry classification.
//!
//! Distinguishes between transient errors (rate limiting, payload too large)
//! that the retry policy re-attempts and everything else, which is surfaced
//! to the caller on first occurrence.

/// Error from a search provider call.
#[derive(Debug, Clone)]
pub struct ProviderError {
    /// The kind of error
    pub kind: ProviderErrorKind,
    /// HTTP status code, if applicable
    pub status_code: Option<u16>,
    /// Error message
    pub message: String,
}

impl ProviderError {
    /// Create a rate limit error (HTTP 429).
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::RateLimited,
            status_code: Some(429),
            message: message.into(),
        }
    }

    /// Create a payload-too-large error (HTTP 413).
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::PayloadTooLarge,
            status_code: Some(413),
            message: message.into(),
        }
    }

    /// Create a server error.
    pub fn server_error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::ServerError,
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Create a client error (bad request, auth, etc.).
    pub fn client_error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::ClientError,
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::NetworkError,
            status_code: None,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::ParseError,
            status_code: None,
            message: message.into(),
        }
    }

    /// Create an error for a request rejected before it reached the provider.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidRequest,
            status_code: None,
            message: message.into(),
        }
    }

    /// Build an error from a non-success HTTP status and response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        match classify_http_status(status) {
            ProviderErrorKind::RateLimited => Self::rate_limited(body),
            ProviderErrorKind::PayloadTooLarge => Self::payload_too_large(body),
            ProviderErrorKind::ClientError => Self::client_error(status, body),
            _ => Self::server_error(status, body),
        }
    }

    /// Check if this error is transient and should be retried.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{} (HTTP {}): {}", self.kind, code, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Classification of provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Rate limited (429) - transient
    RateLimited,
    /// Payload too large (413) - transient, the provider sheds oversized work under load
    PayloadTooLarge,
    /// Client error (400, 401, 403, 404) - permanent
    ClientError,
    /// Server error (5xx) - permanent for this client
    ServerError,
    /// Network error (connection failed, timeout)
    NetworkError,
    /// Response body could not be decoded
    ParseError,
    /// Request rejected locally before any network call
    InvalidRequest,
}

impl ProviderErrorKind {
    /// Only overload signals are retried; everything else is raised immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderErrorKind::RateLimited | ProviderErrorKind::PayloadTooLarge
        )
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderErrorKind::RateLimited => write!(f, "Rate limited"),
            ProviderErrorKind::PayloadTooLarge => write!(f, "Payload too large"),
            ProviderErrorKind::ClientError => write!(f, "Client error"),
            ProviderErrorKind::ServerError => write!(f, "Server error"),
            ProviderErrorKind::NetworkError => write!(f, "Network error"),
            ProviderErrorKind::ParseError => write!(f, "Parse error"),
            ProviderErrorKind::InvalidRequest => write!(f, "Invalid request"),
        }
    }
}

/// Parse HTTP status code into error kind.
pub fn classify_http_status(status: u16) -> ProviderErrorKind {
    match status {
        429 => ProviderErrorKind::RateLimited,
        413 => ProviderErrorKind::PayloadTooLarge,
        400..=499 => ProviderErrorKind::ClientError,
        _ => ProviderErrorKind::ServerError,
    }
}
