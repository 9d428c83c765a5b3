//! Error types for the Marvel API client.
//!
//! # Design
//! Errors are split by where they are detected: parameter problems surface
//! before any request leaves the process, transport-level failures carry the
//! raw HTTP status and body, and well-formed envelopes that report a failure
//! carry the API's own code and message. A lookup that matches nothing is not
//! an error; `parse_get` returns `Ok(None)` for it.

/// Why an in-flight call stopped before a response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interruption {
    /// The caller's cancellation token fired.
    #[error("cancelled")]
    Cancelled,
    /// The per-call timeout elapsed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Errors returned by the client, its builders and its parsers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The filter combination cannot be sent, e.g. a one-sided date range.
    #[error("malformed parameters: {0}")]
    MalformedParameters(String),

    /// A string did not match any wire token of the named enum.
    #[error("invalid {kind} value: {value:?}")]
    InvalidEnumValue { kind: &'static str, value: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The envelope was well formed but flagged a server-side failure.
    #[error("API error {code}: {message}")]
    ApiError { code: String, message: String },

    /// A 2xx response whose body is not the expected envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The caller's context stopped the call before a response arrived.
    #[error("request {0}")]
    CancelledOrTimedOut(Interruption),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Settings could not be read or the HTTP client could not be built.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn invalid_enum(kind: &'static str, value: impl Into<String>) -> Self {
        ClientError::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = ClientError::HttpError {
            status: 409,
            body: "Limit greater than 100.".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 409: Limit greater than 100.");
    }

    #[test]
    fn interruption_display() {
        let err = ClientError::CancelledOrTimedOut(Interruption::DeadlineExceeded);
        assert_eq!(err.to_string(), "request deadline exceeded");
        assert_eq!(Interruption::Cancelled.to_string(), "cancelled");
    }
}
