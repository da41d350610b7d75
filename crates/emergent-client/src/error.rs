//! The error taxonomy the retry wrapper and tool layer pattern-match on.

use thiserror::Error;

/// Errors raised by a [`crate::BackendClient`] call.
///
/// The retry wrapper classifies these into retryable and non-retryable
/// buckets via [`ClientError::is_retryable`]; the tool layer further maps
/// them onto `isError` `ToolResult`s with a remedy phrase.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad input shape or values. Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested entity does not exist. Non-retryable.
    #[error("not found: {0}")]
    NotFound(String),

    /// No auth token was attached to the request context.
    #[error("no auth token attached to this request")]
    AuthMissing,

    /// The backend rejected the token (401/403).
    #[error("backend rejected credentials (status {0})")]
    AuthRejected(u16),

    /// Network/I/O/backend-5xx failure. Retried per the two-phase policy.
    #[error("transient backend error: {0}")]
    Transient(String),

    /// The request was cancelled while waiting on I/O or a retry sleep.
    #[error("operation cancelled")]
    Cancelled,

    /// A programmer error: malformed response body, logic bug, etc.
    #[error("internal client error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Whether a retry wrapper should retry this error. Matches by error
    /// taxonomy, not string equality: validation, not-found, auth, and
    /// cancellation are never retried; transient failures always are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transient(_))
    }

    /// The user-visible next-action phrase every blocking failure must
    /// carry (§7: "every blocking failure MUST include a remedy phrase").
    pub fn remedy(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "fix the request payload and retry.",
            ClientError::NotFound(_) => "double-check the ID and retry.",
            ClientError::AuthMissing => {
                "attach a bearer token to the request before retrying."
            }
            ClientError::AuthRejected(_) => "supply a valid token and retry.",
            ClientError::Transient(_) => {
                "this is usually transient; the client already retries automatically."
            }
            ClientError::Cancelled => "the operation was cancelled; retry if still needed.",
            ClientError::Internal(_) => "this looks like a bug; report it with the request details.",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return ClientError::Transient(err.to_string());
        }
        if err.is_decode() {
            return ClientError::Internal(format!("failed to decode response body: {err}"));
        }
        if err.is_request() || err.is_body() {
            // Covers dial/refuse/reset/broken-pipe/unreachable-style failures
            // reqwest surfaces as a generic request error.
            return ClientError::Transient(err.to_string());
        }
        ClientError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_is_retryable() {
        assert!(ClientError::Transient("x".into()).is_retryable());
        assert!(!ClientError::Validation("x".into()).is_retryable());
        assert!(!ClientError::NotFound("x".into()).is_retryable());
        assert!(!ClientError::AuthMissing.is_retryable());
        assert!(!ClientError::AuthRejected(403).is_retryable());
        assert!(!ClientError::Cancelled.is_retryable());
        assert!(!ClientError::Internal("x".into()).is_retryable());
    }

    #[test]
    fn every_variant_has_a_remedy() {
        let variants = [
            ClientError::Validation("x".into()),
            ClientError::NotFound("x".into()),
            ClientError::AuthMissing,
            ClientError::AuthRejected(401),
            ClientError::Transient("x".into()),
            ClientError::Cancelled,
            ClientError::Internal("x".into()),
        ];
        for v in variants {
            assert!(!v.remedy().is_empty());
        }
    }
}
