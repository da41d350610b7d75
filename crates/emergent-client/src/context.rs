//! The per-request context a [`crate::ClientFactory`] draws an auth token
//! and a cancellation signal from.
//!
//! The stdio transport binds one constant token into a `RequestContext` it
//! reuses for the process lifetime; the HTTP transport builds a fresh one
//! per request from the `Authorization` header. Neither transport mutates
//! global auth state — the token only ever lives on the context passed to
//! `ClientFactory::client_for`.

use tokio_util::sync::CancellationToken;

/// Carries the bearer token and cancellation signal for one dispatch.
#[derive(Clone)]
pub struct RequestContext {
    token: Option<String>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Build a context carrying `token`, derived from `parent` for
    /// cancellation (so a top-level shutdown cancels every in-flight
    /// request).
    pub fn new(token: impl Into<String>, parent: &CancellationToken) -> Self {
        Self {
            token: Some(token.into()),
            cancellation: parent.child_token(),
        }
    }

    /// Build a context with no token attached, for tests and for transports
    /// that have not yet authenticated a request.
    pub fn anonymous(parent: &CancellationToken) -> Self {
        Self {
            token: None,
            cancellation: parent.child_token(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_context_has_no_token() {
        let parent = CancellationToken::new();
        let ctx = RequestContext::anonymous(&parent);
        assert!(ctx.token().is_none());
    }

    #[test]
    fn cancelling_parent_cancels_child_context() {
        let parent = CancellationToken::new();
        let ctx = RequestContext::new("tok", &parent);
        assert!(!ctx.cancellation().is_cancelled());
        parent.cancel();
        assert!(ctx.cancellation().is_cancelled());
    }
}
