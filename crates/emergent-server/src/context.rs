//! Per-dispatch context a [`crate::tools::Tool`] executes against.
//!
//! Built once per JSON-RPC dispatch by the [`crate::dispatcher::Dispatcher`]:
//! it resolves the request's auth token into a bound [`BackendClient`] via
//! the shared [`ClientFactory`] (§4.A — "per-request auth... no global
//! mutable auth state").

use emergent_client::BackendClient;

/// Everything a tool needs to do its work for one dispatch.
pub struct ToolContext {
    client: BackendClient,
}

impl ToolContext {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }
}
