//! The resilient backend client (§4.A/4.B/4.C): a typed façade over the
//! graph REST API with per-request auth, two-phase retry, and dual-ID
//! reconciliation.
//!
//! Grounded on an async `reqwest`-backed façade — the teacher's own
//! backend collaborator talks ZeroMQ because its graph backend is
//! in-process, but this spec's backend is an HTTPS REST service (§6.3), so
//! we reach for `reqwest` the way `EffortlessMetrics-agent-backplane` and
//! `web3infra-foundation-git-internal` do in this corpus.

mod client;
mod context;
mod error;
mod reconcile;
mod retry;
mod wire;

pub use client::{BackendClient, ClientFactory};
pub use context::RequestContext;
pub use error::ClientError;
pub use reconcile::{canonicalize_edge_ids, pick_canonical, IdSet, ObjectIndex};
pub use retry::{with_retry, RetryPolicy};
pub use wire::EdgeDirection;
