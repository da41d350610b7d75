//! The two transports (§4.H, §4.I) that drive the same [`crate::Dispatcher`].
//!
//! Both bind an auth token into an [`emergent_client::RequestContext`]
//! before calling `Dispatcher::dispatch` — stdio binds one constant token
//! for the process lifetime, HTTP extracts a fresh bearer token per
//! request — and neither transport holds any auth state of its own.

pub mod http;
pub mod stdio;
