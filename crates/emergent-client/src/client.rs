//! The typed backend façade (§4.A) and its per-request factory.

use crate::context::RequestContext;
use crate::error::ClientError;
use crate::reconcile::pick_canonical;
use crate::retry::{with_retry, RetryPolicy};
use crate::wire::*;
use emergent_model::{EntityType, Object};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Owns the one shared HTTP transport (connection pool) and the backend
/// URL. Immutable after construction, per §9 ("the only process-wide state
/// is... the ClientFactory").
#[derive(Clone)]
pub struct ClientFactory {
    http: reqwest::Client,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl ClientFactory {
    pub fn new(base_url: impl Into<String>, retry_policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            retry_policy,
        }
    }

    /// Extracts the auth token attached to `ctx` and returns a client bound
    /// to it for the call's lifetime. No global mutable auth state: the
    /// token lives only on the returned client, which is never shared
    /// between requests.
    pub fn client_for(&self, ctx: &RequestContext) -> Result<BackendClient, ClientError> {
        let token = ctx.token().ok_or(ClientError::AuthMissing)?.to_string();
        Ok(BackendClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
            retry_policy: self.retry_policy,
            cancellation: ctx.cancellation().clone(),
        })
    }
}

/// A per-request typed client. Carries its own token and retry policy;
/// retry state (`consecutive_failures`) lives entirely inside each
/// `with_retry` call and is never shared across requests or call sites.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry_policy: RetryPolicy,
    cancellation: CancellationToken,
}

impl BackendClient {
    async fn raw<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, &url).bearer_auth(&self.token);
        if let Some(b) = body {
            builder = builder.json(b);
        }

        let response = builder.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::AuthRejected(status.as_u16()));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(path.to_string()));
        }
        if status.is_client_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Validation(text));
        }
        if status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Transient(format!("backend {status}: {text}")));
        }

        // A 204/empty body (typical for delete) has nothing to decode;
        // treat it as JSON null so T = () or T = Value still deserializes.
        let bytes = response.bytes().await.map_err(ClientError::from_reqwest)?;
        if bytes.is_empty() {
            return serde_json::from_slice(b"null")
                .map_err(|e| ClientError::Internal(e.to_string()));
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Internal(e.to_string()))
    }

    async fn retried<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ClientError>>,
    {
        with_retry(&self.retry_policy, &self.cancellation, operation, f).await
    }

    // -- Objects ------------------------------------------------------

    pub async fn create_object(
        &self,
        object_type: EntityType,
        key: Option<&str>,
        properties: Map<String, Value>,
        labels: Vec<String>,
    ) -> Result<Object, ClientError> {
        self.retried("create_object", || {
            let body = CreateObjectBody {
                object_type: object_type.as_str(),
                key,
                properties: properties.clone(),
                labels: labels.clone(),
            };
            async { self.raw(Method::POST, "/objects", Some(&body)).await }
        })
        .await
    }

    pub async fn get_object(&self, id: &str) -> Result<Object, ClientError> {
        self.retried("get_object", || async {
            self.raw::<(), Object>(Method::GET, &format!("/objects/{id}"), None)
                .await
        })
        .await
    }

    pub async fn batch_get_objects(&self, ids: &[String]) -> Result<Vec<Object>, ClientError> {
        self.retried("batch_get_objects", || {
            let body = BatchGetBody { ids };
            async {
                self.raw::<_, BatchGetResult>(Method::POST, "/objects/batch-get", Some(&body))
                    .await
                    .map(|r| r.objects)
            }
        })
        .await
    }

    pub async fn update_object(
        &self,
        id: &str,
        properties: Map<String, Value>,
    ) -> Result<Object, ClientError> {
        self.retried("update_object", || {
            let body = UpdateObjectBody {
                properties: properties.clone(),
            };
            async {
                self.raw(Method::PATCH, &format!("/objects/{id}"), Some(&body))
                    .await
            }
        })
        .await
    }

    pub async fn soft_delete_object(&self, id: &str) -> Result<(), ClientError> {
        self.retried("soft_delete_object", || async {
            self.raw::<(), Value>(Method::DELETE, &format!("/objects/{id}"), None)
                .await
                .map(|_| ())
        })
        .await
    }

    pub async fn upsert_object(
        &self,
        object_type: EntityType,
        key: &str,
        properties: Map<String, Value>,
    ) -> Result<Object, ClientError> {
        self.retried("upsert_object", || {
            let body = UpsertObjectBody {
                object_type: object_type.as_str(),
                key,
                properties: properties.clone(),
            };
            async { self.raw(Method::POST, "/objects/upsert", Some(&body)).await }
        })
        .await
    }

    /// Find by `(type, key)`, deduplicating to at most one result even when
    /// legacy duplicates exist: picks the lexicographically-smallest
    /// canonical ID deterministically, and logs a warning on >1 match.
    pub async fn find_by_type_and_key(
        &self,
        object_type: EntityType,
        key: &str,
    ) -> Result<Option<Object>, ClientError> {
        let path = format!(
            "/objects?type={}&key={}",
            urlencode(object_type.as_str()),
            urlencode(key)
        );
        let matches = self
            .retried("find_by_type_and_key", || async {
                self.raw::<(), ListObjectsResult>(Method::GET, &path, None)
                    .await
                    .map(|r| r.objects)
            })
            .await?;

        if matches.len() > 1 {
            warn!(
                object_type = object_type.as_str(),
                key,
                matches = matches.len(),
                "find_by_type_and_key found duplicate objects; picking the smallest canonical id"
            );
        }

        Ok(pick_canonical(&matches).cloned())
    }

    pub async fn count_objects(&self, object_type: EntityType) -> Result<u64, ClientError> {
        let path = format!("/objects/count?type={}", urlencode(object_type.as_str()));
        self.retried("count_objects", || async {
            self.raw::<(), CountResult>(Method::GET, &path, None)
                .await
                .map(|r| r.count)
        })
        .await
    }

    pub async fn list_objects(
        &self,
        object_type: EntityType,
        key: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Object>, ClientError> {
        let mut path = format!(
            "/objects?type={}&limit={limit}",
            urlencode(object_type.as_str())
        );
        if let Some(k) = key {
            path.push_str(&format!("&key={}", urlencode(k)));
        }
        self.retried("list_objects", || async {
            self.raw::<(), ListObjectsResult>(Method::GET, &path, None)
                .await
                .map(|r| r.objects)
        })
        .await
    }

    // -- Relationships --------------------------------------------------

    /// Creates a relationship and, per the inverse-pairing invariant
    /// (§3.3 — "whichever side is created first, the system MUST ensure
    /// both"), also creates its declared inverse (`blocks`/`blocked_by`,
    /// `tests`/`tested_by`) when `relationship_type` has one. Relationship
    /// types with no declared inverse create only the one edge requested.
    pub async fn create_relationship(
        &self,
        relationship_type: &str,
        src_id: &str,
        dst_id: &str,
        properties: Map<String, Value>,
    ) -> Result<emergent_model::Edge, ClientError> {
        let edge = self
            .retried("create_relationship", || {
                let body = CreateRelationshipBody {
                    relationship_type,
                    src_id,
                    dst_id,
                    properties: properties.clone(),
                };
                async {
                    self.raw(Method::POST, "/relationships", Some(&body)).await
                }
            })
            .await?;

        if let Some(inverse) = emergent_model::RelationshipType::parse(relationship_type)
            .and_then(|t| t.inverse())
        {
            self.retried("create_relationship_inverse", || {
                let body = CreateRelationshipBody {
                    relationship_type: inverse.as_str(),
                    src_id: dst_id,
                    dst_id: src_id,
                    properties: Map::new(),
                };
                async {
                    self.raw::<_, emergent_model::Edge>(Method::POST, "/relationships", Some(&body))
                        .await
                }
            })
            .await?;
        }

        Ok(edge)
    }

    pub async fn delete_relationship(&self, id: &str) -> Result<(), ClientError> {
        self.retried("delete_relationship", || async {
            self.raw::<(), Value>(Method::DELETE, &format!("/relationships/{id}"), None)
                .await
                .map(|_| ())
        })
        .await
    }

    pub async fn list_relationships(
        &self,
        src_id: &str,
        relationship_type: Option<&str>,
    ) -> Result<Vec<emergent_model::Edge>, ClientError> {
        let mut path = format!("/relationships?src_id={}", urlencode(src_id));
        if let Some(t) = relationship_type {
            path.push_str(&format!("&type={}", urlencode(t)));
        }
        self.retried("list_relationships", || async {
            self.raw::<(), ListRelationshipsResult>(Method::GET, &path, None)
                .await
                .map(|r| r.relationships)
        })
        .await
    }

    /// Fetch a node's edges with direction and type filters.
    pub async fn get_edges(
        &self,
        node_id: &str,
        direction: EdgeDirection,
        relationship_type: Option<&str>,
    ) -> Result<Vec<emergent_model::Edge>, ClientError> {
        let mut path = format!(
            "/objects/{}/edges?direction={}",
            urlencode(node_id),
            direction.as_str()
        );
        if let Some(t) = relationship_type {
            path.push_str(&format!("&type={}", urlencode(t)));
        }
        self.retried("get_edges", || async {
            self.raw::<(), ListRelationshipsResult>(Method::GET, &path, None)
                .await
                .map(|r| r.relationships)
        })
        .await
    }

    /// Multi-hop graph expansion, depth/node/edge-bounded.
    pub async fn expand(
        &self,
        root_ids: &[String],
        direction: EdgeDirection,
        max_depth: u32,
        max_nodes: u32,
        max_edges: u32,
        relationship_types: Option<&[String]>,
    ) -> Result<(Vec<Object>, Vec<emergent_model::Edge>), ClientError> {
        self.retried("expand", || {
            let body = ExpandBody {
                root_ids,
                direction: direction.as_str(),
                max_depth,
                max_nodes,
                max_edges,
                relationship_types,
            };
            async {
                self.raw::<_, ExpandResult>(Method::POST, "/expand", Some(&body))
                    .await
                    .map(|r| (r.nodes, r.edges))
            }
        })
        .await
    }

    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Object>, ClientError> {
        let path = format!("/search?q={}&limit={limit}", urlencode(query));
        self.retried("search", || async {
            self.raw::<(), SearchResult>(Method::GET, &path, None)
                .await
                .map(|r| r.objects)
        })
        .await
    }
}

fn urlencode(s: &str) -> String {
    // The backend only ever sees kebab-case keys, UUID-shaped IDs, and
    // short free-text search terms, so a minimal percent-encoding of the
    // handful of characters that are unsafe in a query string is enough —
    // pulling in a dedicated URL crate for this narrow need would be the
    // kind of needless dependency bloat the transformation guidance warns
    // against.
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_passes_through_kebab_case() {
        assert_eq!(urlencode("add-login"), "add-login");
    }

    #[test]
    fn urlencode_escapes_spaces_and_special_chars() {
        assert_eq!(urlencode("a b"), "a%20b");
        assert_eq!(urlencode("a&b"), "a%26b");
    }
}
