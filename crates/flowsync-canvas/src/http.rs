//! [`GraphApi`] over the flowsync HTTP server.
//!
//! Routes:
//! - `POST {base}/workspaces/{ws}/graphs`
//! - `GET  {base}/workspaces/{ws}/graphs/{graph}`
//! - `POST {base}/workspaces/{ws}/graphs/{graph}/operations`
//!
//! A 409 answer becomes [`SyncError::VersionConflict`], with the store's
//! current version read from the error envelope when present.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use flowsync_core::{GraphId, GraphKey, GraphOperation, GraphState, WorkspaceId};

use crate::api::GraphApi;
use crate::error::SyncError;

#[derive(Serialize)]
struct ApplyBody<'a> {
    base_version: u64,
    operations: &'a [GraphOperation],
}

#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// Server answer to graph creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedGraph {
    pub graph_id: GraphId,
    pub graph: GraphState,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// HTTP client bound to one graph.
#[derive(Debug, Clone)]
pub struct HttpGraphApi {
    client: reqwest::Client,
    base_url: String,
    key: GraphKey,
}

impl HttpGraphApi {
    pub fn new(base_url: impl Into<String>, key: GraphKey) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, key)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, key: GraphKey) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpGraphApi {
            client,
            base_url,
            key,
        }
    }

    pub fn key(&self) -> GraphKey {
        self.key
    }

    /// Creates a graph on the server and returns a client bound to it.
    pub async fn create_graph(
        base_url: impl Into<String>,
        workspace_id: WorkspaceId,
        title: Option<&str>,
    ) -> Result<(HttpGraphApi, GraphState), SyncError> {
        let client = reqwest::Client::new();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let url = format!("{}/workspaces/{}/graphs", base_url, workspace_id);
        let response = client.post(url).json(&CreateBody { title }).send().await?;
        let created: CreatedGraph = decode(response, None).await?;
        tracing::info!("created graph {}", created.graph_id);
        let key = GraphKey::new(workspace_id, created.graph_id);
        Ok((
            HttpGraphApi::with_client(client, base_url, key),
            created.graph,
        ))
    }

    fn graph_url(&self) -> String {
        format!(
            "{}/workspaces/{}/graphs/{}",
            self.base_url, self.key.workspace_id, self.key.graph_id
        )
    }
}

impl GraphApi for HttpGraphApi {
    async fn fetch_graph(&self) -> Result<GraphState, SyncError> {
        let response = self.client.get(self.graph_url()).send().await?;
        decode(response, None).await
    }

    async fn apply_graph_operations(
        &self,
        base_version: u64,
        operations: &[GraphOperation],
    ) -> Result<GraphState, SyncError> {
        let url = format!("{}/operations", self.graph_url());
        let body = ApplyBody {
            base_version,
            operations,
        };
        let response = self.client.post(url).json(&body).send().await?;
        decode(response, Some(base_version)).await
    }
}

/// Decodes a success body, or maps the failure envelope to a [`SyncError`].
/// `base_version` is set for mutation calls, where 409 means a stale version.
async fn decode<T: DeserializeOwned>(
    response: Response,
    base_version: Option<u64>,
) -> Result<T, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let envelope = serde_json::from_str::<ErrorEnvelope>(&text).ok();

    if let (StatusCode::CONFLICT, Some(base_version)) = (status, base_version) {
        let current_version = envelope
            .as_ref()
            .and_then(|e| e.error.details.as_ref())
            .and_then(|d| d.get("current_version"))
            .and_then(|v| v.as_u64());
        return Err(SyncError::VersionConflict {
            base_version,
            current_version,
        });
    }

    let message = match envelope {
        Some(envelope) => envelope.error.message,
        None if text.is_empty() => status.to_string(),
        None => text,
    };
    Err(SyncError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_url_trims_trailing_slash() {
        let key = GraphKey::new(WorkspaceId(uuid::Uuid::nil()), GraphId(uuid::Uuid::nil()));
        let api = HttpGraphApi::new("http://localhost:3000/", key);
        assert_eq!(
            api.graph_url(),
            "http://localhost:3000/workspaces/00000000-0000-0000-0000-000000000000/graphs/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn apply_body_shape() {
        let ops = [GraphOperation::delete_node("a1".into())];
        let body = ApplyBody {
            base_version: 4,
            operations: &ops,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["base_version"], 4);
        assert_eq!(json["operations"][0]["type"], "delete_node");
        assert_eq!(json["operations"][0]["payload"]["action_id"], "a1");
    }
}
