//! REST client for the project API.
//!
//! Wraps `GET/POST /api/projects` and `GET/PUT/DELETE /api/projects/{id}`
//! using [`reqwest`], mapping the server's `{ code, message }` error bodies
//! onto [`ClientError`] variants.

use async_trait::async_trait;
use civic_core::project::{NewProject, Project, ProjectPatch};
use civic_core::types::ProjectId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};
use crate::source::ProjectSource;

/// HTTP client for one project API server.
#[derive(Debug, Clone)]
pub struct ProjectApi {
    client: reqwest::Client,
    base_url: String,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl ProjectApi {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a single project.
    pub async fn get(&self, id: &ProjectId) -> ClientResult<Project> {
        let response = self.client.get(self.project_url(id)?).send().await?;
        Self::parse_response(response, Some(id)).await
    }

    fn collection_url(&self) -> String {
        format!("{}/api/projects", self.base_url)
    }

    /// URL of one project, with the id percent-encoded as a single path
    /// segment so `?`, `#` or `/` inside it cannot address another resource.
    fn project_url(&self, id: &ProjectId) -> ClientResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.collection_url())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(id.as_str());
        Ok(url)
    }

    // ---- private helpers ----

    /// Map a non-success response onto the matching [`ClientError`].
    async fn ensure_success(
        response: reqwest::Response,
        id: Option<&ProjectId>,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => {
                tracing::debug!(status = status.as_u16(), code = ?body.code, "API error response");
                body.message
            }
            Err(_) => text,
        };

        Err(match status {
            StatusCode::NOT_FOUND => match id {
                Some(id) => ClientError::project_not_found(id.as_str()),
                None => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            },
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Check status, then decode the JSON body.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        id: Option<&ProjectId>,
    ) -> ClientResult<T> {
        let response = Self::ensure_success(response, id).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ProjectSource for ProjectApi {
    async fn list(&self) -> ClientResult<Vec<Project>> {
        let response = self.client.get(self.collection_url()).send().await?;
        Self::parse_response(response, None).await
    }

    async fn create(&self, input: NewProject) -> ClientResult<Project> {
        let response = self
            .client
            .post(self.collection_url())
            .json(&input)
            .send()
            .await?;
        let project: Project = Self::parse_response(response, None).await?;
        tracing::info!(project_id = %project.id, "Project created via API");
        Ok(project)
    }

    async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> ClientResult<Project> {
        let response = self
            .client
            .put(self.project_url(id)?)
            .json(&patch)
            .send()
            .await?;
        Self::parse_response(response, Some(id)).await
    }

    async fn delete(&self, id: &ProjectId) -> ClientResult<()> {
        let response = self.client.delete(self.project_url(id)?).send().await?;
        Self::ensure_success(response, Some(id)).await?;
        tracing::info!(project_id = %id, "Project deleted via API");
        Ok(())
    }
}
