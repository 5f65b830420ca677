use async_trait::async_trait;
use civic_core::project::{NewProject, Project, ProjectPatch};
use civic_core::types::ProjectId;

use crate::error::ClientResult;

/// Where the dashboard's projects live: the REST API or a local blob.
///
/// Both implementations run the same validation before accepting a write,
/// and a failed call leaves the stored collection unchanged.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Project>>;

    /// Persist a new project; the source assigns `id` and timestamps.
    async fn create(&self, input: NewProject) -> ClientResult<Project>;

    /// Merge `patch` into the stored project and return the result.
    async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> ClientResult<Project>;

    async fn delete(&self, id: &ProjectId) -> ClientResult<()>;
}
