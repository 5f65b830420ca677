//! Offline project storage in a single JSON blob.
//!
//! Every mutation reads the whole collection, applies the change with the
//! same lifecycle and validation functions the server uses, and writes the
//! whole collection back through a temp file and rename. A reader never
//! observes a half-written blob.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use civic_core::project::{validate_project, NewProject, Project, ProjectPatch};
use civic_core::types::ProjectId;
use tokio::sync::Mutex;

use crate::error::{ClientError, ClientResult};
use crate::source::ProjectSource;

/// File name of the blob inside the store directory.
pub const BLOB_FILE_NAME: &str = "civic_projects.json";

/// Project source backed by `<dir>/civic_projects.json`.
#[derive(Debug)]
pub struct LocalProjectStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalProjectStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(BLOB_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection. Absent or blank blobs mean no projects yet.
    async fn read_all(&self) -> ClientResult<Vec<Project>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Unreadable project blob");
            ClientError::Corrupt(e.to_string())
        })
    }

    /// Replace the whole collection.
    async fn write_all(&self, projects: &[Project]) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let bytes = serde_json::to_vec_pretty(projects)
            .map_err(|e| ClientError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), count = projects.len(), "Project blob written");
        Ok(())
    }
}

#[async_trait]
impl ProjectSource for LocalProjectStore {
    async fn list(&self) -> ClientResult<Vec<Project>> {
        self.read_all().await
    }

    async fn create(&self, input: NewProject) -> ClientResult<Project> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_all().await?;

        let project = Project::create(input, ProjectId::generate_local(), Utc::now());
        validate_project(&project)?;

        projects.push(project.clone());
        self.write_all(&projects).await?;
        tracing::info!(project_id = %project.id, "Project stored locally");
        Ok(project)
    }

    async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> ClientResult<Project> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_all().await?;

        let slot = projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ClientError::project_not_found(id.as_str()))?;

        let candidate = slot.apply_patch(patch, Utc::now());
        validate_project(&candidate)?;
        *slot = candidate.clone();

        self.write_all(&projects).await?;
        Ok(candidate)
    }

    async fn delete(&self, id: &ProjectId) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_all().await?;

        let index = projects
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ClientError::project_not_found(id.as_str()))?;
        projects.remove(index);

        self.write_all(&projects).await?;
        tracing::info!(project_id = %id, "Project removed locally");
        Ok(())
    }
}
