//! In-process [`ProjectStore`] used when no database is configured.

use async_trait::async_trait;
use civic_core::project::Project;
use civic_core::types::ProjectId;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::store::{ProjectStore, StoreError};

/// Insertion-ordered in-memory store.
///
/// Contents are lost on restart. Listing returns projects in the order they
/// were created, matching the Postgres backend's `created_at` ordering.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<IndexMap<ProjectId, Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records (later duplicates overwrite).
    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let map = projects
            .into_iter()
            .map(|project| (project.id.clone(), project))
            .collect();
        Self {
            projects: RwLock::new(map),
        }
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn insert(&self, project: &Project) -> Result<Project, StoreError> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(StoreError::Conflict(format!(
                "project id {} already exists",
                project.id
            )));
        }
        projects.insert(project.id.clone(), project.clone());
        Ok(project.clone())
    }

    async fn update(&self, project: &Project) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&project.id) {
            Some(slot) => {
                let mut stored = project.clone();
                // Creation time belongs to the store.
                stored.created_at = slot.created_at;
                *slot = stored.clone();
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, StoreError> {
        Ok(self.projects.write().await.shift_remove(id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
