//! In-memory mirror of the project collection.

use civic_core::project::{NewProject, Project, ProjectPatch};
use civic_core::types::ProjectId;
use indexmap::IndexMap;

use crate::error::ClientResult;
use crate::source::ProjectSource;

/// Dashboard-side copy of the projects held by a [`ProjectSource`].
///
/// Every mutation goes to the source first; the mirror changes only once
/// the source has confirmed it, so a failed call leaves the cache exactly
/// as it was.
pub struct ProjectCache<S> {
    source: S,
    projects: IndexMap<ProjectId, Project>,
}

impl<S: ProjectSource> ProjectCache<S> {
    /// Empty cache; call [`load`](Self::load) to fill it.
    pub fn new(source: S) -> Self {
        Self {
            source,
            projects: IndexMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replace the mirror with the source's current collection.
    pub async fn load(&mut self) -> ClientResult<usize> {
        let projects = self.source.list().await?;
        self.projects = projects.into_iter().map(|p| (p.id.clone(), p)).collect();
        tracing::debug!(count = self.projects.len(), "Project cache loaded");
        Ok(self.projects.len())
    }

    pub async fn create(&mut self, input: NewProject) -> ClientResult<&Project> {
        let project = self.source.create(input).await?;
        let id = project.id.clone();
        let (index, _) = self.projects.insert_full(id, project);
        Ok(&self.projects[index])
    }

    pub async fn update(&mut self, id: &ProjectId, patch: ProjectPatch) -> ClientResult<&Project> {
        let project = self.source.update(id, patch).await?;
        let (index, _) = self.projects.insert_full(project.id.clone(), project);
        Ok(&self.projects[index])
    }

    pub async fn delete(&mut self, id: &ProjectId) -> ClientResult<()> {
        self.source.delete(id).await?;
        self.projects.shift_remove(id);
        Ok(())
    }

    /// Cached projects in source order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
