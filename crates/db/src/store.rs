//! The [`ProjectStore`] abstraction and its PostgreSQL implementation.

use async_trait::async_trait;
use civic_core::error::CoreError;
use civic_core::project::Project;
use civic_core::types::ProjectId;

use crate::repositories::ProjectRepo;
use crate::DbPool;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by a [`ProjectStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database call failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record with the same id already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored record could not be mapped back onto the domain type.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Persistence for project records, keyed by [`ProjectId`].
///
/// Implementations persist what they are given; building and validating the
/// record is the caller's job (see `civic_core::project`).
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Every project, in a stable order.
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, StoreError>;

    /// Persist a new record. Fails with [`StoreError::Conflict`] if the id is taken.
    async fn insert(&self, project: &Project) -> Result<Project, StoreError>;

    /// Replace an existing record. Returns `None` if the id is unknown.
    async fn update(&self, project: &Project) -> Result<Option<Project>, StoreError>;

    /// Remove a record. Returns `true` if something was deleted.
    async fn delete(&self, id: &ProjectId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// [`ProjectStore`] backed by the `projects` table.
#[derive(Clone)]
pub struct PgProjectStore {
    pool: DbPool,
}

impl PgProjectStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let rows = ProjectRepo::list(&self.pool).await?;
        rows.into_iter()
            .map(|row| Project::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        match ProjectRepo::find_by_id(&self.pool, id).await? {
            Some(row) => Ok(Some(Project::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, project: &Project) -> Result<Project, StoreError> {
        match ProjectRepo::create(&self.pool, project).await {
            Ok(row) => {
                tracing::debug!(project_id = %project.id, "Inserted project row");
                Ok(Project::try_from(row)?)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(StoreError::Conflict(format!(
                    "project id {} already exists",
                    project.id
                )))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn update(&self, project: &Project) -> Result<Option<Project>, StoreError> {
        match ProjectRepo::update(&self.pool, project).await? {
            Some(row) => Ok(Some(Project::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, StoreError> {
        Ok(ProjectRepo::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
