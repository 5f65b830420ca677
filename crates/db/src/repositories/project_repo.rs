//! Repository for the `projects` table.

use civic_core::project::Project;
use civic_core::types::ProjectId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, start_date, end_date, budget, \
     location_type, location, coordinates, address, department, tags, color, \
     created_at, updated_at";

/// Provides CRUD operations for projects.
///
/// Records arrive fully built and validated; the repository only persists
/// them. Timestamps are taken from the record, not from `NOW()`, so every
/// backend reports the same values the lifecycle assigned.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the stored row.
    pub async fn create(pool: &PgPool, project: &Project) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(project.id.as_str())
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.start_date)
            .bind(project.end_date)
            .bind(project.budget)
            .bind(project.location_type.as_str())
            .bind(Json(&project.location))
            .bind(Json(&project.coordinates))
            .bind(&project.address)
            .bind(&project.department)
            .bind(&project.tags)
            .bind(&project.color)
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id.
    pub async fn find_by_id(pool: &PgPool, id: &ProjectId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List all projects, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }

    /// Overwrite every mutable column of an existing project.
    ///
    /// `id` and `created_at` are never written. Returns `None` if no row
    /// with the record's id exists.
    pub async fn update(pool: &PgPool, project: &Project) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $2,
                description = $3,
                status = $4,
                start_date = $5,
                end_date = $6,
                budget = $7,
                location_type = $8,
                location = $9,
                coordinates = $10,
                address = $11,
                department = $12,
                tags = $13,
                color = $14,
                updated_at = $15
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(project.id.as_str())
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.start_date)
            .bind(project.end_date)
            .bind(project.budget)
            .bind(project.location_type.as_str())
            .bind(Json(&project.location))
            .bind(Json(&project.coordinates))
            .bind(&project.address)
            .bind(&project.department)
            .bind(&project.tags)
            .bind(&project.color)
            .bind(project.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &ProjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
