//! Handlers for the `/projects` resource.
//!
//! Create and update both build the full candidate record first and run it
//! through [`validate_project`], so the same rules guard both paths.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use civic_core::error::CoreError;
use civic_core::project::{validate_project, NewProject, Project, ProjectPatch};
use civic_core::types::ProjectId;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.store.list().await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let id = ProjectId::from(id);
    let project = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id))?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = Project::create(input, ProjectId::generate(), Utc::now());
    validate_project(&project)?;

    let created = state.store.insert(&project).await?;
    tracing::info!(project_id = %created.id, name = %created.name, "Project created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/projects/{id}
///
/// Fields absent from the body keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> AppResult<Json<Project>> {
    let id = ProjectId::from(id);
    let existing = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id.clone()))?;

    let candidate = existing.apply_patch(patch, Utc::now());
    validate_project(&candidate)?;

    // The record can vanish between the read and the write.
    let updated = state
        .store
        .update(&candidate)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id))?;
    tracing::info!(project_id = %updated.id, "Project updated");
    Ok(Json(updated))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = ProjectId::from(id);
    if !state.store.delete(&id).await? {
        return Err(CoreError::project_not_found(id).into());
    }
    tracing::info!(project_id = %id, "Project deleted");
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
