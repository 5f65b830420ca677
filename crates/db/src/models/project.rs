//! Row mapping for the `projects` table.

use civic_core::error::CoreError;
use civic_core::project::Project;
use civic_core::types::{CalendarDate, LatLng, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A raw row from the `projects` table.
///
/// Enums are stored as their wire strings and parsed back on conversion, so a
/// row that slipped past the CHECK constraints surfaces as an error instead
/// of a panic.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub budget: f64,
    pub location_type: String,
    pub location: Json<LatLng>,
    pub coordinates: Json<Vec<LatLng>>,
    pub address: String,
    pub department: String,
    pub tags: Vec<String>,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ProjectRow> for Project {
    type Error = CoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            status: row.status.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            budget: row.budget,
            location_type: row.location_type.parse()?,
            location: row.location.0,
            coordinates: row.coordinates.0,
            address: row.address,
            department: row.department,
            tags: row.tags,
            color: row.color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
