//! Project record, lifecycle and validation.
//!
//! The lifecycle is split into two pure steps so every backend can share it:
//!
//! 1. Build the candidate record: [`Project::create`] for inserts,
//!    [`Project::apply_patch`] for partial updates.
//! 2. Run [`validate_project`] on the full candidate before persisting.
//!
//! Update validation therefore always sees the merged record, so a patch that
//! only moves `endDate` is still checked against the stored `startDate`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{CalendarDate, LatLng, ProjectId, Timestamp};

/// Minimum vertex count for `line` geometry.
pub const MIN_LINE_POINTS: usize = 2;

/// Minimum distinct vertex count for `area` geometry.
pub const MIN_AREA_POINTS: usize = 3;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Planned,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown project status '{s}'")))
    }
}

/// Geometry kind; decides how `coordinates` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Point,
    Line,
    Area,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Point => "point",
            LocationType::Line => "line",
            LocationType::Area => "area",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(LocationType::Point),
            "line" => Ok(LocationType::Line),
            "area" => Ok(LocationType::Area),
            other => Err(CoreError::Validation(format!(
                "unknown location type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records and DTOs
// ---------------------------------------------------------------------------

/// A capital-improvement project as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    #[validate(range(min = 0.0, message = "budget must not be negative"))]
    pub budget: f64,
    pub location_type: LocationType,
    #[validate(nested)]
    pub location: LatLng,
    pub coordinates: Vec<LatLng>,
    pub address: String,
    pub department: String,
    pub tags: Vec<String>,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Create payload. Clients never send `id` or timestamps; if they do, serde
/// drops the unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub budget: f64,
    pub location_type: LocationType,
    pub location: LatLng,
    #[serde(default)]
    pub coordinates: Vec<LatLng>,
    pub address: String,
    pub department: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub color: String,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<LatLng>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ProjectPatch {
    /// True when the patch would not change any field.
    pub fn is_empty(&self) -> bool {
        *self == ProjectPatch::default()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Project {
    /// Build a full record from a create payload. Does not validate.
    pub fn create(input: NewProject, id: ProjectId, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
            location_type: input.location_type,
            location: input.location,
            coordinates: input.coordinates,
            address: input.address,
            department: input.department,
            tags: normalize_tags(input.tags),
            color: input.color,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge `patch` into a copy of this record. Does not validate.
    ///
    /// `id` and `created_at` always carry over; `updated_at` becomes `now`.
    pub fn apply_patch(&self, patch: ProjectPatch, now: Timestamp) -> Self {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(start_date) = patch.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            next.end_date = end_date;
        }
        if let Some(budget) = patch.budget {
            next.budget = budget;
        }
        if let Some(location_type) = patch.location_type {
            next.location_type = location_type;
        }
        if let Some(location) = patch.location {
            next.location = location;
        }
        if let Some(coordinates) = patch.coordinates {
            next.coordinates = coordinates;
        }
        if let Some(address) = patch.address {
            next.address = address;
        }
        if let Some(department) = patch.department {
            next.department = department;
        }
        if let Some(tags) = patch.tags {
            next.tags = normalize_tags(tags);
        }
        if let Some(color) = patch.color {
            next.color = color;
        }
        next.updated_at = now;
        next
    }

    /// Vertices that define the drawn geometry. Empty for points.
    pub fn geometry(&self) -> &[LatLng] {
        match self.location_type {
            LocationType::Point => &[],
            LocationType::Line | LocationType::Area => &self.coordinates,
        }
    }
}

/// Validate a complete project record.
///
/// This is the only validation entry point; create and update both call it
/// on the full candidate record.
pub fn validate_project(project: &Project) -> Result<(), CoreError> {
    project.validate()?;

    if project.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if project.description.trim().is_empty() {
        return Err(CoreError::Validation(
            "description must not be empty".into(),
        ));
    }
    if !project.budget.is_finite() {
        return Err(CoreError::Validation("budget must be a finite number".into()));
    }
    validate_date_range(project.start_date, project.end_date)?;
    validate_point(&project.location, "location")?;
    validate_geometry(project.location_type, &project.coordinates)?;
    Ok(())
}

/// `start <= end`, inclusive.
pub fn validate_date_range(start: CalendarDate, end: CalendarDate) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::Validation(format!(
            "endDate ({end}) must be the same as or after startDate ({start})"
        )));
    }
    Ok(())
}

/// Check the vertex list against the geometry kind.
///
/// Points ignore `coordinates`. Lines need at least two vertices. Areas need
/// at least three distinct vertices; a trailing vertex equal to the first is
/// treated as an explicit closing point and not counted.
pub fn validate_geometry(kind: LocationType, coordinates: &[LatLng]) -> Result<(), CoreError> {
    let required = match kind {
        LocationType::Point => return Ok(()),
        LocationType::Line => MIN_LINE_POINTS,
        LocationType::Area => MIN_AREA_POINTS,
    };

    for (index, point) in coordinates.iter().enumerate() {
        validate_point(point, &format!("coordinates[{index}]"))?;
    }

    let counted = match kind {
        LocationType::Area => open_ring(coordinates).len(),
        _ => coordinates.len(),
    };
    if counted < required {
        return Err(CoreError::Validation(format!(
            "{kind} geometry requires at least {required} coordinates, got {counted}"
        )));
    }
    Ok(())
}

/// Strip an explicit closing vertex, if present.
pub fn open_ring(coordinates: &[LatLng]) -> &[LatLng] {
    match coordinates {
        [first, rest @ .., last] if !rest.is_empty() && first == last => {
            &coordinates[..coordinates.len() - 1]
        }
        _ => coordinates,
    }
}

fn validate_point(point: &LatLng, field: &str) -> Result<(), CoreError> {
    if !point.lat.is_finite() || !point.lng.is_finite() {
        return Err(CoreError::Validation(format!(
            "{field} must contain finite numbers"
        )));
    }
    point
        .validate()
        .map_err(|e| CoreError::Validation(format!("{field}: {e}")))
}

/// Tags behave as a set: trimmed, non-empty, first occurrence wins.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
