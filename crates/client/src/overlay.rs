//! Map overlay shapes for projects, snapshots and predictions.
//!
//! Everything here is pure: entities go in, [`OverlayItem`]s come out. The
//! [`reconcile`](crate::reconcile) module decides what actually gets drawn.

use civic_core::project::{open_ring, LocationType, Project, ProjectStatus};
use civic_core::snapshot::{ParkingData, Severity, TrafficData};
use civic_core::types::LatLng;

use crate::requests::Prediction;

pub const PLANNED_COLOR: &str = "#9333EA";
pub const IN_PROGRESS_COLOR: &str = "#F59E0B";
pub const COMPLETED_COLOR: &str = "#10B981";
pub const ON_HOLD_COLOR: &str = "#2563EB";

pub const LOW_SEVERITY_COLOR: &str = "#10B981";
pub const MEDIUM_SEVERITY_COLOR: &str = "#F59E0B";
pub const HIGH_SEVERITY_COLOR: &str = "#EF4444";

pub const SELECTED_Z_INDEX: i32 = 1000;
pub const PROJECT_Z_INDEX: i32 = 10;
pub const SNAPSHOT_Z_INDEX: i32 = 5;
pub const SELECTED_SCALE: f64 = 1.3;

/// A single drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Marker {
        position: LatLng,
        fill: String,
        title: String,
        z_index: i32,
        scale: f64,
    },
    Polyline {
        path: Vec<LatLng>,
        stroke: String,
    },
    /// `ring` is closed: its last vertex equals its first.
    Polygon {
        ring: Vec<LatLng>,
        fill: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKind {
    Project,
    Traffic,
    Parking,
    Prediction,
}

/// Identity of an overlay: one per entity per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlayKey {
    pub kind: OverlayKind,
    pub id: String,
}

impl OverlayKey {
    pub fn new(kind: OverlayKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// The shapes that represent one entity on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    pub key: OverlayKey,
    pub shapes: Vec<Shape>,
}

pub fn status_color(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planned => PLANNED_COLOR,
        ProjectStatus::InProgress => IN_PROGRESS_COLOR,
        ProjectStatus::Completed => COMPLETED_COLOR,
        ProjectStatus::OnHold => ON_HOLD_COLOR,
    }
}

pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => LOW_SEVERITY_COLOR,
        Severity::Medium => MEDIUM_SEVERITY_COLOR,
        Severity::High => HIGH_SEVERITY_COLOR,
    }
}

/// Predicted congestion levels run 1 to 5.
pub fn prediction_severity(level: u8) -> Severity {
    match level {
        0..=2 => Severity::Low,
        3 => Severity::Medium,
        _ => Severity::High,
    }
}

/// Shapes for a project.
///
/// The marker at `location` is always present as the click target; lines
/// and areas add their geometry in the project's own color beneath it.
pub fn project_shapes(project: &Project, selected: bool) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(2);

    match project.location_type {
        LocationType::Point => {}
        LocationType::Line => shapes.push(Shape::Polyline {
            path: project.coordinates.clone(),
            stroke: project.color.clone(),
        }),
        LocationType::Area => {
            let mut ring = open_ring(&project.coordinates).to_vec();
            if let Some(first) = ring.first().copied() {
                ring.push(first);
            }
            shapes.push(Shape::Polygon {
                ring,
                fill: project.color.clone(),
            });
        }
    }

    let (z_index, scale) = if selected {
        (SELECTED_Z_INDEX, SELECTED_SCALE)
    } else {
        (PROJECT_Z_INDEX, 1.0)
    };
    shapes.push(Shape::Marker {
        position: project.location,
        fill: status_color(project.status).to_string(),
        title: project.name.clone(),
        z_index,
        scale,
    });

    shapes
}

pub fn project_overlay(project: &Project, selected: bool) -> OverlayItem {
    OverlayItem {
        key: OverlayKey::new(OverlayKind::Project, project.id.as_str()),
        shapes: project_shapes(project, selected),
    }
}

pub fn traffic_overlay(reading: &TrafficData) -> OverlayItem {
    OverlayItem {
        key: OverlayKey::new(OverlayKind::Traffic, reading.id.as_str()),
        shapes: vec![Shape::Marker {
            position: reading.coordinates,
            fill: severity_color(reading.severity()).to_string(),
            title: format!(
                "{}: {:.0}% congestion",
                reading.location, reading.congestion_level
            ),
            z_index: SNAPSHOT_Z_INDEX,
            scale: 1.0,
        }],
    }
}

pub fn parking_overlay(reading: &ParkingData) -> OverlayItem {
    OverlayItem {
        key: OverlayKey::new(OverlayKind::Parking, reading.id.as_str()),
        shapes: vec![Shape::Marker {
            position: reading.coordinates,
            fill: severity_color(reading.severity()).to_string(),
            title: format!(
                "{}: {}/{} spots available",
                reading.location, reading.available_spots, reading.total_spots
            ),
            z_index: SNAPSHOT_Z_INDEX,
            scale: 1.0,
        }],
    }
}

/// Predictions carry no id of their own; `index` is their position in the
/// latest response.
pub fn prediction_overlay(index: usize, prediction: &Prediction) -> OverlayItem {
    OverlayItem {
        key: OverlayKey::new(OverlayKind::Prediction, index.to_string()),
        shapes: vec![Shape::Polyline {
            path: prediction.path_points(),
            stroke: severity_color(prediction_severity(prediction.level)).to_string(),
        }],
    }
}
