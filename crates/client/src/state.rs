//! Dashboard application state and its reducer.

use civic_core::project::Project;
use civic_core::snapshot::{ParkingData, TrafficData};
use civic_core::types::ProjectId;
use serde::{Deserialize, Serialize};

use crate::overlay::{
    parking_overlay, prediction_overlay, project_overlay, traffic_overlay, OverlayItem,
};
use crate::requests::Prediction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Traffic,
    Parking,
    Projects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapView {
    #[default]
    Standard,
    Satellite,
    Terrain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayer {
    pub kind: LayerKind,
    pub name: &'static str,
    pub visible: bool,
}

/// Everything the dashboard renders besides the project collection itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub layers: Vec<MapLayer>,
    pub selected_project: Option<ProjectId>,
    pub map_view: MapView,
    pub traffic: Vec<TrafficData>,
    pub parking: Vec<ParkingData>,
    pub predictions: Vec<Prediction>,
}

/// Typed updates applied through [`DashboardState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleLayer(LayerKind),
    /// `None` clears the selection.
    SelectProject(Option<ProjectId>),
    SetMapView(MapView),
    TrafficRefreshed(Vec<TrafficData>),
    ParkingRefreshed(Vec<ParkingData>),
    PredictionsReceived(Vec<Prediction>),
    ProjectRemoved(ProjectId),
}

impl Default for DashboardState {
    /// All layers visible, nothing selected, standard view.
    fn default() -> Self {
        Self {
            layers: vec![
                MapLayer {
                    kind: LayerKind::Traffic,
                    name: "Traffic",
                    visible: true,
                },
                MapLayer {
                    kind: LayerKind::Parking,
                    name: "Parking",
                    visible: true,
                },
                MapLayer {
                    kind: LayerKind::Projects,
                    name: "Projects",
                    visible: true,
                },
            ],
            selected_project: None,
            map_view: MapView::default(),
            traffic: Vec::new(),
            parking: Vec::new(),
            predictions: Vec::new(),
        }
    }
}

impl DashboardState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleLayer(kind) => {
                if let Some(layer) = self.layers.iter_mut().find(|l| l.kind == kind) {
                    layer.visible = !layer.visible;
                }
            }
            Action::SelectProject(id) => self.selected_project = id,
            Action::SetMapView(view) => self.map_view = view,
            Action::TrafficRefreshed(readings) => self.traffic = readings,
            Action::ParkingRefreshed(readings) => self.parking = readings,
            Action::PredictionsReceived(predictions) => self.predictions = predictions,
            Action::ProjectRemoved(id) => {
                if self.selected_project.as_ref() == Some(&id) {
                    self.selected_project = None;
                }
            }
        }
    }

    pub fn is_visible(&self, kind: LayerKind) -> bool {
        self.layers
            .iter()
            .any(|layer| layer.kind == kind && layer.visible)
    }

    pub fn is_selected(&self, id: &ProjectId) -> bool {
        self.selected_project.as_ref() == Some(id)
    }

    /// Desired overlay set for the current state.
    ///
    /// Hidden layers contribute nothing. Predictions ride on the traffic
    /// layer.
    pub fn overlay_items<'a>(
        &self,
        projects: impl IntoIterator<Item = &'a Project>,
    ) -> Vec<OverlayItem> {
        let mut items = Vec::new();

        if self.is_visible(LayerKind::Traffic) {
            items.extend(self.traffic.iter().map(traffic_overlay));
            items.extend(
                self.predictions
                    .iter()
                    .enumerate()
                    .map(|(index, prediction)| prediction_overlay(index, prediction)),
            );
        }
        if self.is_visible(LayerKind::Parking) {
            items.extend(self.parking.iter().map(parking_overlay));
        }
        if self.is_visible(LayerKind::Projects) {
            items.extend(
                projects
                    .into_iter()
                    .map(|project| project_overlay(project, self.is_selected(&project.id))),
            );
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{OverlayKind, Shape, SELECTED_Z_INDEX};
    use chrono::{NaiveDate, Utc};
    use civic_core::project::{LocationType, ProjectStatus};
    use civic_core::types::LatLng;

    fn project(id: &str) -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::from(id),
            name: format!("Project {id}"),
            description: "Streetlight retrofit".into(),
            status: ProjectStatus::Planned,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            budget: 1.0,
            location_type: LocationType::Point,
            location: LatLng::new(34.15, -118.13),
            coordinates: vec![],
            address: "Lake Ave".into(),
            department: "Public Works".into(),
            tags: vec![],
            color: "#FACC15".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn parking(id: &str) -> ParkingData {
        ParkingData {
            id: id.into(),
            location: "Paseo Garage".into(),
            total_spots: 400,
            available_spots: 20,
            occupancy_rate: 95.0,
            average_duration: 85.0,
            timestamp: Utc::now(),
            coordinates: LatLng::new(34.145, -118.14),
        }
    }

    #[test]
    fn defaults_show_every_layer() {
        let state = DashboardState::default();
        assert!(state.is_visible(LayerKind::Traffic));
        assert!(state.is_visible(LayerKind::Parking));
        assert!(state.is_visible(LayerKind::Projects));
        assert_eq!(state.map_view, MapView::Standard);
    }

    #[test]
    fn toggle_layer_flips_visibility() {
        let mut state = DashboardState::default();
        state.apply(Action::ToggleLayer(LayerKind::Parking));
        assert!(!state.is_visible(LayerKind::Parking));
        state.apply(Action::ToggleLayer(LayerKind::Parking));
        assert!(state.is_visible(LayerKind::Parking));
    }

    #[test]
    fn removing_selected_project_clears_selection() {
        let mut state = DashboardState::default();
        state.apply(Action::SelectProject(Some(ProjectId::from("a"))));

        state.apply(Action::ProjectRemoved(ProjectId::from("b")));
        assert!(state.is_selected(&ProjectId::from("a")));

        state.apply(Action::ProjectRemoved(ProjectId::from("a")));
        assert!(state.selected_project.is_none());
    }

    #[test]
    fn set_map_view() {
        let mut state = DashboardState::default();
        state.apply(Action::SetMapView(MapView::Satellite));
        assert_eq!(state.map_view, MapView::Satellite);
    }

    #[test]
    fn snapshots_are_replaced_wholesale() {
        let mut state = DashboardState::default();
        state.apply(Action::ParkingRefreshed(vec![parking("1"), parking("2")]));
        state.apply(Action::ParkingRefreshed(vec![parking("3")]));
        assert_eq!(state.parking.len(), 1);
        assert_eq!(state.parking[0].id, "3");
    }

    #[test]
    fn hidden_layers_produce_no_overlays() {
        let mut state = DashboardState::default();
        state.apply(Action::ParkingRefreshed(vec![parking("1")]));
        let projects = [project("a")];

        assert_eq!(state.overlay_items(&projects).len(), 2);

        state.apply(Action::ToggleLayer(LayerKind::Projects));
        let items = state.overlay_items(&projects);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key.kind, OverlayKind::Parking);
    }

    #[test]
    fn selected_project_overlay_is_highlighted() {
        let mut state = DashboardState::default();
        state.apply(Action::SelectProject(Some(ProjectId::from("b"))));
        let projects = [project("a"), project("b")];

        let items = state.overlay_items(&projects);
        let z_of = |item: &OverlayItem| match item.shapes.last() {
            Some(Shape::Marker { z_index, .. }) => *z_index,
            _ => panic!("project overlay must end with a marker"),
        };
        assert_ne!(z_of(&items[0]), SELECTED_Z_INDEX);
        assert_eq!(z_of(&items[1]), SELECTED_Z_INDEX);
    }
}
