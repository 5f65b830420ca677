//! Summary figures for the dashboard side panels.

use std::collections::BTreeMap;

use civic_core::project::{Project, ProjectStatus};
use civic_core::snapshot::{ParkingData, Severity, TrafficData};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusTotals {
    pub count: usize,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    pub total: StatusTotals,
    /// Every status is present, with zeros where no project has it.
    pub by_status: Vec<(ProjectStatus, StatusTotals)>,
}

impl ProjectOverview {
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        let mut by_status: Vec<(ProjectStatus, StatusTotals)> = ProjectStatus::ALL
            .iter()
            .map(|status| (*status, StatusTotals::default()))
            .collect();
        let mut total = StatusTotals::default();

        for project in projects {
            total.count += 1;
            total.budget += project.budget;
            if let Some((_, totals)) = by_status.iter_mut().find(|(s, _)| *s == project.status) {
                totals.count += 1;
                totals.budget += project.budget;
            }
        }

        Self { total, by_status }
    }

    pub fn for_status(&self, status: ProjectStatus) -> StatusTotals {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, totals)| *totals)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficOverview {
    pub readings: usize,
    /// `None` without readings.
    pub average_congestion: Option<f64>,
    pub average_speed: Option<f64>,
    pub total_volume: u64,
    pub severity_counts: BTreeMap<Severity, usize>,
}

impl TrafficOverview {
    pub fn from_readings(readings: &[TrafficData]) -> Self {
        let mut severity_counts = BTreeMap::new();
        for reading in readings {
            *severity_counts.entry(reading.severity()).or_insert(0) += 1;
        }

        Self {
            readings: readings.len(),
            average_congestion: mean(readings.iter().map(|r| r.congestion_level)),
            average_speed: mean(readings.iter().map(|r| r.average_speed)),
            total_volume: readings.iter().map(|r| u64::from(r.volume)).sum(),
            severity_counts,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.severity_counts.get(&severity).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingOverview {
    pub facilities: usize,
    pub total_spots: u64,
    pub available_spots: u64,
    /// Share of occupied spots; `None` when there is no capacity.
    pub occupancy_percent: Option<f64>,
    /// Minutes; `None` without readings.
    pub average_duration: Option<f64>,
}

impl ParkingOverview {
    pub fn from_readings(readings: &[ParkingData]) -> Self {
        let total_spots: u64 = readings.iter().map(|r| u64::from(r.total_spots)).sum();
        let available_spots: u64 = readings.iter().map(|r| u64::from(r.available_spots)).sum();
        let occupancy_percent = (total_spots > 0).then(|| {
            let occupied = total_spots.saturating_sub(available_spots);
            occupied as f64 / total_spots as f64 * 100.0
        });

        Self {
            facilities: readings.len(),
            total_spots,
            available_spots,
            occupancy_percent,
            average_duration: mean(readings.iter().map(|r| r.average_duration)),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
