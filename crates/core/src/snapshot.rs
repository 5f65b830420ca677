//! Read-only traffic and parking snapshots.
//!
//! These come from external feeds and are replaced wholesale on refresh; the
//! system never mutates individual readings.

use serde::{Deserialize, Serialize};

use crate::types::{LatLng, Timestamp};

/// Congestion at or above this level (percent) is high.
pub const HIGH_CONGESTION: f64 = 75.0;
/// Congestion at or above this level (percent) is medium.
pub const MEDIUM_CONGESTION: f64 = 50.0;
/// Parking availability below this share (percent) is high pressure.
pub const LOW_AVAILABILITY: f64 = 15.0;
/// Parking availability below this share (percent) is medium pressure.
pub const MEDIUM_AVAILABILITY: f64 = 40.0;

/// Three-step severity used for marker coloring and dashboard histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Traffic reading at one intersection or road segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficData {
    pub id: String,
    /// Human-readable location name, e.g. "Colorado & Fair Oaks".
    pub location: String,
    /// 0-100.
    pub congestion_level: f64,
    /// Miles per hour.
    pub average_speed: f64,
    /// Vehicles per hour.
    pub volume: u32,
    pub timestamp: Timestamp,
    pub coordinates: LatLng,
}

impl TrafficData {
    pub fn severity(&self) -> Severity {
        if self.congestion_level >= HIGH_CONGESTION {
            Severity::High
        } else if self.congestion_level >= MEDIUM_CONGESTION {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Occupancy reading for one parking facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingData {
    pub id: String,
    pub location: String,
    pub total_spots: u32,
    pub available_spots: u32,
    /// 0-100.
    pub occupancy_rate: f64,
    /// Minutes.
    pub average_duration: f64,
    pub timestamp: Timestamp,
    pub coordinates: LatLng,
}

impl ParkingData {
    /// Share of free spots as a percentage. `None` when capacity is zero.
    pub fn availability_percent(&self) -> Option<f64> {
        if self.total_spots == 0 {
            return None;
        }
        Some(f64::from(self.available_spots) / f64::from(self.total_spots) * 100.0)
    }

    /// Facilities with no capacity are reported as high pressure.
    pub fn severity(&self) -> Severity {
        match self.availability_percent() {
            Some(pct) if pct < LOW_AVAILABILITY => Severity::High,
            Some(pct) if pct < MEDIUM_AVAILABILITY => Severity::Medium,
            Some(_) => Severity::Low,
            None => Severity::High,
        }
    }
}
