//! Client side of the civic planning dashboard.
//!
//! Talks to the project API (or a local JSON blob when running offline),
//! mirrors the collection in a [`cache::ProjectCache`], turns projects and
//! city snapshots into map overlays, and tracks the report and prediction
//! requests the dashboard issues.

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod local;
pub mod overlay;
pub mod reconcile;
pub mod requests;
pub mod source;
pub mod state;

pub use cache::ProjectCache;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, GeocodingError};
pub use source::ProjectSource;
