//! Address to coordinate resolution.

use async_trait::async_trait;
use civic_core::project::NewProject;
use civic_core::types::LatLng;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ClientResult, GeocodingError};

/// Public endpoint of the Google Geocoding web service.
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-form address to its first matching coordinate.
    async fn geocode(&self, address: &str) -> Result<LatLng, GeocodingError>;
}

/// [`Geocoder`] backed by the Google Geocoding API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    region_suffix: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: GOOGLE_GEOCODE_URL.to_string(),
            api_key: api_key.into(),
            region_suffix: None,
        }
    }

    /// Build from client configuration. Fails when no key is configured.
    pub fn from_config(
        client: reqwest::Client,
        config: &ClientConfig,
    ) -> Result<Self, GeocodingError> {
        let key = config
            .google_maps_api_key
            .clone()
            .ok_or(GeocodingError::MissingKey)?;
        let mut geocoder = Self::new(client, key);
        geocoder.region_suffix = config.geocode_region_suffix.clone();
        Ok(geocoder)
    }

    /// Point at a different service URL (self-hosted proxy, test stub).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Text appended to every query, e.g. `", Pasadena, CA"`.
    pub fn with_region_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.region_suffix = Some(suffix.into());
        self
    }

    fn query_for(&self, address: &str) -> String {
        match &self.region_suffix {
            Some(suffix) => format!("{address}{suffix}"),
            None => address.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<LatLng, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::EmptyAddress);
        }

        let query = self.query_for(address);
        let body: GeocodeResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("address", query.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        interpret(address, body)
    }
}

fn interpret(address: &str, body: GeocodeResponse) -> Result<LatLng, GeocodingError> {
    match body.status.as_str() {
        "OK" => body
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| GeocodingError::NoResults(address.to_string())),
        "ZERO_RESULTS" => Err(GeocodingError::NoResults(address.to_string())),
        _ => {
            tracing::warn!(status = %body.status, "Geocoding request rejected");
            Err(GeocodingError::Service {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            })
        }
    }
}

/// Resolve `input.address` and store the result in `input.location`.
///
/// Runs before a create; any failure aborts it with nothing persisted.
pub async fn locate_project<G: Geocoder + ?Sized>(
    geocoder: &G,
    mut input: NewProject,
) -> ClientResult<NewProject> {
    input.location = geocoder.geocode(&input.address).await?;
    Ok(input)
}
