//! Nominatim geocoding client.
//!
//! Resolves CEPs and street names to coordinates for the delivery range
//! check. Searches are restricted to Brazil, and free-text queries get
//! the configured region hint appended so short street names resolve
//! near the store.

use std::time::Duration;

use async_trait::async_trait;
use forneria_core::Coordinates;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::instrument;

use crate::config::GeocodeConfig;
use crate::ports::{GeocodeError, Geocoder, ResolvedLocation};

/// Identification sent to Nominatim, required by its usage policy.
const USER_AGENT: &str = concat!("forneria-assistant/", env!("CARGO_PKG_VERSION"));

/// Client for the Nominatim search API.
#[derive(Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    region_hint: String,
}

impl NominatimClient {
    /// Create a new Nominatim client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GeocodeConfig, timeout: Duration) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.clone(),
            region_hint: config.region_hint.clone(),
        })
    }

    async fn first_match(&self, url: String) -> Result<Option<ResolvedLocation>, GeocodeError> {
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let results: Vec<SearchResult> = response.json().await?;
        Ok(results.into_iter().find_map(SearchResult::into_location))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self), fields(cep = %cep))]
    async fn locate_cep(&self, cep: &str) -> Result<Option<ResolvedLocation>, GeocodeError> {
        let url = format!(
            "{}/search?format=json&countrycodes=br&limit=1&postalcode={}&addressdetails=1",
            self.base_url,
            urlencoding::encode(cep)
        );
        self.first_match(url).await
    }

    #[instrument(skip(self), fields(query = %text))]
    async fn search_street(&self, text: &str) -> Result<Option<ResolvedLocation>, GeocodeError> {
        let query = format!("{text}, {}", self.region_hint);
        let url = format!(
            "{}/search?format=json&countrycodes=br&limit=3&q={}&addressdetails=1",
            self.base_url,
            urlencoding::encode(&query)
        );
        self.first_match(url).await
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResult {
    /// Nominatim sends coordinates as strings.
    lat: String,
    lon: String,
    #[serde(default)]
    address: AddressDetails,
}

#[derive(Debug, Default, Deserialize)]
struct AddressDetails {
    road: Option<String>,
    street: Option<String>,
    pedestrian: Option<String>,
    footway: Option<String>,
    suburb: Option<String>,
    neighbourhood: Option<String>,
}

impl SearchResult {
    /// Results whose coordinates do not parse are dropped.
    fn into_location(self) -> Option<ResolvedLocation> {
        let lat = self.lat.parse::<f64>().ok()?;
        let lon = self.lon.parse::<f64>().ok()?;

        // Nominatim names the way under several keys depending on its type.
        let road = self
            .address
            .road
            .or(self.address.street)
            .or(self.address.pedestrian)
            .or(self.address.footway);

        Some(ResolvedLocation {
            coordinates: Coordinates::new(lat, lon),
            road,
            suburb: self.address.suburb.or(self.address.neighbourhood),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_maps_address_parts() {
        let json = r#"[{
            "lat": "-23.5613",
            "lon": "-46.6565",
            "display_name": "Avenida Paulista, Bela Vista, São Paulo",
            "address": {
                "road": "Avenida Paulista",
                "suburb": "Bela Vista",
                "city": "São Paulo"
            }
        }]"#;

        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();
        let location = results
            .into_iter()
            .find_map(SearchResult::into_location)
            .unwrap();

        assert_eq!(location.road.as_deref(), Some("Avenida Paulista"));
        assert_eq!(location.suburb.as_deref(), Some("Bela Vista"));
        assert!((location.coordinates.lat - (-23.5613)).abs() < 1e-9);
    }

    #[test]
    fn test_neighbourhood_backs_up_suburb() {
        let json = r#"[{
            "lat": "-23.5",
            "lon": "-46.6",
            "address": {"street": "Rua Augusta", "neighbourhood": "Consolação"}
        }]"#;

        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();
        let location = results
            .into_iter()
            .find_map(SearchResult::into_location)
            .unwrap();

        assert_eq!(location.road.as_deref(), Some("Rua Augusta"));
        assert_eq!(location.suburb.as_deref(), Some("Consolação"));
    }

    #[test]
    fn test_unparseable_coordinates_are_skipped() {
        let json = r#"[
            {"lat": "not-a-number", "lon": "-46.6"},
            {"lat": "-23.5", "lon": "-46.6"}
        ]"#;

        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();
        let location = results.into_iter().find_map(SearchResult::into_location);

        assert!(location.is_some());
    }
}
