//! Forward geocoding client for the Nominatim (OpenStreetMap) search API.
//!
//! Geocoding is best effort throughout the platform: callers get
//! `Option<Coordinates>` and persist `NULL` coordinates when the lookup
//! fails or finds nothing. Requests are spaced at least one second apart to
//! honor the Nominatim usage policy.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum spacing between Nominatim requests.
const MIN_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Geocoder settings, read from the environment by the binary.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Base URL of the Nominatim instance.
    pub base_url: String,
    /// User agent sent with every request (required by the OSM policy).
    pub user_agent: String,
    /// ISO country code biasing the search.
    pub country_code: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".into(),
            user_agent: "hrx-platform/1.0".into(),
            country_code: "br".into(),
        }
    }
}

impl GeoConfig {
    /// Load configuration from environment variables, falling back to the
    /// public Nominatim instance.
    ///
    /// | Env Var               | Default                                |
    /// |-----------------------|----------------------------------------|
    /// | `GEOCODING_BASE_URL`  | `https://nominatim.openstreetmap.org`  |
    /// | `GEOCODING_USER_AGENT`| `hrx-platform/1.0`                     |
    /// | `GEOCODING_COUNTRY`   | `br`                                   |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GEOCODING_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: std::env::var("GEOCODING_USER_AGENT").unwrap_or(defaults.user_agent),
            country_code: std::env::var("GEOCODING_COUNTRY").unwrap_or(defaults.country_code),
        }
    }
}

/// A structured address to geocode. Only `city` and `state` are required.
#[derive(Debug, Clone, Default)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
}

impl Address {
    /// Join the present parts into a single free-text query.
    pub fn to_query(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(street) = &self.street {
            match &self.number {
                Some(number) => parts.push(format!("{street}, {number}")),
                None => parts.push(street.clone()),
            }
        }
        if let Some(neighborhood) = &self.neighborhood {
            parts.push(neighborhood.clone());
        }
        parts.push(self.city.clone());
        parts.push(self.state.clone());
        if let Some(zip) = &self.zip_code {
            parts.push(zip.clone());
        }
        parts.join(", ")
    }
}

/// A resolved latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Coordinates outside the WGS84 range are provider garbage.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Errors from the geocoding layer. Callers on the best-effort paths log
/// and discard these.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding provider returned status {0}")]
    Provider(u16),

    #[error("provider returned non-numeric coordinates")]
    BadCoordinates,
}

/// HTTP client for a single Nominatim instance.
pub struct Geocoder {
    client: reqwest::Client,
    config: GeoConfig,
    last_request: Mutex<Option<Instant>>,
}

impl Geocoder {
    pub fn new(config: GeoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            last_request: Mutex::new(None),
        }
    }

    /// Resolve an address to coordinates. `Ok(None)` means the provider
    /// found no match; `Err` means the lookup itself failed.
    pub async fn geocode(&self, address: &Address) -> Result<Option<Coordinates>, GeoError> {
        if address.city.is_empty() || address.state.is_empty() {
            return Ok(None);
        }

        self.throttle().await;

        let query = address.to_query();
        tracing::debug!(query, "Geocoding address");

        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .header("User-Agent", &self.config.user_agent)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.config.country_code.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Provider(status.as_u16()));
        }

        let hits: Vec<NominatimHit> = response.json().await?;
        let Some(hit) = hits.into_iter().next() else {
            tracing::debug!(query, "No geocoding match");
            return Ok(None);
        };

        let coords = Coordinates {
            latitude: hit.lat.parse().map_err(|_| GeoError::BadCoordinates)?,
            longitude: hit.lon.parse().map_err(|_| GeoError::BadCoordinates)?,
        };
        if !coords.is_valid() {
            return Err(GeoError::BadCoordinates);
        }
        Ok(Some(coords))
    }

    /// Best-effort wrapper: failures are logged at warn and swallowed so
    /// registration and import flows never fail on geocoding.
    pub async fn geocode_best_effort(&self, address: &Address) -> Option<Coordinates> {
        match self.geocode(address).await {
            Ok(coords) => coords,
            Err(err) => {
                tracing::warn!(error = %err, "Geocoding failed, continuing without coordinates");
                None
            }
        }
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < MIN_REQUEST_DELAY {
                tokio::time::sleep(MIN_REQUEST_DELAY - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_present_parts_in_order() {
        let address = Address {
            street: Some("Av. Paulista".into()),
            number: Some("1578".into()),
            neighborhood: Some("Bela Vista".into()),
            city: "São Paulo".into(),
            state: "SP".into(),
            zip_code: Some("01310-200".into()),
        };
        assert_eq!(
            address.to_query(),
            "Av. Paulista, 1578, Bela Vista, São Paulo, SP, 01310-200"
        );
    }

    #[test]
    fn query_with_city_and_state_only() {
        let address = Address {
            city: "Campinas".into(),
            state: "SP".into(),
            ..Default::default()
        };
        assert_eq!(address.to_query(), "Campinas, SP");
    }

    #[test]
    fn coordinate_bounds() {
        assert!(Coordinates { latitude: -23.56, longitude: -46.65 }.is_valid());
        assert!(!Coordinates { latitude: 91.0, longitude: 0.0 }.is_valid());
        assert!(!Coordinates { latitude: 0.0, longitude: -181.0 }.is_valid());
    }
}
