//! Postcode lookup and direction-from-New-York calculation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Direction;

/// New York City reference coordinates
pub const NY_LATITUDE: f64 = 40.7128;
pub const NY_LONGITUDE: f64 = -74.0060;

const DEFAULT_ZIP_API_BASE_URL: &str = "https://api.zippopotam.us/us";

/// Location data resolved for a US postcode
#[derive(Clone, Debug)]
pub struct ZipcodeLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
    pub state: String,
    pub state_abbreviation: String,
}

/// Resolves US postcodes to coordinates.
///
/// Implementations return `None` when the postcode is unknown or the lookup
/// fails; callers treat both the same way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZipcodeClient: Send + Sync {
    async fn lookup(&self, postcode: &str) -> Option<ZipcodeLocation>;
}

/// Compute the compass quadrant of a coordinate relative to New York City.
pub fn direction_from_new_york(latitude: f64, longitude: f64) -> Direction {
    let north = latitude >= NY_LATITUDE;
    let east = longitude >= NY_LONGITUDE;

    match (north, east) {
        (true, true) => Direction::Northeast,
        (true, false) => Direction::Northwest,
        (false, true) => Direction::Southeast,
        (false, false) => Direction::Southwest,
    }
}

/// Wire format of the zippopotam.us API.
///
/// Coordinates arrive as strings and some keys contain spaces.
#[derive(Debug, Deserialize)]
struct ZippopotamResponse {
    places: Vec<ZippopotamPlace>,
}

#[derive(Debug, Deserialize)]
struct ZippopotamPlace {
    #[serde(rename = "place name")]
    place_name: String,
    latitude: String,
    longitude: String,
    state: String,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: String,
}

impl ZippopotamPlace {
    fn into_location(self) -> Option<ZipcodeLocation> {
        let latitude = self.latitude.parse().ok()?;
        let longitude = self.longitude.parse().ok()?;
        Some(ZipcodeLocation {
            latitude,
            longitude,
            place_name: self.place_name,
            state: self.state,
            state_abbreviation: self.state_abbreviation,
        })
    }
}

/// HTTP implementation of [`ZipcodeClient`] backed by zippopotam.us.
pub struct HttpZipcodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpZipcodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build a client from the environment.
    ///
    /// `ZIP_API_BASE_URL` overrides the default public API endpoint.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ZIP_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ZIP_API_BASE_URL.to_string());
        Self::new(base_url)
    }
}

#[async_trait]
impl ZipcodeClient for HttpZipcodeClient {
    async fn lookup(&self, postcode: &str) -> Option<ZipcodeLocation> {
        let url = format!("{}/{}", self.base_url, postcode);
        debug!(%url, "Fetching zipcode data");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, postcode, "Zipcode lookup request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                postcode,
                "Zipcode lookup returned non-success status"
            );
            return None;
        }

        let body: ZippopotamResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, postcode, "Failed to decode zipcode response");
                return None;
            }
        };

        let location = body.places.into_iter().next()?.into_location();
        if location.is_none() {
            warn!(postcode, "No usable location data for postcode");
        }
        location
    }
}
