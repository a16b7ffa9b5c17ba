use std::future::Future;
use std::sync::Arc;

use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::{Location, ObservationResponse};
use tracing::{debug, instrument};

/// Where per-location observations come from
pub trait WeatherSource: Send + Sync {
    fn fetch_observation(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<ObservationResponse, AppError>> + Send;
}

impl<T: WeatherSource> WeatherSource for Arc<T> {
    fn fetch_observation(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<ObservationResponse, AppError>> + Send {
        self.as_ref().fetch_observation(location)
    }
}

/// Talks to the weather proxy's `/weather` route
pub struct ProxyClient {
    http_client: HttpClient,
    base_url: String,
}

impl ProxyClient {
    pub fn new(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    fn url_for(&self, location: &Location) -> String {
        format!(
            "{}/weather?lat={}&lon={}",
            self.base_url, location.lat, location.lon
        )
    }
}

impl WeatherSource for ProxyClient {
    #[instrument(skip(self, location), fields(location = %location.name))]
    async fn fetch_observation(&self, location: &Location) -> Result<ObservationResponse, AppError> {
        let url = self.url_for(location);
        let observation: ObservationResponse = self.http_client.get_json(&url).await?;

        if observation.weather.is_empty() {
            return Err(AppError::internal("observation has no weather conditions"));
        }

        debug!(location = %location.name, "Observation received");
        Ok(observation)
    }
}
