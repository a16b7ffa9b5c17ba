use common::errors::AppError;
use common::http_client::HttpClient;
use tracing::{info, instrument};

/// Forwards coordinate lookups to the OpenWeatherMap current-weather API
pub struct OpenWeatherClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(
        http_client: HttpClient,
        base_url: String,
        api_key: String,
        units: String,
    ) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            units,
        }
    }

    /// Returns the upstream body unchanged, provided it is a JSON document
    #[instrument(skip(self))]
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Result<String, AppError> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}&units={}",
            self.base_url,
            lat,
            lon,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.units),
        );

        let body = self.http_client.get_text(&url).await?;
        serde_json::from_str::<serde_json::Value>(&body)?;

        info!(lat, lon, "Forwarded weather lookup");
        Ok(body)
    }
}
