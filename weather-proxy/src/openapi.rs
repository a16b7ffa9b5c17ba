use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{Condition, MainReadings, ObservationResponse, SolarTimes};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_weather),
    components(schemas(ObservationResponse, Condition, MainReadings, SolarTimes)),
    tags(
        (name = "weather", description = "Current-weather proxy"),
    ),
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
