use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A fixed point on the map
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// One of the two predefined location sets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Neighborhoods,
    #[default]
    Citywide,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Neighborhoods => "neighborhoods",
            View::Citywide => "citywide",
        }
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neighborhoods" => Ok(View::Neighborhoods),
            "citywide" => Ok(View::Citywide),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sky-condition category shown on the map
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Sunny,
    ClearNight,
    PartlyCloudy,
    Cloudy,
    Rain,
    Unknown,
}

impl Category {
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Sunny => "☀️",
            Category::ClearNight => "🌙",
            Category::PartlyCloudy => "⛅",
            Category::Cloudy => "☁️",
            Category::Rain => "🌧️",
            Category::Unknown => "❓",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Sunny => "Sunny",
            Category::ClearNight => "Clear",
            Category::PartlyCloudy => "Partly Cloudy",
            Category::Cloudy => "Cloudy",
            Category::Rain => "Rain",
            Category::Unknown => "Unknown",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sunny => "sunny",
            Category::ClearNight => "clear-night",
            Category::PartlyCloudy => "partly-cloudy",
            Category::Cloudy => "cloudy",
            Category::Rain => "rain",
            Category::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reading came to be
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReadingStatus {
    Observed,
    Failed { reason: String },
}

/// Weather for one location, produced fresh by each fetch
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReading {
    #[serde(flatten)]
    pub location: Location,
    pub category: Category,
    pub icon: String,
    pub label: String,
    pub temp: Option<i64>,
    pub description: String,
    #[serde(flatten)]
    pub status: ReadingStatus,
}

impl WeatherReading {
    pub fn observed(
        location: Location,
        category: Category,
        temp: Option<i64>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            location,
            category,
            icon: category.icon().to_string(),
            label: category.label().to_string(),
            temp,
            description: description.into(),
            status: ReadingStatus::Observed,
        }
    }

    pub fn failed(location: Location, reason: impl Into<String>) -> Self {
        let category = Category::Unknown;
        Self {
            location,
            category,
            icon: category.icon().to_string(),
            label: category.label().to_string(),
            temp: None,
            description: "Unable to fetch weather".to_string(),
            status: ReadingStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ReadingStatus::Failed { .. })
    }
}

/// Sunrise and sunset for the current day, in epoch milliseconds
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct SunTimes {
    pub sunrise: i64,
    pub sunset: i64,
}

/// The subset of the current-weather payload the map consumes
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ObservationResponse {
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub sys: SolarTimes,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Condition {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct MainReadings {
    pub temp: f64,
}

/// Sunrise and sunset in epoch seconds, as the provider reports them
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SolarTimes {
    pub sunrise: i64,
    pub sunset: i64,
}

impl ObservationResponse {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// Temperature rounded half-up to a whole degree
    pub fn rounded_temp(&self) -> i64 {
        (self.main.temp + 0.5).floor() as i64
    }

    pub fn sun_times(&self) -> SunTimes {
        SunTimes {
            sunrise: self.sys.sunrise * 1000,
            sunset: self.sys.sunset * 1000,
        }
    }
}
