//! The map's application state, owned in one place and passed explicitly.

use common::models::{Category, SunTimes, View, WeatherReading};

use crate::orchestrator::BatchSummary;
use crate::sun::{ArcState, Theme, compute_arc_state};

/// Visible map area in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(lat: f64, lon: f64, lat_span: f64, lon_span: f64) -> Self {
        Self {
            south: lat - lat_span / 2.0,
            west: lon - lon_span / 2.0,
            north: lat + lat_span / 2.0,
            east: lon + lon_span / 2.0,
        }
    }

    /// Roughly the initial viewport for each view on a desktop screen
    pub fn initial(view: View) -> Self {
        match view {
            View::Citywide => Self::around(37.76, -122.44, 0.11, 0.17),
            View::Neighborhoods => Self::around(37.76, -122.44, 0.22, 0.34),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}

/// What a marker shows for one reading
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub category: Category,
    pub icon: String,
    pub label: String,
    pub temp_text: Option<String>,
    pub description: String,
}

impl From<&WeatherReading> for Marker {
    fn from(reading: &WeatherReading) -> Self {
        Self {
            name: reading.location.name.clone(),
            lat: reading.location.lat,
            lon: reading.location.lon,
            category: reading.category,
            icon: reading.icon.clone(),
            label: reading.label.clone(),
            temp_text: reading.temp.map(|t| format!("{}°F", t)),
            description: reading.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub view: View,
    pub active_filter: Option<Category>,
    pub readings: Vec<WeatherReading>,
    pub last_updated: Option<i64>,
    pub sun_times: Option<SunTimes>,
    pub arc: Option<ArcState>,
    pub theme: Theme,
}

impl AppState {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Returns true when the view actually changed
    pub fn switch_view(&mut self, view: View) -> bool {
        if self.view == view {
            return false;
        }
        self.view = view;
        true
    }

    /// Selecting the active category again clears the filter
    pub fn toggle_filter(&mut self, category: Category) -> Option<Category> {
        self.active_filter = if self.active_filter == Some(category) {
            None
        } else {
            Some(category)
        };
        self.active_filter
    }

    /// Replaces (never merges) the current batch
    pub fn apply_batch(&mut self, readings: Vec<WeatherReading>, now_ms: i64) {
        self.readings = readings;
        self.last_updated = Some(now_ms);
    }

    /// Recompute the arc and theme. Without sun times the arc stays unset
    /// and the theme keeps its last value.
    pub fn apply_sun(&mut self, sun_times: Option<SunTimes>, now_ms: i64) -> Option<&ArcState> {
        if let Some(sun_times) = sun_times {
            self.sun_times = Some(sun_times);
        }

        let sun_times = self.sun_times?;
        let arc = compute_arc_state(now_ms, &sun_times);
        self.theme = Theme::from_night(arc.is_night);
        self.arc = Some(arc);
        self.arc.as_ref()
    }

    pub fn visible_readings(&self) -> impl Iterator<Item = &WeatherReading> {
        self.readings
            .iter()
            .filter(move |r| self.active_filter.is_none_or(|c| r.category == c))
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.visible_readings().map(Marker::from).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_readings(&self.readings)
    }

    /// A hint when nothing of interest is visible, e.g. `No sunny skies in this area :(`
    pub fn no_match_message(&self, bounds: &Bounds) -> Option<String> {
        if self.readings.is_empty() {
            return None;
        }

        let category = self
            .active_filter
            .unwrap_or_else(|| self.theme.primary_category());
        let visible = self
            .readings
            .iter()
            .filter(|r| r.category == category && bounds.contains(r.location.lat, r.location.lon))
            .count();

        if visible > 0 {
            return None;
        }

        let suffix = match category {
            Category::Sunny | Category::ClearNight => " :(",
            _ => "",
        };
        Some(format!("No {} in this area{}", sky_phrase(category), suffix))
    }
}

fn sky_phrase(category: Category) -> &'static str {
    match category {
        Category::Sunny => "sunny skies",
        Category::ClearNight => "clear skies",
        Category::PartlyCloudy => "partly cloudy skies",
        Category::Cloudy => "cloudy skies",
        Category::Rain => "rain",
        Category::Unknown => "unknown conditions",
    }
}
