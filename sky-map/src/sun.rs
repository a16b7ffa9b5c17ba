//! Sun and moon position on the day/night arc.

use std::f64::consts::PI;

use common::models::{Category, SunTimes};

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const MINUTE_MS: i64 = 60 * 1000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Semicircle the marker travels along, in widget coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Default for ArcGeometry {
    fn default() -> Self {
        Self {
            center_x: 60.0,
            center_y: 60.0,
            radius: 50.0,
        }
    }
}

/// Everything the arc widget needs for one instant
#[derive(Debug, Clone, PartialEq)]
pub struct ArcState {
    pub is_night: bool,
    /// Left end of the arc: sunrise by day, the previous sunset by night
    pub start: i64,
    /// Right end of the arc: sunset by day, the next sunrise by night
    pub end: i64,
    pub progress: f64,
    pub angle: f64,
    pub marker_x: f64,
    pub marker_y: f64,
    pub remaining_ms: i64,
    pub remaining_label: String,
}

/// Night is strictly before sunrise or strictly after sunset
pub fn is_night(now: i64, sun_times: &SunTimes) -> bool {
    now < sun_times.sunrise || now > sun_times.sunset
}

pub fn compute_arc_state(now: i64, sun_times: &SunTimes) -> ArcState {
    compute_arc_state_with(ArcGeometry::default(), now, sun_times)
}

pub fn compute_arc_state_with(geometry: ArcGeometry, now: i64, sun_times: &SunTimes) -> ArcState {
    let SunTimes { sunrise, sunset } = *sun_times;
    let night = is_night(now, sun_times);

    let (start, end) = if night {
        let start = if now > sunset { sunset } else { sunset - DAY_MS };
        let end = if now < sunrise { sunrise } else { sunrise + DAY_MS };
        (start, end)
    } else {
        (sunrise, sunset)
    };

    let progress = progress_between(start, end, now);
    let angle = PI * (1.0 - progress);
    let remaining_ms = (end - now).max(0);

    let remaining_label = if night {
        format!("{} until sunrise", format_duration(remaining_ms))
    } else {
        format!("{} of daylight left", format_duration(remaining_ms))
    };

    ArcState {
        is_night: night,
        start,
        end,
        progress,
        angle,
        marker_x: geometry.center_x + geometry.radius * angle.cos(),
        marker_y: geometry.center_y - geometry.radius * angle.sin(),
        remaining_ms,
        remaining_label,
    }
}

fn progress_between(start: i64, end: i64, now: i64) -> f64 {
    let span = end - start;
    if span <= 0 {
        return 0.0;
    }
    ((now - start) as f64 / span as f64).clamp(0.0, 1.0)
}

/// `3h 12m`, or just `12m` under an hour
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / HOUR_MS;
    let mins = (ms % HOUR_MS) / MINUTE_MS;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Global day/night styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Day,
    Night,
}

impl Theme {
    pub fn from_night(is_night: bool) -> Self {
        if is_night { Theme::Night } else { Theme::Day }
    }

    pub fn is_night(&self) -> bool {
        matches!(self, Theme::Night)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Day => "☀️",
            Theme::Night => "🌙",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Theme::Day => "SF Sunshine Map",
            Theme::Night => "SF Clear Skies Map",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Theme::Day => "Where is it sunny in the Bay Area right now?",
            Theme::Night => "Where is the sky clear in SF right now?",
        }
    }

    /// The category the legend's first button filters on
    pub fn primary_category(&self) -> Category {
        match self {
            Theme::Day => Category::Sunny,
            Theme::Night => Category::ClearNight,
        }
    }
}
