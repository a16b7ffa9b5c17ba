use chrono::{NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// One reading of the clock, in epoch milliseconds.
///
/// `sky_ms` is what the sun and night logic sees and follows a pinned time
/// of day. `wall_ms` is always the real time and ages cached records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Now {
    pub sky_ms: i64,
    pub wall_ms: i64,
}

impl Now {
    /// Both readings at the same instant
    pub fn at(ms: i64) -> Self {
        Self {
            sky_ms: ms,
            wall_ms: ms,
        }
    }
}

/// Source of "now" in epoch milliseconds.
///
/// `TimeOfDay` pins the clock to a fixed local time on the current date,
/// which makes night mode easy to check in the middle of the day.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    TimeOfDay { time: NaiveTime, tz: Tz },
}

impl Clock {
    pub fn now(&self) -> Now {
        Now {
            sky_ms: self.now_ms(),
            wall_ms: Utc::now().timestamp_millis(),
        }
    }

    /// The sky time: pinned when a time of day is configured
    pub fn now_ms(&self) -> i64 {
        let now = Utc::now();
        match self {
            Clock::System => now.timestamp_millis(),
            Clock::TimeOfDay { time, tz } => {
                let today = now.with_timezone(tz).date_naive();
                tz.from_local_datetime(&today.and_time(*time))
                    .earliest()
                    .map(|dt| dt.timestamp_millis())
                    .unwrap_or_else(|| now.timestamp_millis())
            }
        }
    }
}

/// Parse `HH:MM` as a local time of day
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// `9:05 PM` in the given zone
pub fn format_clock(epoch_ms: i64, tz: Tz) -> String {
    tz.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}
