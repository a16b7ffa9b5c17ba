use common::models::Category;

/// Map an OpenWeatherMap condition code to the category shown on the map.
///
/// Codes are grouped by hundreds: 2xx thunderstorm, 3xx drizzle, 5xx rain,
/// 6xx snow, 7xx atmosphere, 800 clear, 80x clouds. Anything unrecognized
/// falls back to `Cloudy`; `Unknown` is reserved for failed fetches.
pub fn categorize(code: i64, is_night: bool) -> Category {
    match code {
        800 if is_night => Category::ClearNight,
        800 => Category::Sunny,
        801 | 802 => Category::PartlyCloudy,
        803 | 804 => Category::Cloudy,
        200..=699 => Category::Rain,
        700..=799 => Category::Cloudy,
        _ => Category::Cloudy,
    }
}
