use common::models::{Category, View};

/// A line typed at the headless map's prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(View),
    Filter(Category),
    Refresh,
    Show,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();

        match (verb.as_str(), arg) {
            ("view", Some(view)) => view.parse().map(Command::View),
            ("filter", Some(category)) => parse_category(category).map(Command::Filter),
            ("refresh", None) => Ok(Command::Refresh),
            ("show", None) | ("", None) => Ok(Command::Show),
            ("quit" | "exit", None) => Ok(Command::Quit),
            _ => Err(format!(
                "unrecognized command '{}' (try: view <neighborhoods|citywide>, filter <category>, refresh, show, quit)",
                line.trim()
            )),
        }
    }
}

fn parse_category(value: &str) -> Result<Category, String> {
    match value.to_lowercase().as_str() {
        "sunny" => Ok(Category::Sunny),
        "clear-night" | "clear" => Ok(Category::ClearNight),
        "partly-cloudy" => Ok(Category::PartlyCloudy),
        "cloudy" => Ok(Category::Cloudy),
        "rain" => Ok(Category::Rain),
        "unknown" => Ok(Category::Unknown),
        other => Err(format!("unknown category '{}'", other)),
    }
}
