//! Plain-text rendering of a weather report.

use chrono::NaiveTime;
use weather_core::{CurrentConditions, ForecastDay, WeatherReport};

/// Layout settings, fixed for the lifetime of a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Width of the left-hand label column in the current-conditions block.
    pub label_width: usize,
    /// Width of one forecast card column.
    pub card_width: usize,
    pub rule: char,
    pub show_status: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { label_width: 12, card_width: 26, rule: '─', show_status: true }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn report(&self, report: &WeatherReport, updated_at: NaiveTime) -> String {
        let mut out = String::new();
        out.push_str(&self.current(&report.current));
        out.push('\n');
        out.push_str(&self.forecast(&report.forecast));
        if self.theme.show_status {
            out.push('\n');
            out.push_str(&status_updated(&report.current.location, updated_at));
            out.push('\n');
        }
        out
    }

    pub fn current(&self, current: &CurrentConditions) -> String {
        let width = self.theme.label_width;
        let rows = [
            ("Temperature", &current.temp),
            ("Feels like", &current.feels_like),
            ("Conditions", &current.conditions),
            ("Wind", &current.wind),
            ("Humidity", &current.humidity),
            ("Pressure", &current.pressure),
            ("Visibility", &current.visibility),
            ("Sunrise", &current.sunrise),
            ("Sunset", &current.sunset),
            ("UV Index", &current.uv_index),
        ];

        let mut out = format!("{}\n{}\n", current.location, self.rule(current.location.chars().count()));
        for (label, value) in rows {
            out.push_str(&format!("{:<width$} {value}\n", format!("{label}:")));
        }
        out
    }

    /// Forecast cards laid out side by side, one column per day.
    pub fn forecast(&self, days: &[ForecastDay]) -> String {
        if days.is_empty() {
            return String::new();
        }

        let cards: Vec<[String; 6]> = days
            .iter()
            .map(|day| {
                [
                    format!("{} ({})", day.day_name, day.date),
                    format!("Avg: {}", day.avg_temp),
                    format!("Max: {}", day.max_temp),
                    format!("Min: {}", day.min_temp),
                    day.description.clone(),
                    format!("Wind: {}", day.wind),
                ]
            })
            .collect();

        let width = self.theme.card_width;
        let mut out = format!("3-Day Forecast\n{}\n", self.rule(width * days.len()));
        for line in 0..6 {
            let row: Vec<String> = cards
                .iter()
                .map(|card| format!("{:<width$}", fit(&card[line], width.saturating_sub(1))))
                .collect();
            out.push_str(row.join("").trim_end());
            out.push('\n');
        }
        out
    }

    fn rule(&self, len: usize) -> String {
        std::iter::repeat_n(self.theme.rule, len).collect()
    }
}

pub fn status_fetching() -> &'static str {
    "Fetching weather data..."
}

pub fn status_updated(location: &str, at: NaiveTime) -> String {
    format!("Weather data for {location} - Last updated: {}", at.format("%H:%M:%S"))
}

pub fn status_failed() -> &'static str {
    "Error fetching weather data"
}

fn fit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
