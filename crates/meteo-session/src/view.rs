//! Display-ready snapshots of the session state.

use std::fmt::Write as _;

use meteo_ipma::{background_color_for, icon_asset_name, BackgroundColor, TimeOfDay};

use crate::state::WeatherState;

const NO_LOCATION: &str = "No location chosen";

/// The selected forecast day, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: String,
    /// Short weekday name, empty when the date does not parse
    pub weekday: String,
    pub location_name: String,
    pub icon: String,
    pub condition: String,
    pub t_min: String,
    pub t_max: String,
    pub precipitation: String,
    pub wind_class: i32,
    pub wind_description: String,
    pub wind_direction: String,
    pub background: BackgroundColor,
    pub day_index: usize,
    pub day_count: usize,
}

impl DayView {
    pub fn from_state(state: &WeatherState, time_of_day: TimeOfDay) -> Option<Self> {
        let forecast = state.forecast()?;
        let index = state.selected_day_index();
        let day = forecast.day(index)?;

        Some(Self {
            date: day.forecast_date.clone(),
            weekday: day
                .date()
                .map(|d| d.format("%a").to_string())
                .unwrap_or_default(),
            location_name: state
                .selected_location()
                .map(|l| l.local.clone())
                .unwrap_or_else(|| NO_LOCATION.to_string()),
            icon: icon_asset_name(time_of_day, day.id_weather_type),
            condition: day.weather_type().description().to_string(),
            t_min: day.t_min.clone(),
            t_max: day.t_max.clone(),
            precipitation: day.precipita_prob.clone(),
            wind_class: day.class_wind_speed,
            wind_description: day.wind_speed_description().to_string(),
            wind_direction: day.pred_wind_dir.clone(),
            background: background_color_for(day.id_weather_type, time_of_day),
            day_index: index,
            day_count: forecast.data.len(),
        })
    }
}

/// Region picker entries, in API order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuView {
    pub entries: Vec<String>,
}

impl MenuView {
    pub fn from_state(state: &WeatherState) -> Self {
        Self {
            entries: state
                .locations()
                .map(|list| list.data.iter().map(|l| l.local.clone()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn render_day(view: &DayView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{} {}] day {}/{}",
        view.background.name(),
        view.background.rgb().hex(),
        view.day_index + 1,
        view.day_count
    );
    let _ = writeln!(out, "Date: {} {}", view.weekday, view.date);
    let _ = writeln!(out, "Location: {}", view.location_name);
    let _ = writeln!(out, "Sky: {} ({})", view.condition, view.icon);
    let _ = writeln!(out, "Min: {}°  Max: {}°", view.t_min, view.t_max);
    let _ = writeln!(out, "Precipitation: {} %", view.precipitation);
    let _ = writeln!(
        out,
        "Wind: {} (class {}), direction {}",
        view.wind_description, view.wind_class, view.wind_direction
    );
    out
}

pub fn render_menu(menu: &MenuView) -> String {
    let mut out = String::from("Select a region:\n");
    if menu.is_empty() {
        out.push_str("  (no regions loaded)\n");
    }
    for entry in &menu.entries {
        let _ = writeln!(out, "  {}", entry);
    }
    out.push_str("  cancel\n");
    out
}
