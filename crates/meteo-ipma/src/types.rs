use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A selectable district or island region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id_regiao: i64,
    pub id_area_aviso: String,
    pub id_concelho: i64,
    /// Stable identifier used to request forecasts
    pub global_id_local: i64,
    pub latitude: String,
    pub id_distrito: i64,
    /// Display name
    pub local: String,
    pub longitude: String,
}

impl Location {
    pub fn id(&self) -> i64 {
        self.global_id_local
    }
}

/// Envelope returned by the locations endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationList {
    pub owner: String,
    pub country: String,
    pub data: Vec<Location>,
}

impl LocationList {
    /// Look a region up by its display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Location> {
        self.data.iter().find(|l| l.local == name)
    }
}

/// One calendar day of forecast for a location.
///
/// IPMA encodes most numeric values as strings; they are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// Precipitation probability, percent
    pub precipita_prob: String,
    pub t_min: String,
    pub t_max: String,
    pub pred_wind_dir: String,
    pub id_weather_type: i32,
    pub class_wind_speed: i32,
    pub longitude: String,
    /// ISO date, e.g. "2024-01-09"
    pub forecast_date: String,
    pub latitude: String,
}

impl DailyForecast {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.forecast_date, "%Y-%m-%d").ok()
    }

    pub fn weather_type(&self) -> WeatherType {
        WeatherType::from_id(self.id_weather_type)
    }

    pub fn wind_speed_description(&self) -> &'static str {
        wind_speed_class_description(self.class_wind_speed)
    }
}

/// Envelope returned by the daily forecast endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub owner: String,
    pub country: String,
    /// Chronological; index 0 is the earliest available day
    pub data: Vec<DailyForecast>,
    pub global_id_local: i64,
    pub data_update: String,
}

impl ForecastResponse {
    pub fn day(&self, index: usize) -> Option<&DailyForecast> {
        self.data.get(index)
    }

    /// Highest valid day index, or `None` for an empty forecast
    pub fn last_index(&self) -> Option<usize> {
        self.data.len().checked_sub(1)
    }
}

/// IPMA weather-type code, 1 through 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeatherType(pub i32);

impl WeatherType {
    pub fn from_id(id: i32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> i32 {
        self.0
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self.0 {
            1 => "Clear sky",
            2 | 25 => "Partly cloudy",
            3 => "Sunny intervals",
            4 | 27 => "Cloudy",
            5 => "Cloudy (high cloud)",
            6 => "Showers",
            7 => "Light showers",
            8 => "Heavy showers",
            9 => "Rain",
            10 => "Light rain",
            11 => "Heavy rain",
            12 => "Intermittent rain",
            13 => "Intermittent light rain",
            14 => "Intermittent heavy rain",
            15 => "Drizzle",
            16 => "Mist",
            17 | 26 => "Fog",
            18 => "Snow",
            19 => "Thunderstorms",
            20 => "Showers and thunderstorms",
            21 => "Hail",
            22 => "Frost",
            23 => "Rain and thunderstorms",
            24 => "Convective clouds",
            28 => "Snow showers",
            29 | 30 => "Rain and snow",
            _ => "Unknown",
        }
    }
}

/// Describe an IPMA wind-speed class
pub fn wind_speed_class_description(class: i32) -> &'static str {
    match class {
        1 => "Weak",
        2 => "Moderate",
        3 => "Strong",
        4 => "Very strong",
        _ => "Unknown",
    }
}

/// Failure category of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
}

/// IPMA client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The request could not complete (transport failure or error status)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The body did not match the expected schema
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Could not reach IPMA. Check your connection.",
            Self::Decode(_) => "IPMA sent data in an unexpected format.",
        }
    }
}
