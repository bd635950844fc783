//! Display rules shared by every front-end: day/night, background colour and
//! icon asset naming.

use chrono::{Local, Timelike};

/// Day starts after this hour.
const DAY_START_HOUR: u32 = 6;
/// Night starts at this hour.
const DAY_END_HOUR: u32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Day iff the hour is strictly between 6 and 19.
    pub fn from_hour(hour: u32) -> Self {
        if DAY_START_HOUR < hour && hour < DAY_END_HOUR {
            Self::Day
        } else {
            Self::Night
        }
    }

    /// Classify the local wall-clock time.
    pub fn now() -> Self {
        Self::from_hour(Local::now().hour())
    }

    /// Asset-name code: "d" or "n"
    pub fn code(&self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Night => "n",
        }
    }
}

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Background palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundColor {
    Clear,
    Cloudy,
    Adverse,
    Night,
}

impl BackgroundColor {
    pub fn rgb(&self) -> Rgb {
        match self {
            Self::Clear => Rgb(65, 189, 232),
            Self::Cloudy => Rgb(54, 155, 187),
            Self::Adverse => Rgb(84, 121, 131),
            Self::Night => Rgb(21, 56, 67),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Adverse => "adverse",
            Self::Night => "night",
        }
    }
}

/// Background colour for a weather type at a given time of day.
///
/// Night ignores the weather type. Ids outside the table fall back to clear.
pub fn background_color_for(weather_type_id: i32, time_of_day: TimeOfDay) -> BackgroundColor {
    if time_of_day == TimeOfDay::Night {
        return BackgroundColor::Night;
    }

    match weather_type_id {
        1 | 2 | 3 | 25 | 27 => BackgroundColor::Clear,
        4 | 5 | 6 | 7 | 8 | 16 | 20 | 24 | 26 | 28 | 30 => BackgroundColor::Cloudy,
        9 | 10 | 11 | 12 | 13 | 14 | 15 | 18 | 19 | 21 | 22 | 23 | 29 => {
            BackgroundColor::Adverse
        }
        _ => BackgroundColor::Clear,
    }
}

/// Bundle asset name of the weather icon, e.g. `w_ic_d_3`.
pub fn icon_asset_name(time_of_day: TimeOfDay, weather_type_id: i32) -> String {
    format!("w_ic_{}_{}", time_of_day.code(), weather_type_id)
}
