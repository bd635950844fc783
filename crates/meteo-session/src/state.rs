use meteo_ipma::{ForecastResponse, Location, LocationList};

use crate::service::ServiceError;

/// Observable session state.
///
/// Mutated only by fetch completions and navigation. The selected day index
/// always stays within the loaded forecast.
#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    locations: Option<LocationList>,
    forecast: Option<ForecastResponse>,
    selected_day_index: usize,
    selected_location: Option<Location>,
    last_error: Option<ServiceError>,
}

impl WeatherState {
    pub fn locations(&self) -> Option<&LocationList> {
        self.locations.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastResponse> {
        self.forecast.as_ref()
    }

    pub fn selected_day_index(&self) -> usize {
        self.selected_day_index
    }

    /// `None` means the region picker should be shown.
    pub fn selected_location(&self) -> Option<&Location> {
        self.selected_location.as_ref()
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    /// Weather type of the selected day, 0 when nothing is loaded.
    pub fn selected_weather_type(&self) -> i32 {
        self.forecast
            .as_ref()
            .and_then(|f| f.day(self.selected_day_index))
            .map(|d| d.id_weather_type)
            .unwrap_or(0)
    }

    /// Apply a location-list completion. Failures keep the held list.
    pub fn apply_locations(&mut self, result: Result<LocationList, ServiceError>) {
        match result {
            Ok(list) => {
                tracing::info!("Loaded {} locations", list.data.len());
                self.locations = Some(list);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to fetch locations: {}", e);
                self.last_error = Some(e);
            }
        }
    }

    /// Apply a forecast completion for `location`. Failures keep the held
    /// forecast and selection. The day index is kept, clamped to the new
    /// forecast.
    pub fn apply_forecast(
        &mut self,
        location: Location,
        result: Result<ForecastResponse, ServiceError>,
    ) {
        match result {
            Ok(forecast) => {
                let last = forecast.last_index().unwrap_or(0);
                if self.selected_day_index > last {
                    tracing::debug!(
                        "Clamping day index {} to {}",
                        self.selected_day_index,
                        last
                    );
                    self.selected_day_index = last;
                }
                tracing::info!(
                    "Loaded forecast for {} ({})",
                    location.local,
                    location.global_id_local
                );
                self.forecast = Some(forecast);
                self.selected_location = Some(location);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to fetch forecast for {}: {}", location.local, e);
                self.last_error = Some(e);
            }
        }
    }

    /// Move the day index by one step, clamped to the forecast bounds.
    ///
    /// Returns the selected location and the new day's date, or `None`
    /// (leaving the state untouched) when no forecast or location is loaded.
    pub fn step_day(&mut self, forward: bool) -> Option<(Location, String)> {
        let forecast = self.forecast.as_ref()?;
        let location = self.selected_location.clone()?;
        let last = forecast.last_index()?;

        self.selected_day_index = if forward {
            (self.selected_day_index + 1).min(last)
        } else {
            self.selected_day_index.saturating_sub(1)
        };

        let date = forecast
            .day(self.selected_day_index)
            .map(|d| d.forecast_date.clone())
            .unwrap_or_default();

        Some((location, date))
    }
}
