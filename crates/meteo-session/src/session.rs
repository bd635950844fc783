use std::sync::Arc;

use meteo_core::{AppError, WeatherError};
use meteo_ipma::{background_color_for, BackgroundColor, IpmaClient, Location, TimeOfDay};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::service::{self, WeatherServiceMessage};
use crate::state::WeatherState;
use crate::view::{DayView, MenuView};

/// Owns the weather state and dispatches fetches.
///
/// Fetch results are queued on a channel and only applied by
/// [`process_pending`](Self::process_pending) or [`settle`](Self::settle),
/// so every mutation happens on whichever task owns the session.
pub struct WeatherSession {
    state: WeatherState,
    client: Arc<IpmaClient>,
    runtime: Handle,
    tx: UnboundedSender<WeatherServiceMessage>,
    rx: UnboundedReceiver<WeatherServiceMessage>,
    in_flight: usize,
    /// Generation of the newest forecast request
    forecast_generation: u64,
    last_notice: Option<&'static str>,
}

impl WeatherSession {
    pub fn new(client: Arc<IpmaClient>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state: WeatherState::default(),
            client,
            runtime,
            tx,
            rx,
            in_flight: 0,
            forecast_generation: 0,
            last_notice: None,
        }
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Requests issued but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// User-facing message for the most recent failure, if the latest
    /// action failed.
    pub fn last_notice(&self) -> Option<&'static str> {
        self.last_notice
    }

    /// Today's date as sent along with a location selection.
    pub fn current_date() -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }

    /// Fetch the district/island list.
    pub fn fetch_locations(&mut self) {
        tracing::debug!("Requesting location list");
        self.last_notice = None;
        self.in_flight += 1;
        service::request_locations(&self.tx, &self.runtime, self.client.clone());
    }

    /// Fetch the forecast for `location`.
    ///
    /// `date` is informational: the endpoint always returns the whole
    /// multi-day window.
    pub fn select_location(&mut self, location: &Location, date: &str) {
        self.forecast_generation += 1;
        self.last_notice = None;
        self.in_flight += 1;
        tracing::info!(
            location = %location.local,
            global_id_local = location.global_id_local,
            date,
            generation = self.forecast_generation,
            "Requesting forecast"
        );
        service::request_forecast(
            &self.tx,
            &self.runtime,
            self.client.clone(),
            location.clone(),
            self.forecast_generation,
        );
    }

    /// Menu selection by display name. `None` is a cancelled menu.
    ///
    /// Returns whether a fetch was issued.
    pub fn select_location_by_name(&mut self, name: Option<&str>) -> bool {
        let Some(name) = name else {
            tracing::info!("No location selected");
            return false;
        };

        let found = self
            .state
            .locations()
            .and_then(|list| list.find_by_name(name))
            .cloned();

        match found {
            Some(location) => {
                self.select_location(&location, &Self::current_date());
                true
            }
            None => {
                let err = AppError::from(WeatherError::LocationNotFound(name.to_string()));
                tracing::warn!("{}", err);
                self.last_notice = Some(err.user_message());
                false
            }
        }
    }

    /// Advance one day and re-request the forecast for the selected location.
    /// No-op without a loaded forecast and location.
    pub fn next_day(&mut self) {
        self.step_day(true);
    }

    /// Go back one day and re-request the forecast for the selected location.
    /// No-op without a loaded forecast and location.
    pub fn previous_day(&mut self) {
        self.step_day(false);
    }

    fn step_day(&mut self, forward: bool) {
        if let Some((location, date)) = self.state.step_day(forward) {
            tracing::debug!("Day index now {}", self.state.selected_day_index());
            self.select_location(&location, &date);
        }
    }

    /// Whether the front-end should offer "next day" under a day cap.
    pub fn can_go_forward(&self, max_day_index: usize) -> bool {
        self.state.selected_day_index() < max_day_index
    }

    /// Whether the front-end should offer "previous day".
    pub fn can_go_back(&self) -> bool {
        self.state.selected_day_index() > 0
    }

    /// Apply every completion that has already arrived, without waiting.
    /// Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
            handled += 1;
        }
        handled
    }

    /// Wait for every in-flight request and apply its result.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(msg) => self.apply(msg),
                None => break,
            }
        }
    }

    fn apply(&mut self, msg: WeatherServiceMessage) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match msg {
            WeatherServiceMessage::LocationsDone(result) => {
                self.last_notice = result.as_ref().err().map(notice_for);
                self.state.apply_locations(result);
            }
            WeatherServiceMessage::ForecastDone {
                generation,
                location,
                result,
            } => {
                if generation < self.forecast_generation {
                    tracing::debug!(
                        "Dropping stale forecast for {} (generation {} < {})",
                        location.local,
                        generation,
                        self.forecast_generation
                    );
                    return;
                }
                self.last_notice = result.as_ref().err().map(notice_for);
                self.state.apply_forecast(location, result);
            }
        }
    }

    /// Background colour for the selected day.
    pub fn background(&self, time_of_day: TimeOfDay) -> BackgroundColor {
        background_color_for(self.state.selected_weather_type(), time_of_day)
    }

    /// Display snapshot of the selected day, if a forecast is loaded.
    pub fn day_view(&self, time_of_day: TimeOfDay) -> Option<DayView> {
        DayView::from_state(&self.state, time_of_day)
    }

    pub fn menu_view(&self) -> MenuView {
        MenuView::from_state(&self.state)
    }
}

fn notice_for(err: &crate::service::ServiceError) -> &'static str {
    AppError::from(err.clone()).user_message()
}
