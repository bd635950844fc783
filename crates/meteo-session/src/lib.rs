//! Weather session: the observable state behind every Meteo front-end.
//!
//! Network work runs on a tokio runtime; results come back over a channel
//! and are only applied when the session owner drains it.

pub mod error_mapping;
pub mod service;
pub mod session;
pub mod state;
pub mod view;

pub use service::{ServiceError, WeatherServiceMessage};
pub use session::WeatherSession;
pub use state::WeatherState;
pub use view::{render_day, render_menu, DayView, MenuView};
