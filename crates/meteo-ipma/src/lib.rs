//! IPMA open-data client for Meteo
//!
//! Fetches the district/island location list and per-location daily
//! forecasts, and derives the presentation rules (day/night, background
//! colour, icon asset) used to render them.

pub mod client;
pub mod presentation;
pub mod types;

pub use client::IpmaClient;
pub use presentation::{background_color_for, icon_asset_name, BackgroundColor, Rgb, TimeOfDay};
pub use types::*;
