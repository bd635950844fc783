//! Maps session and client errors to meteo_core::AppError for consistent
//! user-facing messages.

use crate::service::ServiceError;
use meteo_core::{AppError, WeatherError};

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Network(e) => AppError::Network(e),
            ServiceError::Decode(s) => AppError::Weather(WeatherError::InvalidData(s)),
        }
    }
}

/// Map a direct client error, keeping the transport detail for network
/// failures.
pub fn from_client_error(e: meteo_ipma::WeatherError) -> AppError {
    ServiceError::from(e).into()
}
