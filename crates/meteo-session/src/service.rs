//! Weather backend: async IPMA fetches.
//! All network work runs on the runtime; results are sent back via mpsc.

use std::sync::Arc;

use meteo_core::{NetworkError, ReqwestErrorExt};
use meteo_ipma::{ErrorKind, ForecastResponse, IpmaClient, Location, LocationList};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transport failure, timeout or error status, classified
    Network(NetworkError),
    Decode(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Network(_) => ErrorKind::Network,
            ServiceError::Decode(_) => ErrorKind::Decode,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Network(e) => write!(f, "Network error: {}", e),
            ServiceError::Decode(s) => write!(f, "Decode error: {}", s),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<meteo_ipma::WeatherError> for ServiceError {
    fn from(e: meteo_ipma::WeatherError) -> Self {
        match e {
            meteo_ipma::WeatherError::Network(e) => ServiceError::Network(e.into_network_error()),
            meteo_ipma::WeatherError::Decode(e) => ServiceError::Decode(e.to_string()),
        }
    }
}

/// Messages sent from async operations back to the session owner
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching the location list
    LocationsDone(Result<LocationList, ServiceError>),
    /// Result of fetching a forecast for `location`
    ForecastDone {
        generation: u64,
        location: Location,
        result: Result<ForecastResponse, ServiceError>,
    },
}

/// Guarantees exactly one message per request.
///
/// If the task is dropped before it reports (panic, runtime shutdown, never
/// polled), the fallback is sent instead so the owner's in-flight count
/// still drains.
struct Completion {
    tx: UnboundedSender<WeatherServiceMessage>,
    fallback: Option<WeatherServiceMessage>,
}

impl Completion {
    fn new(tx: &UnboundedSender<WeatherServiceMessage>, fallback: WeatherServiceMessage) -> Self {
        Self {
            tx: tx.clone(),
            fallback: Some(fallback),
        }
    }

    fn send(mut self, msg: WeatherServiceMessage) {
        self.fallback = None;
        let _ = self.tx.send(msg);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(msg) = self.fallback.take() {
            tracing::warn!("Weather request ended without a result");
            let _ = self.tx.send(msg);
        }
    }
}

fn aborted() -> ServiceError {
    ServiceError::Network(NetworkError::ConnectionFailed(
        "request aborted before completion".to_string(),
    ))
}

/// Request the location list asynchronously.
/// Sends `LocationsDone` on the channel when complete.
pub fn request_locations(
    tx: &UnboundedSender<WeatherServiceMessage>,
    runtime: &Handle,
    client: Arc<IpmaClient>,
) {
    let completion = Completion::new(tx, WeatherServiceMessage::LocationsDone(Err(aborted())));
    runtime.spawn(async move {
        let result = client.fetch_locations().await.map_err(ServiceError::from);
        completion.send(WeatherServiceMessage::LocationsDone(result));
    });
}

/// Request a forecast asynchronously.
/// Sends `ForecastDone` tagged with `generation` when complete.
pub fn request_forecast(
    tx: &UnboundedSender<WeatherServiceMessage>,
    runtime: &Handle,
    client: Arc<IpmaClient>,
    location: Location,
    generation: u64,
) {
    let completion = Completion::new(
        tx,
        WeatherServiceMessage::ForecastDone {
            generation,
            location: location.clone(),
            result: Err(aborted()),
        },
    );
    runtime.spawn(async move {
        let result = client
            .fetch_forecast(location.global_id_local)
            .await
            .map_err(ServiceError::from);
        completion.send(WeatherServiceMessage::ForecastDone {
            generation,
            location,
            result,
        });
    });
}
