//! Integration tests for WeatherSession against a mock IPMA server.

use std::sync::Arc;
use std::time::Duration;

use meteo_ipma::{BackgroundColor, ErrorKind, IpmaClient, TimeOfDay};
use meteo_session::WeatherSession;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOCATIONS_PATH: &str = "/distrits-islands.json";
const LISBOA_PATH: &str = "/forecast/meteorology/cities/daily/1010500.json";
const PORTO_PATH: &str = "/forecast/meteorology/cities/daily/1131200.json";

fn test_location(global_id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "idRegiao": 1,
        "idAreaAviso": "LSB",
        "idConcelho": 6,
        "globalIdLocal": global_id,
        "latitude": "38.7660",
        "idDistrito": 11,
        "local": name,
        "longitude": "-9.1286"
    })
}

fn locations_body() -> serde_json::Value {
    serde_json::json!({
        "owner": "IPMA",
        "country": "PT",
        "data": [test_location(1010500, "Lisboa"), test_location(1131200, "Porto")]
    })
}

fn forecast_body(global_id: i64, days: usize) -> serde_json::Value {
    let data: Vec<serde_json::Value> = (0..days)
        .map(|i| {
            serde_json::json!({
                "precipitaProb": "10.0",
                "tMin": "9.0",
                "tMax": "15.0",
                "predWindDir": "NW",
                "idWeatherType": 4,
                "classWindSpeed": 2,
                "longitude": "-9.1286",
                "forecastDate": format!("2024-01-{:02}", 9 + i),
                "latitude": "38.7660"
            })
        })
        .collect();

    serde_json::json!({
        "owner": "IPMA",
        "country": "PT",
        "data": data,
        "globalIdLocal": global_id,
        "dataUpdate": "2024-01-09T11:31:03"
    })
}

async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn session_for(server: &MockServer) -> WeatherSession {
    let client = IpmaClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap();
    WeatherSession::new(Arc::new(client), tokio::runtime::Handle::current())
}

/// Session with locations loaded and Lisboa selected.
async fn session_on_lisboa(server: &MockServer) -> WeatherSession {
    let mut session = session_for(server);
    session.fetch_locations();
    session.settle().await;
    assert!(session.select_location_by_name(Some("Lisboa")));
    session.settle().await;
    session
}

#[tokio::test]
async fn test_fetch_locations_populates_menu() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;

    let mut session = session_for(&server);
    assert!(session.menu_view().is_empty());

    session.fetch_locations();
    assert_eq!(session.in_flight(), 1);
    session.settle().await;

    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.menu_view().entries, vec!["Lisboa", "Porto"]);
    assert!(session.state().selected_location().is_none());
}

#[tokio::test]
async fn test_select_location_fetches_by_global_id() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    Mock::given(method("GET"))
        .and(path(LISBOA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1010500, 5)))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.fetch_locations();
    session.settle().await;

    let lisboa = session
        .state()
        .locations()
        .and_then(|l| l.find_by_name("Lisboa"))
        .cloned()
        .unwrap();
    session.select_location(&lisboa, &WeatherSession::current_date());
    session.settle().await;

    let state = session.state();
    assert_eq!(state.selected_location(), Some(&lisboa));
    assert_eq!(state.forecast().unwrap().global_id_local, 1010500);
    assert_eq!(state.selected_day_index(), 0);

    let view = session.day_view(TimeOfDay::Day).unwrap();
    assert_eq!(view.location_name, "Lisboa");
    assert_eq!(view.date, "2024-01-09");
    assert_eq!(session.background(TimeOfDay::Day), BackgroundColor::Cloudy);
    assert_eq!(session.background(TimeOfDay::Night), BackgroundColor::Night);
}

#[tokio::test]
async fn test_next_day_refetches_and_clamps() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    // One fetch for the selection plus one per navigation step.
    Mock::given(method("GET"))
        .and(path(LISBOA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1010500, 3)))
        .expect(5)
        .mount(&server)
        .await;

    let mut session = session_on_lisboa(&server).await;

    for expected in [1, 2, 2, 2] {
        session.next_day();
        session.settle().await;
        assert_eq!(session.state().selected_day_index(), expected);
    }

    assert_eq!(session.day_view(TimeOfDay::Day).unwrap().date, "2024-01-11");
}

#[tokio::test]
async fn test_previous_day_clamps_at_zero() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    // Selection, one step forward, then three steps back.
    Mock::given(method("GET"))
        .and(path(LISBOA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1010500, 3)))
        .expect(5)
        .mount(&server)
        .await;

    let mut session = session_on_lisboa(&server).await;
    session.next_day();
    session.settle().await;
    assert!(session.can_go_back());

    for _ in 0..3 {
        session.previous_day();
        session.settle().await;
        assert_eq!(session.state().selected_day_index(), 0);
    }
    assert!(!session.can_go_back());
}

#[tokio::test]
async fn test_navigation_without_forecast_is_noop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.next_day();
    session.previous_day();

    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.state().selected_day_index(), 0);
}

#[tokio::test]
async fn test_day_cap_guard() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    mount_json(&server, LISBOA_PATH, forecast_body(1010500, 10)).await;

    let mut session = session_on_lisboa(&server).await;
    let cap = 5;
    while session.can_go_forward(cap) {
        session.next_day();
        session.settle().await;
    }

    assert_eq!(session.state().selected_day_index(), 5);
}

#[tokio::test]
async fn test_malformed_forecast_keeps_previous_state() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    mount_json(&server, LISBOA_PATH, forecast_body(1010500, 3)).await;
    Mock::given(method("GET"))
        .and(path(PORTO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut session = session_on_lisboa(&server).await;
    assert!(session.last_notice().is_none());

    assert!(session.select_location_by_name(Some("Porto")));
    session.settle().await;

    let state = session.state();
    assert_eq!(state.selected_location().unwrap().local, "Lisboa");
    assert_eq!(state.forecast().unwrap().global_id_local, 1010500);
    assert_eq!(state.last_error().unwrap().kind(), ErrorKind::Decode);
    assert!(session.last_notice().is_some());
}

#[tokio::test]
async fn test_error_page_is_reported_as_bad_data() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    Mock::given(method("GET"))
        .and(path(LISBOA_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.fetch_locations();
    session.settle().await;
    assert!(session.select_location_by_name(Some("Lisboa")));
    session.settle().await;

    assert!(session.state().forecast().is_none());
    assert_eq!(
        session.state().last_error().unwrap().kind(),
        ErrorKind::Decode
    );
    assert_eq!(
        session.last_notice(),
        Some("The weather service sent unexpected data. Please try again later.")
    );
}

#[tokio::test]
async fn test_timeout_gets_its_own_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LOCATIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(locations_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = IpmaClient::with_base_url(&server.uri(), Duration::from_millis(200)).unwrap();
    let mut session = WeatherSession::new(Arc::new(client), tokio::runtime::Handle::current());
    session.fetch_locations();
    session.settle().await;

    assert!(session.menu_view().is_empty());
    assert_eq!(
        session.last_notice(),
        Some("The request timed out. Please try again.")
    );
}

#[tokio::test]
async fn test_malformed_locations_keep_previous_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LOCATIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LOCATIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"owner\":"))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.fetch_locations();
    session.settle().await;
    session.fetch_locations();
    session.settle().await;

    assert_eq!(session.menu_view().entries.len(), 2);
    assert_eq!(
        session.state().last_error().unwrap().kind(),
        ErrorKind::Decode
    );
}

#[tokio::test]
async fn test_stale_forecast_is_dropped() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;
    Mock::given(method("GET"))
        .and(path(PORTO_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body(1131200, 3))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_json(&server, LISBOA_PATH, forecast_body(1010500, 3)).await;

    let mut session = session_for(&server);
    session.fetch_locations();
    session.settle().await;

    // The slow Porto response arrives after the newer Lisboa one.
    assert!(session.select_location_by_name(Some("Porto")));
    assert!(session.select_location_by_name(Some("Lisboa")));
    session.settle().await;

    let state = session.state();
    assert_eq!(state.selected_location().unwrap().local, "Lisboa");
    assert_eq!(state.forecast().unwrap().global_id_local, 1010500);
}

#[tokio::test]
async fn test_unknown_or_cancelled_menu_selection() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;

    let mut session = session_for(&server);
    session.fetch_locations();
    session.settle().await;

    assert!(!session.select_location_by_name(None));
    assert!(session.last_notice().is_none());

    assert!(!session.select_location_by_name(Some("Atlantis")));
    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.last_notice(), Some("Region not found."));
}

#[tokio::test]
async fn test_process_pending_applies_arrived_results() {
    let server = MockServer::start().await;
    mount_json(&server, LOCATIONS_PATH, locations_body()).await;

    let mut session = session_for(&server);
    session.fetch_locations();

    // Nothing is applied until the owner drains the channel.
    let mut handled = 0;
    for _ in 0..50 {
        handled += session.process_pending();
        if handled > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(handled, 1);
    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.menu_view().entries.len(), 2);
}
