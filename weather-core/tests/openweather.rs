//! Integration tests for OpenWeatherProvider using wiremock.

use chrono::{TimeZone, Utc};
use weather_core::{
    ForecastMode, ReportBuilder, ReportRequest, UnitSystem, WeatherError, WeatherProvider,
    provider::openweather::OpenWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "0123456789abcdef0123456789abcdef";

fn main_block(temp: f64) -> serde_json::Value {
    serde_json::json!({
        "temp": temp,
        "feels_like": temp - 1.0,
        "temp_min": temp - 2.0,
        "temp_max": temp + 2.0,
        "pressure": 1012,
        "humidity": 64
    })
}

fn forecast_entry(dt: i64, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": main_block(temp),
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
        "clouds": {"all": 12},
        "wind": {"speed": 3.1, "deg": 200}
    })
}

#[tokio::test]
async fn current_weather_is_parsed_in_native_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "dt": 1_715_680_800,
            "main": main_block(288.15),
            "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
            "wind": {"speed": 4.6, "deg": 250},
            "clouds": {"all": 75}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url(TOKEN.into(), &mock_server.uri());
    let sample = provider.current("London").await.unwrap();

    assert_eq!(sample.location_name, "London");
    assert_eq!(sample.reference_time, Utc.timestamp_opt(1_715_680_800, 0).unwrap());
    assert_eq!(sample.temperature_k, 288.15);
    assert_eq!(sample.temperature_min_k, 286.15);
    assert_eq!(sample.temperature_max_k, 290.15);
    assert_eq!(sample.wind_speed_mps, 4.6);
    assert_eq!(sample.humidity_pct, 64);
    assert_eq!(sample.cloud_coverage_pct, 75);
}

#[tokio::test]
async fn forecast_series_keeps_provider_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "200",
            "cnt": 3,
            "list": [
                forecast_entry(1_715_688_000, 290.0),
                forecast_entry(1_715_698_800, 291.0),
                forecast_entry(1_715_709_600, 292.0)
            ],
            "city": {"id": 2643743, "name": "London", "country": "GB"}
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url(TOKEN.into(), &mock_server.uri());
    let series = provider.forecast_series("London").await.unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series[0].temperature_k, 290.0);
    assert_eq!(series[2].temperature_k, 292.0);
    assert!(series.iter().all(|s| s.location_name == "London"));
    assert_eq!(series[1].cloud_coverage_pct, 12);
}

#[tokio::test]
async fn unauthorized_maps_to_authorization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url("bad".into(), &mock_server.uri());
    let err = provider.current("London").await.unwrap_err();

    match err {
        WeatherError::Authorization(msg) => assert!(msg.starts_with("Invalid API key")),
        other => panic!("expected authorization error, got {other:?}"),
    }
}

#[tokio::test]
async fn not_found_maps_to_location_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url(TOKEN.into(), &mock_server.uri());
    let err = provider.forecast_series("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::LocationNotFound(ref l) if l == "Atlantis"));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url(TOKEN.into(), &mock_server.uri());
    let err = provider.current("London").await.unwrap_err();

    assert!(matches!(
        err,
        WeatherError::Api { status: 503, ref body } if body == "upstream unavailable"
    ));
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url(TOKEN.into(), &mock_server.uri());
    let err = provider.current("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn builder_queries_forecast_once_for_normalized_location() {
    let mock_server = MockServer::start().await;
    let now = Utc.with_ymd_and_hms(2024, 5, 14, 8, 0, 0).unwrap();
    let slot = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();

    let today_noon = Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap();

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Rio De Janeiro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [
                forecast_entry(today_noon.timestamp(), 300.0),
                forecast_entry(slot.timestamp(), 299.15)
            ],
            "city": {"name": "Rio de Janeiro", "country": "BR"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url(TOKEN.into(), &mock_server.uri());
    let builder = ReportBuilder::new(Box::new(provider)).at(now);
    let request = ReportRequest {
        location: "rio de janeiro".into(),
        unit_system: UnitSystem::Metric,
        mode: ForecastMode::Tomorrow,
        hour: 12,
        persist: true,
    };

    let report = builder.build(&request).await.unwrap();

    assert_eq!(report.display.date, slot);
    assert!(report.display.temperature_now.contains("26.00°C"));
    assert_eq!(report.record.unwrap().temperature_now_k, 299.15);
}
