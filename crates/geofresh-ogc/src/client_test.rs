use super::*;

fn test_client(base_url: &str) -> OgcClient {
    OgcClient::with_base_url(base_url, 30, "geofresh-test/0.1")
        .expect("client construction should not fail")
}

fn pid(id: &str) -> ProcessId {
    ProcessId::new(id).unwrap()
}

#[test]
fn execution_url_appends_to_base_path() {
    let client = test_client("https://aqua.igb-berlin.de/pygeoapi");
    assert_eq!(
        client.execution_url(&pid("get-upstream-bbox")).as_str(),
        "https://aqua.igb-berlin.de/pygeoapi/processes/get-upstream-bbox/execution"
    );
}

#[test]
fn execution_url_tolerates_trailing_slashes() {
    let client = test_client("https://aqua.igb-berlin.de/pygeoapi///");
    assert_eq!(
        client.execution_url(&pid("get-local-streamsegments")).as_str(),
        "https://aqua.igb-berlin.de/pygeoapi/processes/get-local-streamsegments/execution"
    );
}

#[test]
fn execution_url_on_bare_host() {
    let client = test_client("http://127.0.0.1:5000");
    assert_eq!(
        client.execution_url(&pid("get-snapped-points")).as_str(),
        "http://127.0.0.1:5000/processes/get-snapped-points/execution"
    );
}

#[test]
fn rejects_relative_base_url() {
    let err = OgcClient::with_base_url("pygeoapi", 30, "ua").unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[test]
fn rejects_non_http_scheme() {
    let err = OgcClient::with_base_url("ftp://example.org/pygeoapi", 30, "ua").unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { ref reason, .. } if reason.contains("ftp")));
}

#[test]
fn default_poll_config_matches_the_map_client() {
    let client = test_client("https://example.org");
    assert_eq!(client.poll_config().interval, Duration::from_millis(2_000));
    assert_eq!(client.poll_config().max_retries, 3);
}

#[test]
fn from_app_config_applies_poll_settings() {
    let config = AppConfig {
        service_url: "http://localhost:5000/pygeoapi".to_owned(),
        log_level: "info".to_owned(),
        request_timeout_secs: 10,
        user_agent: "geofresh-test/0.1".to_owned(),
        poll_interval_ms: 250,
        poll_max_wait_secs: 60,
        poll_max_retries: 1,
    };
    let client = OgcClient::from_app_config(&config).unwrap();
    assert_eq!(
        *client.poll_config(),
        PollConfig {
            interval: Duration::from_millis(250),
            max_wait: Duration::from_secs(60),
            max_retries: 1,
        }
    );
    assert_eq!(client.base_url().as_str(), "http://localhost:5000/pygeoapi/");
}
