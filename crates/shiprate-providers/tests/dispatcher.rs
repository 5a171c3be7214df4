//! Integration tests for `Dispatcher` using wiremock HTTP mocks.

use serde_json::json;
use shiprate_providers::{mask_nothing, Dispatcher, RequestHeaders, RequestParams, REDACTED};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("client construction should not fail")
}

fn mask_key(path: &str, _value: &str) -> Option<String> {
    path.ends_with(".key").then(|| REDACTED.to_owned())
}

#[tokio::test]
async fn get_appends_params_as_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("key", "fake-key"))
        .and(query_param("q", "hello world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let mut params = RequestParams::new();
    params.add("key", json!("fake-key"));
    params.add("q", json!("hello world"));

    let dispatcher = Dispatcher::get(
        &client(),
        &format!("{}/lookup", server.uri()),
        params,
        RequestHeaders::new(),
        mask_nothing,
    )
    .await;

    assert!(!dispatcher.is_error());
    assert_eq!(dispatcher.status(), Some(200));
    assert_eq!(dispatcher.json_path(&["ok"]), Some(&json!(true)));
}

#[tokio::test]
async fn post_sends_params_as_json_body_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compute"))
        .and(header("X-Api-Key", "fake-key"))
        .and(body_json(json!({"origins": ["a"], "mode": "drive"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .mount(&server)
        .await;

    let mut params = RequestParams::new();
    params.add("origins", json!(["a"]));
    params.add("mode", json!("drive"));
    let mut headers = RequestHeaders::new();
    headers.add("X-Api-Key", "fake-key");

    let dispatcher = Dispatcher::post(
        &client(),
        &format!("{}/compute", server.uri()),
        params,
        headers,
        mask_nothing,
    )
    .await;

    assert!(!dispatcher.is_error());
    assert_eq!(dispatcher.json_f64(&["result"]), Some(1.0));
}

#[tokio::test]
async fn non_2xx_status_is_an_error_with_parsed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/denied"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "bad credentials"})),
        )
        .mount(&server)
        .await;

    let dispatcher = Dispatcher::get(
        &client(),
        &format!("{}/denied", server.uri()),
        RequestParams::new(),
        RequestHeaders::new(),
        mask_nothing,
    )
    .await;

    assert!(dispatcher.is_error());
    assert_eq!(dispatcher.status(), Some(403));
    // The body stays inspectable so providers can surface the API message.
    assert_eq!(dispatcher.json_str(&["message"]), Some("bad credentials"));
}

#[tokio::test]
async fn malformed_json_body_reads_as_missing_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let dispatcher = Dispatcher::get(
        &client(),
        &format!("{}/garbled", server.uri()),
        RequestParams::new(),
        RequestHeaders::new(),
        mask_nothing,
    )
    .await;

    // 200 with an unparseable body: not a transport error, but every path
    // lookup misses, exactly like a missing field.
    assert!(dispatcher.transport_error().is_none());
    assert!(dispatcher.response_json().is_none());
    assert_eq!(dispatcher.json_path(&["anything"]), None);
}

#[tokio::test]
async fn timeout_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let fast_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(200))
        .build()
        .expect("client construction should not fail");

    let dispatcher = Dispatcher::get(
        &fast_client,
        &format!("{}/slow", server.uri()),
        RequestParams::new(),
        RequestHeaders::new(),
        mask_nothing,
    )
    .await;

    assert!(dispatcher.is_error());
    let transport = dispatcher.transport_error().expect("should be a transport error");
    assert!(transport.contains("timed out"), "got: {transport}");
}

#[tokio::test]
async fn debug_value_masks_secrets_in_params_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"echo": {"key": "fake-secret-key"}})),
        )
        .mount(&server)
        .await;

    let mut params = RequestParams::new();
    params.add("key", json!("fake-secret-key"));
    params.add("q", json!("visible"));

    let dispatcher = Dispatcher::get(
        &client(),
        &format!("{}/echo", server.uri()),
        params,
        RequestHeaders::new(),
        mask_key,
    )
    .await;

    let debug = dispatcher.to_debug_value();
    let serialized = debug.to_string();
    assert!(
        !serialized.contains("fake-secret-key"),
        "secret leaked into debug dump: {serialized}"
    );
    assert_eq!(debug["params"]["key"], json!(REDACTED));
    assert_eq!(debug["body"]["echo"]["key"], json!(REDACTED));
    assert_eq!(debug["params"]["q"], json!("visible"));
}
