use std::sync::Arc;

use historical_figures::routes::build_app;
use historical_figures::MemoryStore;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    /// Serve a fresh in-memory app on an ephemeral port.
    async fn spawn() -> Self {
        Self::spawn_with_limit(1_048_576).await
    }

    async fn spawn_with_limit(max_body_bytes: usize) -> Self {
        let app = build_app(Arc::new(MemoryStore::new()), "testing", max_body_bytes);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{}", addr),
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
            .unwrap()
    }

    async fn put(&self, path: &str, json: Value) -> reqwest::Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    async fn create_newton(&self) -> Value {
        let response = self
            .post(
                "/v1/figures",
                json!({"name": "Isaac Newton", "years_of_life": "1643-1727", "description": "Physicist"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json::<Value>().await.unwrap()["figure"].clone()
    }
}

#[tokio::test]
async fn test_create_returns_201_with_location() {
    let client = TestClient::spawn().await;

    let response = client
        .post(
            "/v1/figures",
            json!({"name": "Isaac Newton", "years_of_life": "1643-1727", "description": "Physicist"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/v1/figures/1"
    );

    let body: Value = response.json().await.unwrap();
    let figure = &body["figure"];
    assert_eq!(figure["id"], 1);
    assert_eq!(figure["version"], 1);
    assert_eq!(figure["name"], "Isaac Newton");
    assert_eq!(figure["years_of_life"], "1643-1727");
    assert_eq!(figure["description"], "Physicist");
    assert!(figure["created_at"].as_str().is_some());
}

#[tokio::test]
async fn test_create_with_long_name_is_422() {
    let client = TestClient::spawn().await;

    let response = client
        .post("/v1/figures", json!({"name": "n".repeat(501)}))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["name"], "must not be more than 500 bytes long");
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
    let client = TestClient::spawn().await;

    let response = client
        .post(
            "/v1/figures",
            json!({"name": "", "years_of_life": "01.01.1900-01.01.1990", "description": "d".repeat(1001)}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        json!({
            "name": "must be provided",
            "years_of_life": "must not be more than 10 bytes long",
            "description": "must not be more than 1000 bytes long",
        })
    );
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let client = TestClient::spawn().await;

    let response = client
        .client
        .post(format!("{}/v1/figures", client.base_url))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post("/v1/figures", json!({"name": "Plato", "school": "Academy"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("school"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let client = TestClient::spawn_with_limit(64).await;

    let response = client
        .post("/v1/figures", json!({"name": "x", "description": "d".repeat(500)}))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "request body too large");
}

#[tokio::test]
async fn test_body_limit_above_two_mebibytes_is_honoured() {
    let client = TestClient::spawn_with_limit(4 * 1024 * 1024).await;

    // Reaches validation instead of being cut off by the extractor's default limit
    let response = client
        .post(
            "/v1/figures",
            json!({"name": "Herodotus", "description": "d".repeat(3 * 1024 * 1024)}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["description"], "must not be more than 1000 bytes long");
}

#[tokio::test]
async fn test_body_without_json_content_type_is_415() {
    let client = TestClient::spawn().await;

    let response = client
        .client
        .post(format!("{}/v1/figures", client.base_url))
        .header("content-type", "text/plain")
        .body(r#"{"name": "Socrates"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_get_existing_and_missing() {
    let client = TestClient::spawn().await;
    let created = client.create_newton().await;

    let response = client.get("/v1/figures/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["figure"], created);

    let response = client.get("/v1/figures/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "the requested resource could not be found");
}

#[tokio::test]
async fn test_unparsable_and_non_positive_ids_are_404() {
    let client = TestClient::spawn().await;
    client.create_newton().await;

    for path in ["/v1/figures/abc", "/v1/figures/0", "/v1/figures/-1", "/v1/figures/1.0"] {
        assert_eq!(client.get(path).await.status(), StatusCode::NOT_FOUND, "GET {}", path);
        assert_eq!(client.delete(path).await.status(), StatusCode::NOT_FOUND, "DELETE {}", path);
    }
}

#[tokio::test]
async fn test_update_replaces_fields_and_bumps_version() {
    let client = TestClient::spawn().await;
    let created = client.create_newton().await;

    let response = client
        .put(
            "/v1/figures/1",
            json!({"name": "Sir Isaac Newton", "years_of_life": "1643-1727", "description": "Mathematician"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["figure"]["name"], "Sir Isaac Newton");
    assert_eq!(body["figure"]["description"], "Mathematician");
    assert_eq!(body["figure"]["version"], 2);
    assert_eq!(body["figure"]["created_at"], created["created_at"]);

    // Omitted fields are overwritten with empty values
    let response = client.put("/v1/figures/1", json!({"name": "Newton"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["figure"]["years_of_life"], "");
    assert_eq!(body["figure"]["description"], "");
    assert_eq!(body["figure"]["version"], 3);
}

#[tokio::test]
async fn test_invalid_update_is_422_and_record_unchanged() {
    let client = TestClient::spawn().await;
    let created = client.create_newton().await;

    let response = client
        .put(
            "/v1/figures/1",
            json!({"name": "", "years_of_life": "", "description": ""}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!({"name": "must be provided"}));

    let body: Value = client.get("/v1/figures/1").await.json().await.unwrap();
    assert_eq!(body["figure"], created);
}

#[tokio::test]
async fn test_update_missing_figure_is_404() {
    let client = TestClient::spawn().await;

    let response = client
        .put("/v1/figures/7", json!({"name": "Nobody"}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Missing record wins over a malformed body
    let response = client
        .put("/v1/figures/7", json!({"name": "Nobody", "unexpected": true}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_stale_version_is_409() {
    let client = TestClient::spawn().await;
    client.create_newton().await;

    let response = client
        .put("/v1/figures/1", json!({"name": "Newton", "version": 1}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .put("/v1/figures/1", json!({"name": "Isaac", "version": 1}))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "unable to update the record due to an edit conflict, please try again"
    );

    let body: Value = client.get("/v1/figures/1").await.json().await.unwrap();
    assert_eq!(body["figure"]["name"], "Newton");
    assert_eq!(body["figure"]["version"], 2);
}

#[tokio::test]
async fn test_delete_twice() {
    let client = TestClient::spawn().await;
    client.create_newton().await;

    let response = client.delete("/v1/figures/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "figure successfully deleted");

    assert_eq!(client.delete("/v1/figures/1").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(client.get("/v1/figures/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let client = TestClient::spawn().await;

    let response = client.get("/v1/movies").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "the requested resource could not be found");

    let response = client.get("/v1/figures").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "the GET method is not supported for this resource");

    let response = client.post("/v1/figures/1", json!({})).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_healthcheck() {
    let client = TestClient::spawn().await;

    let response = client.get("/v1/healthcheck").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "available");
    assert_eq!(body["system_info"]["environment"], "testing");
    assert_eq!(body["system_info"]["version"], env!("CARGO_PKG_VERSION"));
}
