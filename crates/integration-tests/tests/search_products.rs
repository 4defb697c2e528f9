//! End-to-end tests for the `search_products` tool.
//!
//! Each test runs the tool through the real Retail HTTP client against a
//! mock Retail API and checks the records the caller would receive.

use serde_json::{Value, json};
use vertex_retail_core::{INVALID_ARGUMENT_MESSAGE, SEARCH_FAILED_MESSAGE};
use vertex_retail_integration_tests::{
    ACCESS_TOKEN, PROJECT_ID, SEARCH_PATH, product_name, tool_records, tool_service,
};
use vertex_retail_mcp::mcp::tools::SearchProductsRequest;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(value: Value) -> SearchProductsRequest {
    serde_json::from_value(value).expect("valid tool arguments")
}

fn product_json(id: &str, title: &str, price: f64) -> Value {
    json!({
        "name": product_name(id),
        "id": id,
        "title": title,
        "uri": format!("https://shop.example.com/p/{id}"),
        "priceInfo": {"currencyCode": "USD", "price": price, "originalPrice": price + 10.0},
        "brands": ["Acme"],
        "colorInfo": {"colorFamilies": ["Blue"]},
        "availability": "IN_STOCK"
    })
}

async fn mount_product(server: &MockServer, id: &str, title: &str, price: f64) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/{}", product_name(id))))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(id, title, price)))
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_jeans_returns_full_product_for_each_match() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}")))
        .and(header("x-goog-user-project", PROJECT_ID))
        .and(body_partial_json(json!({
            "query": "jeans",
            "visitorId": "guest-user",
            "pageSize": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "101", "product": {"name": product_name("101")}},
                {"id": "102", "product": {"name": product_name("102")}}
            ],
            "totalSize": 2
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, "101", "Slim Jeans", 49.5).await;
    mount_product(&server, "102", "Relaxed Jeans", 59.0).await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({"query": "jeans"})))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(!is_error);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["id"], "101");
    assert_eq!(records[0]["title"], "Slim Jeans");
    assert_eq!(records[0]["price"], 49.5);
    assert_eq!(records[0]["currency_code"], "USD");
    assert_eq!(records[0]["price_info"]["original_price"], 59.5);
    assert_eq!(records[0]["uri"], "https://shop.example.com/p/101");
    assert_eq!(records[0]["availability"], "IN_STOCK");
    assert_eq!(records[0]["color_info"]["color_families"][0], "Blue");
    assert_eq!(records[1]["id"], "102");
    assert_eq!(records[1]["price"], 59.0);

    // Detail fetches follow ranking order
    let requests = server.received_requests().await.expect("recording enabled");
    let gets: Vec<String> = requests
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(
        gets,
        vec![
            format!("/v2/{}", product_name("101")),
            format!("/v2/{}", product_name("102")),
        ]
    );
}

#[tokio::test]
async fn test_facets_become_filter_expression() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(json!({
            "query": "shirt",
            "visitorId": "visitor-7",
            "filter": "(brands: ANY(\"Acme\")) AND (sizes: ANY(\"M\"))",
            "pageSize": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "7", "product": {"name": product_name("7")}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, "7", "Oxford Shirt", 35.0).await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({
            "query": "shirt",
            "visitor_id": "visitor-7",
            "brand": "Acme",
            "size": "M",
            "page_size": 2
        })))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(!is_error);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Oxford Shirt");
}

#[tokio::test]
async fn test_no_matches_returns_no_records() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({"query": "nothing-matches-this"})))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(!is_error);
    assert!(records.is_empty());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_invalid_argument_returns_serving_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Invalid filter syntax",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({"query": "jeans", "brand": "Acme"})))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(is_error);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["error"], INVALID_ARGUMENT_MESSAGE);
    assert!(
        records[0]["details"]
            .as_str()
            .unwrap_or_default()
            .contains("Invalid filter syntax")
    );
}

#[tokio::test]
async fn test_search_outage_returns_generic_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "Backend unavailable", "status": "UNAVAILABLE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({"query": "jeans"})))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(is_error);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["error"], SEARCH_FAILED_MESSAGE);
    assert!(
        records[0]["details"]
            .as_str()
            .unwrap_or_default()
            .contains("Backend unavailable")
    );
}

#[tokio::test]
async fn test_detail_failure_discards_fetched_products() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "1", "product": {"name": product_name("1")}},
                {"id": "2", "product": {"name": product_name("2")}},
                {"id": "3", "product": {"name": product_name("3")}}
            ]
        })))
        .mount(&server)
        .await;
    mount_product(&server, "1", "First", 1.0).await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/{}", product_name("2"))))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Product not found", "status": "NOT_FOUND"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The stream stops at the first failure
    Mock::given(method("GET"))
        .and(path(format!("/v2/{}", product_name("3"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("3", "Third", 3.0)))
        .expect(0)
        .mount(&server)
        .await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({"query": "anything"})))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(is_error);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["error"], SEARCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_reserved_characters_in_product_id_stay_in_path() {
    let server = MockServer::start().await;
    let id = "sku#red?size=32";

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": id, "product": {"name": product_name(id)}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/{}",
            product_name("sku%23red%3Fsize=32")
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(id, "Red Sneakers", 80.0)))
        .expect(1)
        .mount(&server)
        .await;

    let service = tool_service(&server).await;
    let result = service
        .run_search(&request(json!({"query": "sneakers"})))
        .await
        .expect("tool result");

    let (is_error, records) = tool_records(&result);
    assert!(!is_error);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id);
    assert_eq!(records[0]["title"], "Red Sneakers");
}
