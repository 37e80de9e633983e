//! Routes that must never reach the database are exercised against a real
//! router with a lazily-connected pool: if a handler tried to run SQL, the
//! pool would answer with a connection error, not the asserted status.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use farmacia_api::{common_routes, pharmacy_registry, record_routes, AppState, DbGateway};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

fn test_app() -> Router {
    // Lazy pool: nothing listens on this port, so any statement fails with a
    // connection error instead of silently succeeding.
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(250))
        .connect_lazy("postgres://localhost:1/farmacia_test")
        .expect("lazy pool");
    let state = AppState::new(DbGateway::from_pool(pool), pharmacy_registry().unwrap());
    let api = Router::new()
        .merge(common_routes(state.clone()))
        .merge(record_routes(state));
    Router::new().nest("/api", api)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn request_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn unknown_table_is_404_on_every_verb() {
    let app = test_app();
    let (status, body) =
        request_json(&app, empty_request(Method::GET, "/api/no_such_table")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("not_found"));

    let (status, _) = request_json(
        &app,
        json_request(Method::POST, "/api/no_such_table", json!({"NOMBRE": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request_json(
        &app,
        json_request(Method::PUT, "/api/no_such_table/1", json!({"NOMBRE": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        request_json(&app, empty_request(Method::DELETE, "/api/no_such_table/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_only_unknown_fields_is_400_without_a_statement() {
    let app = test_app();
    let (status, body) = request_json(
        &app,
        json_request(
            Method::POST,
            "/api/producto",
            json!({"LOTE": "X1", "BODEGA": 3}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("validation_error"));
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no valid fields"));
}

#[tokio::test]
async fn create_rejects_non_object_body() {
    let app = test_app();
    let (status, body) = request_json(
        &app,
        json_request(Method::POST, "/api/producto", json!(["NOMBRE"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));
}

#[tokio::test]
async fn create_missing_required_field_is_400() {
    let app = test_app();
    let (status, body) = request_json(
        &app,
        json_request(Method::POST, "/api/producto", json!({"DESCRIPCION": "sin nombre"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("required"));
}

#[tokio::test]
async fn malformed_composite_key_is_400() {
    let app = test_app();
    let (status, body) = request_json(
        &app,
        json_request(
            Method::PUT,
            "/api/inventario_sucursal/ID_SUCURSAL=1",
            json!({"EXISTENCIA": 5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("validation_error"));

    let (status, _) = request_json(
        &app,
        empty_request(Method::DELETE, "/api/inventario_sucursal/ID_SUCURSAL=1|EXISTENCIA=2"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn composite_key_segment_is_percent_decoded_by_the_router() {
    let app = test_app();
    // %3D / %7C decode to '=' / '|'; decode succeeds, and the statement then
    // fails on the unreachable database, which proves the key cleared
    // validation.
    let (status, body) = request_json(
        &app,
        empty_request(
            Method::DELETE,
            "/api/inventario_sucursal/ID_SUCURSAL%3D1%7CID_PRODUCTO%3D2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], json!("connection_error"));
}

#[tokio::test]
async fn update_with_nothing_to_set_echoes_input_without_a_statement() {
    let app = test_app();
    // ESTADO is not a producto field; the body filters to nothing updatable,
    // so this succeeds even though the database is unreachable.
    let (status, body) = request_json(
        &app,
        json_request(Method::PUT, "/api/producto/7", json!({"ESTADO": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ID_PRODUCTO": 7}));
}

#[tokio::test]
async fn health_reports_error_when_database_is_unreachable() {
    let app = test_app();
    let (status, body) = request_json(&app, empty_request(Method::GET, "/api/health")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], json!("error"));
}

#[tokio::test]
async fn valid_create_reaches_the_gateway() {
    let app = test_app();
    let (status, body) = request_json(
        &app,
        json_request(
            Method::POST,
            "/api/producto",
            json!({"NOMBRE": "Aspirina", "PRECIO": 12.5}),
        ),
    )
    .await;
    // Payload validates; the failure is the unreachable database.
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], json!("connection_error"));
}
