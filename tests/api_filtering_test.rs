use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    routing::get,
};
use coinbook::{ApiError, FilterableResource, Filters, entities::transaction};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::{seed_ledger, setup_test_db};

async fn list_transactions(
    State(db): State<DatabaseConnection>,
    Path(user_id): Path<i64>,
    Filters(filters): Filters,
) -> Result<Json<Vec<transaction::Model>>, ApiError> {
    let rows = transaction::Entity::list_filtered(&db, user_id, &filters).await?;
    Ok(Json(rows))
}

async fn setup_app() -> Router {
    let db = setup_test_db().await.expect("Failed to set up test database");
    seed_ledger(&db).await;
    Router::new()
        .route("/users/{user_id}/transactions", get(list_transactions))
        .with_state(db)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn descriptions(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|t| t["description"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_without_query() {
    let (status, body) = get_json(setup_app().await, "/users/1/transactions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["type"], "debt");
}

#[tokio::test]
async fn test_bracket_notation_query() {
    let (status, body) = get_json(
        setup_app().await,
        "/users/1/transactions?type%5B%5D=groceries&date%5Bstart%5D=2024-01-01&date%5Bend%5D=2024-01-31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(descriptions(&body), vec!["Weekly groceries"]);
}

#[tokio::test]
async fn test_json_filter_query() {
    let (status, body) = get_json(
        setup_app().await,
        "/users/1/transactions?filter=%7B%22description%22%3A%22rent%22%7D",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(descriptions(&body), vec!["January rent"]);
}

#[tokio::test]
async fn test_malformed_json_filter_lists_everything() {
    let (status, body) =
        get_json(setup_app().await, "/users/1/transactions?filter=%7Bnot-json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_invalid_date_is_400_with_message() {
    let (status, body) =
        get_json(setup_app().await, "/users/1/transactions?date=after%3Ayesterday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date 'yesterday' for filter 'date'");
}

#[tokio::test]
async fn test_other_users_data_stays_hidden() {
    let (status, body) =
        get_json(setup_app().await, "/users/2/transactions?description=groceries").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(descriptions(&body), vec!["Other user's groceries"]);
}
