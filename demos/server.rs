//! Simple REST API server example for the inventory engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /items` - Register a new inventory item
//! - `GET /items` - List items (filter by search, category, status; limit)
//! - `GET /items/stats` - Dashboard statistics
//! - `GET /items/{id}` - Get an item by ID, with full movement history
//! - `PUT /items/{id}` - Update descriptive fields and thresholds
//! - `PUT /items/{id}/stock` - Apply a stock adjustment
//! - `GET /items/alerts/low-stock` - Items at or below minimum stock
//! - `GET /items/alerts/out-of-stock` - Items at zero
//! - `GET /items/alerts/expiring` - Items expiring within `days` (default 30)
//! - `GET /items/analytics/by-category` - Per-category rollup
//!
//! ## Example Usage
//!
//! ```bash
//! # Register an item
//! curl -X POST http://localhost:3000/items \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Surgical Gloves", "category": "Consumable", "initialQuantity": 100, "minimumStock": 20, "maximumStock": 500, "unitPrice": "0.50"}'
//!
//! # Consume stock
//! curl -X PUT http://localhost:3000/items/1/stock \
//!   -H "Content-Type: application/json" \
//!   -d '{"quantity": 30, "operation": "subtract", "reason": "ward request", "user": "nurse1"}'
//!
//! # Dashboard stats
//! curl http://localhost:3000/items/stats
//!
//! # Low stock alerts
//! curl http://localhost:3000/items/alerts/low-stock
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stock_ledger_rs::{
    DescriptiveEdit, InventoryDirectory, InventoryError, InventoryStats, ItemDraft, ItemFilter,
    ItemId, ItemSnapshot, Location, StockStatus, stats,
};
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Query parameters for the item listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
}

/// Response body for listings: the filtered page plus the total match count.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<ItemSnapshot>,
    pub total: usize,
}

/// Request body for stock adjustments.
///
/// ```json
/// {"quantity": 30, "operation": "subtract", "reason": "ward request", "user": "nurse1"}
/// ```
#[derive(Debug, Deserialize)]
pub struct StockUpdateRequest {
    pub quantity: u32,
    pub operation: String,
    pub reason: Option<String>,
    pub user: Option<String>,
}

/// Response body for a committed stock adjustment.
#[derive(Debug, Serialize)]
pub struct StockUpdateResponse {
    pub quantity: u32,
    pub status: StockStatus,
}

/// Request body for item updates. All fields optional; `expiryDate` and
/// `batchNumber` may be set to `null` explicitly to clear them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<Location>,
    pub unit_price: Option<Decimal>,
    #[serde(default, with = "double_option")]
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, with = "double_option")]
    pub batch_number: Option<Option<String>>,
    pub minimum_stock: Option<u32>,
    pub maximum_stock: Option<u32>,
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the inventory directory.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<InventoryDirectory>,
}

// === Error Handling ===

/// Wrapper for converting `InventoryError` into HTTP responses.
pub struct AppError(InventoryError);

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            InventoryError::MissingName => (StatusCode::BAD_REQUEST, "MISSING_NAME"),
            InventoryError::MissingReason => (StatusCode::BAD_REQUEST, "MISSING_REASON"),
            InventoryError::MissingActor => (StatusCode::BAD_REQUEST, "MISSING_ACTOR"),
            InventoryError::ZeroAdjustment => (StatusCode::BAD_REQUEST, "ZERO_ADJUSTMENT"),
            InventoryError::NegativePrice => (StatusCode::BAD_REQUEST, "NEGATIVE_PRICE"),
            InventoryError::ThresholdsInverted { .. } => {
                (StatusCode::BAD_REQUEST, "THRESHOLDS_INVERTED")
            }
            InventoryError::InsufficientStock { .. } => {
                (StatusCode::CONFLICT, "INSUFFICIENT_STOCK")
            }
            InventoryError::QuantityOverflow => (StatusCode::BAD_REQUEST, "QUANTITY_OVERFLOW"),
            InventoryError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

fn bad_request(message: &str, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
        }),
    )
}

/// A request body that fails to deserialize (malformed JSON, wrong types,
/// negative quantities) is the caller's mistake, so it maps to 400 rather
/// than axum's default 422.
fn invalid_body(rejection: JsonRejection) -> Response {
    bad_request(&rejection.body_text(), "INVALID_BODY").into_response()
}

// === Handlers ===

/// POST /items - Register a new item.
async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemSnapshot>), Response> {
    let Json(draft) = payload.map_err(invalid_body)?;
    let snapshot = state
        .directory
        .create(draft)
        .map_err(|e| AppError(e).into_response())?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /items - List items with optional filtering.
async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let status = match params.status.as_deref() {
        Some(label) => Some(
            StockStatus::parse(label)
                .ok_or_else(|| bad_request("unknown status filter", "INVALID_STATUS"))?,
        ),
        None => None,
    };

    let filter = ItemFilter {
        category: params.category,
        status,
        search: params.search,
    };
    let mut items = state.directory.list(&filter);
    let total = items.len();
    if let Some(limit) = params.limit {
        items.truncate(limit);
    }
    Ok(Json(ListResponse { items, total }))
}

/// GET /items/stats - Dashboard statistics.
async fn get_stats(State(state): State<AppState>) -> Json<InventoryStats> {
    Json(InventoryStats::collect(&state.directory, Utc::now()))
}

/// GET /items/{id} - Get an item with its full movement history.
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ItemSnapshot>, AppError> {
    Ok(Json(state.directory.get(ItemId(id))?))
}

/// PUT /items/{id} - Update descriptive fields and thresholds.
///
/// The whole request is applied as one atomic edit: a rejected update
/// (blank name, inverted thresholds) leaves the item untouched.
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    payload: Result<Json<ItemUpdateRequest>, JsonRejection>,
) -> Result<Json<ItemSnapshot>, Response> {
    let Json(request) = payload.map_err(invalid_body)?;
    let edit = DescriptiveEdit {
        code: request.code,
        name: request.name,
        category: request.category,
        description: request.description,
        unit: request.unit,
        supplier: request.supplier,
        location: request.location,
        unit_price: request.unit_price,
        expiry_date: request.expiry_date,
        batch_number: request.batch_number,
    };
    let snapshot = state
        .directory
        .edit_item(ItemId(id), edit, request.minimum_stock, request.maximum_stock)
        .map_err(|e| AppError(e).into_response())?;
    Ok(Json(snapshot))
}

/// PUT /items/{id}/stock - Apply a stock adjustment.
async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    payload: Result<Json<StockUpdateRequest>, JsonRejection>,
) -> Result<Json<StockUpdateResponse>, Response> {
    let Json(request) = payload.map_err(invalid_body)?;
    let delta = match request.operation.to_lowercase().as_str() {
        "add" => i64::from(request.quantity),
        "subtract" => -i64::from(request.quantity),
        _ => {
            return Err(
                bad_request("operation must be 'add' or 'subtract'", "INVALID_OPERATION")
                    .into_response(),
            );
        }
    };

    let (quantity, status) = state
        .directory
        .adjust_stock(
            ItemId(id),
            delta,
            request.reason.as_deref().unwrap_or(""),
            request.user.as_deref().unwrap_or(""),
        )
        .map_err(|e| AppError(e).into_response())?;

    Ok(Json(StockUpdateResponse { quantity, status }))
}

/// GET /items/alerts/low-stock - Items at or below their minimum.
async fn low_stock_alerts(State(state): State<AppState>) -> Json<Vec<ItemSnapshot>> {
    let filter = ItemFilter {
        status: Some(StockStatus::LowStock),
        ..ItemFilter::default()
    };
    Json(state.directory.list(&filter))
}

/// GET /items/alerts/out-of-stock - Items at zero.
async fn out_of_stock_alerts(State(state): State<AppState>) -> Json<Vec<ItemSnapshot>> {
    let filter = ItemFilter {
        status: Some(StockStatus::OutOfStock),
        ..ItemFilter::default()
    };
    Json(state.directory.list(&filter))
}

#[derive(Debug, Deserialize)]
struct ExpiringParams {
    days: Option<i64>,
}

/// GET /items/alerts/expiring - Items expiring within the horizon.
async fn expiring_alerts(
    State(state): State<AppState>,
    Query(params): Query<ExpiringParams>,
) -> Json<Vec<ItemSnapshot>> {
    let days = params.days.unwrap_or(stats::DEFAULT_EXPIRY_HORIZON_DAYS);
    Json(stats::expiring_items(&state.directory, Utc::now(), days))
}

/// GET /items/analytics/by-category - Per-category rollup.
async fn analytics_by_category(State(state): State<AppState>) -> Json<Vec<stats::CategoryStats>> {
    Json(stats::by_category(&state.directory))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/items", post(create_item).get(list_items))
        .route("/items/stats", get(get_stats))
        .route("/items/alerts/low-stock", get(low_stock_alerts))
        .route("/items/alerts/out-of-stock", get(out_of_stock_alerts))
        .route("/items/alerts/expiring", get(expiring_alerts))
        .route("/items/analytics/by-category", get(analytics_by_category))
        .route("/items/{id}", get(get_item).put(update_item))
        .route("/items/{id}/stock", put(update_stock))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let state = AppState {
        directory: Arc::new(InventoryDirectory::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Inventory API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST /items                        - Register an item");
    println!("  GET  /items                        - List items");
    println!("  GET  /items/stats                  - Dashboard statistics");
    println!("  GET  /items/:id                    - Get item by ID");
    println!("  PUT  /items/:id                    - Update item fields");
    println!("  PUT  /items/:id/stock              - Adjust stock");
    println!("  GET  /items/alerts/low-stock       - Low stock alerts");
    println!("  GET  /items/alerts/out-of-stock    - Out of stock alerts");
    println!("  GET  /items/alerts/expiring        - Expiring soon");
    println!("  GET  /items/analytics/by-category  - Category rollup");

    axum::serve(listener, app).await.unwrap();
}
