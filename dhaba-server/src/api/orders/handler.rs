use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use shared::models::{Order, OrderItem, OrderStatus, OrderType, PaymentMethod};

use crate::core::ServerState;
use crate::orders::manager::{DineInOrderInput, OrdersDigest, TakeawayOrderInput};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub order_type: OrderType,
    pub table_label: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// Amend an existing takeaway order instead of creating one
    pub existing_order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct CompleteOrderRequest {
    pub payment_method: Option<PaymentMethod>,
}

/// POST /api/orders/{restaurant_id}
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = match payload.order_type {
        OrderType::DineIn => {
            let table_label = payload.table_label.ok_or_else(|| {
                AppError::validation("table_label is required for dine-in orders")
            })?;
            state.manager.open_dine_in(
                &restaurant_id,
                DineInOrderInput {
                    table_label,
                    items: payload.items,
                    total_amount: payload.total_amount,
                },
            )?
        }
        OrderType::Takeaway => state.manager.open_takeaway(
            &restaurant_id,
            TakeawayOrderInput {
                items: payload.items,
                total_amount: payload.total_amount,
                customer_name: payload.customer_name,
                customer_phone: payload.customer_phone,
                existing_order_id: payload.existing_order_id,
            },
        )?,
    };
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/{order_id}
pub async fn update(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .manager
        .update_items(&order_id, payload.items, payload.total_amount)?;
    Ok(Json(order))
}

/// PUT /api/orders/{order_id}/status
pub async fn advance_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.manager.advance_status(&order_id, payload.status)?;
    Ok(Json(order))
}

/// PUT /api/orders/{order_id}/complete
pub async fn complete(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<CompleteOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state.manager.complete(&order_id, payload.payment_method)?;
    Ok(Json(order))
}

/// DELETE /api/orders/{order_id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<bool>> {
    state.manager.delete(&order_id)?;
    Ok(Json(true))
}

/// GET /api/orders/restaurant/{restaurant_id}
pub async fn list_active(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.manager.active_orders(&restaurant_id)?))
}

/// GET /api/orders/restaurant/{restaurant_id}/takeaway
pub async fn list_takeaway_today(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.manager.takeaway_orders_today(&restaurant_id)?))
}

/// GET /api/orders/restaurant/{restaurant_id}/all
pub async fn digest(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<OrdersDigest>> {
    Ok(Json(state.manager.orders_digest(&restaurant_id)?))
}
