use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use shared::models::{
    Expense, ExpenseCreate, MenuItem, Restaurant, Table, TableCreate, TableStatus,
};
use shared::util::now_millis;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableCreate>,
}

/// POST /api/restaurants
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let mut seen = HashSet::new();
    for table in &payload.tables {
        if table.label.trim().is_empty() {
            return Err(AppError::validation("table label must not be empty"));
        }
        if table.seats <= 0 {
            return Err(AppError::validation(format!(
                "seats must be positive for table '{}'",
                table.label
            )));
        }
        if !seen.insert(table.label.trim().to_string()) {
            return Err(AppError::conflict(format!(
                "duplicate table label '{}'",
                table.label
            )));
        }
    }

    let now = now_millis();
    let restaurant = Restaurant {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        tables: payload
            .tables
            .into_iter()
            .map(|t| Table {
                label: t.label.trim().to_string(),
                seats: t.seats,
                area_name: t.area_name,
                status: TableStatus::Free,
            })
            .collect(),
        menu_items: vec![],
        expenses: vec![],
        created_at: now,
        updated_at: now,
    };
    state.storage.put_restaurant(&restaurant)?;

    info!(restaurant_id = %restaurant.id, name = %restaurant.name, "restaurant registered");
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .storage
        .get_restaurant(&id)?
        .ok_or_else(|| AppError::not_found(format!("restaurant {} not found", id)))?;
    Ok(Json(restaurant))
}

/// GET /api/restaurants/{id}/tables
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Table>>> {
    let restaurant = state
        .storage
        .get_restaurant(&id)?
        .ok_or_else(|| AppError::not_found(format!("restaurant {} not found", id)))?;
    Ok(Json(restaurant.tables))
}

/// POST /api/restaurants/{id}/tables
pub async fn add_table(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableCreate>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    let restaurant = state.manager.add_table(&id, payload)?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// DELETE /api/restaurants/{id}/tables/{label}
pub async fn remove_table(
    State(state): State<ServerState>,
    Path((id, label)): Path<(String, String)>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(state.manager.remove_table(&id, &label)?))
}

/// POST /api/restaurants/{id}/tables/reconcile
///
/// Recompute table statuses from live orders. Repair endpoint for state
/// drift; safe to call at any time.
pub async fn reconcile_tables(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(state.manager.rederive_table_status(&id)?))
}

/// PUT /api/restaurants/{id}/menu
///
/// Wholesale replace, matching how the client edits the menu in setup.
pub async fn replace_menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<Vec<MenuItem>>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(state.manager.replace_menu(&id, payload)?))
}

/// POST /api/restaurants/{id}/expenses
pub async fn add_expense(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    if payload.description.trim().is_empty() {
        return Err(AppError::validation("expense description must not be empty"));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(AppError::validation(format!(
            "expense amount must be positive, got {}",
            payload.amount
        )));
    }

    let now = now_millis();
    let txn = state.storage.begin_write()?;
    let mut restaurant = state
        .storage
        .get_restaurant_txn(&txn, &id)?
        .ok_or_else(|| AppError::not_found(format!("restaurant {} not found", id)))?;
    restaurant.expenses.push(Expense {
        description: payload.description,
        amount: payload.amount,
        date: payload.date.unwrap_or(now),
        category: payload.category,
    });
    restaurant.updated_at = now;
    state.storage.put_restaurant_txn(&txn, &restaurant)?;
    state.storage.commit(txn)?;

    info!(restaurant_id = %id, "expense recorded");
    Ok((StatusCode::CREATED, Json(restaurant)))
}
