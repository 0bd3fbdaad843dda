use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Customer, CustomerPatch, NewCustomer, ReservationDetail};
use crate::state::AppState;

// GET /api/customers
#[derive(Deserialize)]
pub struct ListQuery {
    /// Matches against name or phone.
    pub q: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let limit = query.limit.unwrap_or(100);
    let customers = {
        let db = state.db.lock().unwrap();
        queries::list_customers(&db, query.q.as_deref(), limit)?
    };
    Ok(Json(customers))
}

// POST /api/customers
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("이름을 입력해 주세요.".to_string()));
    }

    let now = chrono::Utc::now().naive_utc();
    let customer = Customer {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        phone: body.phone.unwrap_or_default(),
        memo: body.memo,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_customer(&db, &customer)?;
    }

    tracing::info!(customer_id = %customer.id, "customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = {
        let db = state.db.lock().unwrap();
        queries::get_customer_by_id(&db, &id)?
    };
    customer
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))
}

// PUT /api/customers/:id
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<Customer>, AppError> {
    let db = state.db.lock().unwrap();

    let mut customer = queries::get_customer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    if let Some(name) = patch.name {
        customer.name = name;
    }
    if let Some(phone) = patch.phone {
        customer.phone = phone;
    }
    if let Some(memo) = patch.memo {
        customer.memo = Some(memo);
    }

    queries::update_customer(&db, &customer)?;

    // The UPDATE stamps its own updated_at; return the stored row.
    let stored = queries::get_customer_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    Ok(Json(stored))
}

// DELETE /api/customers/:id
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_customer(&db, &id)?
    };

    if deleted {
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("customer {id}")))
    }
}

// GET /api/customers/:id/reservations
#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

pub async fn customer_reservations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ReservationDetail>>, AppError> {
    let limit = query.limit.unwrap_or(50);
    let db = state.db.lock().unwrap();

    if queries::get_customer_by_id(&db, &id)?.is_none() {
        return Err(AppError::NotFound(format!("customer {id}")));
    }

    Ok(Json(queries::get_reservations_for_customer(
        &db, &id, limit,
    )?))
}
