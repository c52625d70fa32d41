use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::booking::{self, BookingRequest};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    #[serde(rename = "refId")]
    ref_id: String,
    name: String,
    phone: String,
    service: String,
    date: String,
    fee: Option<String>,
    #[serde(rename = "txnId")]
    txn_id: Option<String>,
    status: String,
    #[serde(rename = "createdAt")]
    created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        BookingResponse {
            id: b.id,
            ref_id: b.ref_id,
            name: b.name,
            phone: b.phone,
            service: b.service,
            date: b.date,
            fee: b.fee,
            txn_id: b.txn_id,
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// POST /bookings
#[derive(Deserialize)]
pub struct CreateBookingBody {
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub fee: Option<String>,
    #[serde(rename = "txnId")]
    pub txn_id: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let request = BookingRequest {
        ref_id: body.ref_id,
        name: body.name.unwrap_or_default(),
        phone: body.phone.unwrap_or_default(),
        service: body.service.unwrap_or_default(),
        date: body.date.unwrap_or_default(),
        fee: body.fee,
        txn_id: body.txn_id.unwrap_or_default(),
    };

    let created = {
        let db = state.db.lock().unwrap();
        booking::create_booking(&db, &request)?
    };

    tracing::info!(reference = %created.ref_id, "booking created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Booking Saved Successfully",
            "refId": created.ref_id,
        })),
    ))
}

// GET /status/:ref_id — exact-match lookup by the client-facing reference.
// The projection echoes the client-supplied fields but never the internal id.
#[derive(Serialize)]
pub struct StatusResponse {
    #[serde(rename = "refId")]
    ref_id: String,
    name: String,
    phone: String,
    service: String,
    date: String,
    fee: Option<String>,
    #[serde(rename = "txnId")]
    txn_id: Option<String>,
    status: String,
    #[serde(rename = "createdAt")]
    created_at: String,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(ref_id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let found = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_reference(&db, &ref_id)?
    };

    let b = found.ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    Ok(Json(StatusResponse {
        ref_id: b.ref_id,
        name: b.name,
        phone: b.phone,
        service: b.service,
        date: b.date,
        fee: b.fee,
        txn_id: b.txn_id,
        status: b.status.as_str().to_string(),
        created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db)?
    };

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

// PUT /bookings/:id
#[derive(Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = body.status.unwrap_or_default();

    {
        let db = state.db.lock().unwrap();
        booking::decide(&db, &id, &status, state.config.allow_decision_reversal)?;
    }

    tracing::info!(booking = %id, status = %status, "booking decided");

    Ok(Json(serde_json::json!({ "success": true })))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = {
        let db = state.db.lock().unwrap();
        queries::delete_booking(&db, &id)?
    };

    if removed {
        Ok(Json(serde_json::json!({ "success": true })))
    } else {
        Err(AppError::NotFound("Booking not found".to_string()))
    }
}
