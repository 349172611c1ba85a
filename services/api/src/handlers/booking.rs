use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use cardoctor_auth_types::identity::RequestIdentity;
use cardoctor_core::error::AppError;
use cardoctor_domain::document::Document;
use cardoctor_domain::outcome::{DeleteResult, InsertOneResult, UpdateResult};

use crate::state::AppState;
use crate::usecase::booking::{
    CreateBookingUseCase, DeleteBookingUseCase, ListBookingsInput, ListBookingsUseCase,
    UpdateBookingStatusUseCase,
};

// ── GET /bookings ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub email: Option<String>,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    identity: RequestIdentity,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let usecase = ListBookingsUseCase {
        bookings: state.bookings(),
    };
    let bookings = usecase
        .execute(ListBookingsInput {
            identity_email: identity.email().map(str::to_owned),
            email: query.email,
        })
        .await?;
    Ok(Json(bookings))
}

// ── POST /bookings ────────────────────────────────────────────────────────────

pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Map<String, Value>>,
) -> Result<Json<InsertOneResult>, AppError> {
    let usecase = CreateBookingUseCase {
        bookings: state.bookings(),
    };
    Ok(Json(usecase.execute(booking).await?))
}

// ── PATCH /bookings/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(default)]
    pub status: Option<Value>,
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBookingRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let usecase = UpdateBookingStatusUseCase {
        bookings: state.bookings(),
    };
    Ok(Json(usecase.execute(&id, body.status).await?))
}

// ── DELETE /bookings/{id} ─────────────────────────────────────────────────────

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let usecase = DeleteBookingUseCase {
        bookings: state.bookings(),
    };
    Ok(Json(usecase.execute(&id).await?))
}
