use axum::{
    Json,
    extract::{Path, State},
};

use cardoctor_core::error::AppError;
use cardoctor_domain::document::Document;

use crate::state::AppState;
use crate::usecase::service::{GetServiceUseCase, ListServicesUseCase};

// ── GET /services ─────────────────────────────────────────────────────────────

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let usecase = ListServicesUseCase {
        services: state.services(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── GET /services/{id} ────────────────────────────────────────────────────────

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    let usecase = GetServiceUseCase {
        services: state.services(),
    };
    Ok(Json(usecase.execute(&id).await?))
}
