use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Map, Value};

use cardoctor_core::error::AppError;
use cardoctor_domain::document::Document;
use cardoctor_domain::outcome::InsertOneResult;

use crate::state::AppState;
use crate::usecase::user::{CreateUserUseCase, GetUserUseCase, ListUsersUseCase};

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let usecase = ListUsersUseCase {
        users: state.users(),
    };
    Ok(Json(usecase.execute().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    let usecase = GetUserUseCase {
        users: state.users(),
    };
    Ok(Json(usecase.execute(&id).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<Map<String, Value>>,
) -> Result<Json<InsertOneResult>, AppError> {
    let usecase = CreateUserUseCase {
        users: state.users(),
    };
    Ok(Json(usecase.execute(user).await?))
}
