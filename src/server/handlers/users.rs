use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::Deserialize;

use super::{page_limit, page_offset};
use crate::database::entities::{users, users::Entity as Users};
use crate::server::app::AppState;
use crate::server::error::{conflict_on_unique, ApiError};
use crate::server::extract::{Json, Query};

#[derive(Debug, Deserialize)]
pub struct UserFilter {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
}

const ROLES: [&str; 3] = ["admin", "agronomist", "operator"];

pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<users::Model>>, ApiError> {
    let rows = Users::find()
        .order_by_asc(users::Column::Name)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<users::Model>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::validation("email is not valid"));
    }
    let role = payload.role.unwrap_or_else(|| "operator".to_string());
    if !ROLES.contains(&role.as_str()) {
        return Err(ApiError::validation("role must be admin, agronomist or operator"));
    }

    let now = Utc::now();
    let user = users::ActiveModel {
        name: Set(payload.name),
        email: Set(payload.email),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|err| conflict_on_unique(err, "email already registered"))?;

    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<users::Model>, ApiError> {
    let user = Users::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("user", id))?;

    let mut user: users::ActiveModel = user.into();
    if let Some(name) = payload.name {
        user.name = Set(name);
    }
    if let Some(role) = payload.role {
        if !ROLES.contains(&role.as_str()) {
            return Err(ApiError::validation("role must be admin, agronomist or operator"));
        }
        user.role = Set(role);
    }
    user.updated_at = Set(Utc::now());

    Ok(Json(user.update(&state.db).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let user = Users::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("user", id))?;

    Users::delete_by_id(user.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
