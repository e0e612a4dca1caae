use axum::extract::{Path, State};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{page_limit, page_offset};
use crate::database::entities::{
    notifications, notifications::Entity as Notifications, users::Entity as Users,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};

#[derive(Debug, Deserialize)]
pub struct NotificationFilter {
    pub user_id: Option<i32>,
    pub read: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: Option<i32>,
    pub title: String,
    pub body: Option<String>,
    pub kind: Option<String>,
}

const KINDS: [&str; 3] = ["alert", "lab", "system"];

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(filter): Query<NotificationFilter>,
) -> Result<Json<Vec<notifications::Model>>, ApiError> {
    let mut query = Notifications::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(notifications::Column::UserId.eq(user_id));
    }
    if let Some(read) = filter.read {
        query = query.filter(notifications::Column::Read.eq(read));
    }

    let rows = query
        .order_by_desc(notifications::Column::CreatedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_notification(
    State(state): State<AppState>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Json<notifications::Model>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("title must not be empty"));
    }
    let kind = payload.kind.unwrap_or_else(|| "system".to_string());
    if !KINDS.contains(&kind.as_str()) {
        return Err(ApiError::validation("kind must be alert, lab or system"));
    }
    if let Some(user_id) = payload.user_id {
        Users::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::not_found("user", user_id))?;
    }

    let notification = notifications::ActiveModel {
        user_id: Set(payload.user_id),
        title: Set(payload.title),
        body: Set(payload.body),
        kind: Set(kind),
        read: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(notification))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<notifications::Model>, ApiError> {
    let notification = Notifications::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("notification", id))?;

    let mut notification: notifications::ActiveModel = notification.into();
    notification.read = Set(true);

    Ok(Json(notification.update(&state.db).await?))
}
