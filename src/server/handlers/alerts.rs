use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{page_limit, page_offset};
use crate::database::entities::{growth_alerts, growth_alerts::Entity as GrowthAlerts};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};

#[derive(Debug, Deserialize)]
pub struct AlertFilter {
    pub plant_id: Option<i32>,
    pub severity: Option<String>,
    pub resolved: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct ResolveAlertRequest {
    pub resolved: bool,
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<Vec<growth_alerts::Model>>, ApiError> {
    let mut query = GrowthAlerts::find();
    if let Some(plant_id) = filter.plant_id {
        query = query.filter(growth_alerts::Column::PlantId.eq(plant_id));
    }
    if let Some(severity) = &filter.severity {
        query = query.filter(growth_alerts::Column::Severity.eq(severity));
    }
    if let Some(resolved) = filter.resolved {
        query = query.filter(growth_alerts::Column::Resolved.eq(resolved));
    }

    let rows = query
        .order_by_desc(growth_alerts::Column::CreatedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ResolveAlertRequest>,
) -> Result<Json<growth_alerts::Model>, ApiError> {
    let alert = GrowthAlerts::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("alert", id))?;

    let mut alert: growth_alerts::ActiveModel = alert.into();
    alert.resolved = Set(payload.resolved);
    alert.resolved_at = Set(payload.resolved.then(Utc::now));

    Ok(Json(alert.update(&state.db).await?))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let alert = GrowthAlerts::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("alert", id))?;

    GrowthAlerts::delete_by_id(alert.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
