use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{page_limit, page_offset};
use crate::database::entities::{
    applied_treatments, applied_treatments::Entity as AppliedTreatments,
    growth_alerts::Entity as GrowthAlerts, lab_analyses::Entity as LabAnalyses,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};

#[derive(Debug, Deserialize)]
pub struct TreatmentFilter {
    pub alert_id: Option<i32>,
    pub lab_analysis_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateTreatmentRequest {
    pub name: String,
    pub product: Option<String>,
    pub dose: Option<String>,
    pub method: Option<String>,
    pub alert_id: Option<i32>,
    pub lab_analysis_id: Option<i32>,
    pub applied_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn list_treatments(
    State(state): State<AppState>,
    Query(filter): Query<TreatmentFilter>,
) -> Result<Json<Vec<applied_treatments::Model>>, ApiError> {
    let mut query = AppliedTreatments::find();
    if let Some(alert_id) = filter.alert_id {
        query = query.filter(applied_treatments::Column::AlertId.eq(alert_id));
    }
    if let Some(lab_analysis_id) = filter.lab_analysis_id {
        query = query.filter(applied_treatments::Column::LabAnalysisId.eq(lab_analysis_id));
    }

    let rows = query
        .order_by_desc(applied_treatments::Column::AppliedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_treatment(
    State(state): State<AppState>,
    Json(payload): Json<CreateTreatmentRequest>,
) -> Result<Json<applied_treatments::Model>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }
    if payload.alert_id.is_none() && payload.lab_analysis_id.is_none() {
        return Err(ApiError::validation(
            "treatment must reference an alert or a lab analysis",
        ));
    }

    if let Some(alert_id) = payload.alert_id {
        GrowthAlerts::find_by_id(alert_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::not_found("alert", alert_id))?;
    }
    if let Some(lab_analysis_id) = payload.lab_analysis_id {
        LabAnalyses::find_by_id(lab_analysis_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::not_found("lab analysis", lab_analysis_id))?;
    }

    let now = Utc::now();
    let treatment = applied_treatments::ActiveModel {
        name: Set(payload.name),
        product: Set(payload.product),
        dose: Set(payload.dose),
        method: Set(payload.method),
        alert_id: Set(payload.alert_id),
        lab_analysis_id: Set(payload.lab_analysis_id),
        applied_at: Set(payload.applied_at.unwrap_or(now)),
        notes: Set(payload.notes),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(treatment))
}

pub async fn delete_treatment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let treatment = AppliedTreatments::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("treatment", id))?;

    AppliedTreatments::delete_by_id(treatment.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
