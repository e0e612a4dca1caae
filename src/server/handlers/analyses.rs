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
use crate::database::entities::{analyses, analyses::Entity as Analyses};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};

#[derive(Debug, Deserialize)]
pub struct AnalysisFilter {
    pub crop_type: Option<String>,
    pub health_status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateAnalysisRequest {
    pub image_url: String,
    pub crop_type: String,
    pub health_status: Option<String>,
    pub disease_name: Option<String>,
    pub disease_confidence: Option<f64>,
    pub pest_name: Option<String>,
    pub pest_confidence: Option<f64>,
    pub bbch_stage: Option<i32>,
    pub fruit_count_ripe: Option<i32>,
    pub fruit_count_unripe: Option<i32>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateAnalysisRequest {
    pub health_status: Option<String>,
    pub disease_name: Option<String>,
    pub disease_confidence: Option<f64>,
    pub pest_name: Option<String>,
    pub pest_confidence: Option<f64>,
    pub bbch_stage: Option<i32>,
    pub fruit_count_ripe: Option<i32>,
    pub fruit_count_unripe: Option<i32>,
    pub notes: Option<String>,
}

pub async fn list_analyses(
    State(state): State<AppState>,
    Query(filter): Query<AnalysisFilter>,
) -> Result<Json<Vec<analyses::Model>>, ApiError> {
    let mut query = Analyses::find();
    if let Some(crop_type) = &filter.crop_type {
        query = query.filter(analyses::Column::CropType.eq(crop_type));
    }
    if let Some(status) = &filter.health_status {
        query = query.filter(analyses::Column::HealthStatus.eq(status));
    }
    if let Some(from) = filter.from {
        query = query.filter(analyses::Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(analyses::Column::CreatedAt.lte(to));
    }

    let rows = query
        .order_by_desc(analyses::Column::CreatedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_analysis(
    State(state): State<AppState>,
    Json(payload): Json<CreateAnalysisRequest>,
) -> Result<Json<analyses::Model>, ApiError> {
    if payload.image_url.trim().is_empty() {
        return Err(ApiError::validation("image_url must not be empty"));
    }

    let now = Utc::now();
    let analysis = analyses::ActiveModel {
        image_url: Set(payload.image_url),
        crop_type: Set(payload.crop_type),
        health_status: Set(payload.health_status.unwrap_or_else(|| "healthy".to_string())),
        disease_name: Set(payload.disease_name),
        disease_confidence: Set(payload.disease_confidence),
        pest_name: Set(payload.pest_name),
        pest_confidence: Set(payload.pest_confidence),
        bbch_stage: Set(payload.bbch_stage),
        fruit_count_ripe: Set(payload.fruit_count_ripe),
        fruit_count_unripe: Set(payload.fruit_count_unripe),
        notes: Set(payload.notes),
        created_by: Set(payload.created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(analysis))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<analyses::Model>, ApiError> {
    let analysis = Analyses::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("analysis", id))?;

    Ok(Json(analysis))
}

pub async fn update_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAnalysisRequest>,
) -> Result<Json<analyses::Model>, ApiError> {
    let analysis = Analyses::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("analysis", id))?;

    let mut analysis: analyses::ActiveModel = analysis.into();
    if let Some(status) = payload.health_status {
        analysis.health_status = Set(status);
    }
    if let Some(name) = payload.disease_name {
        analysis.disease_name = Set(Some(name));
    }
    if let Some(confidence) = payload.disease_confidence {
        analysis.disease_confidence = Set(Some(confidence));
    }
    if let Some(name) = payload.pest_name {
        analysis.pest_name = Set(Some(name));
    }
    if let Some(confidence) = payload.pest_confidence {
        analysis.pest_confidence = Set(Some(confidence));
    }
    if let Some(stage) = payload.bbch_stage {
        analysis.bbch_stage = Set(Some(stage));
    }
    if let Some(count) = payload.fruit_count_ripe {
        analysis.fruit_count_ripe = Set(Some(count));
    }
    if let Some(count) = payload.fruit_count_unripe {
        analysis.fruit_count_unripe = Set(Some(count));
    }
    if let Some(notes) = payload.notes {
        analysis.notes = Set(Some(notes));
    }
    analysis.updated_at = Set(Utc::now());

    Ok(Json(analysis.update(&state.db).await?))
}

pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let analysis = Analyses::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("analysis", id))?;

    Analyses::delete_by_id(analysis.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
