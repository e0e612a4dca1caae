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
use crate::database::entities::{lab_analyses, lab_analyses::Entity as LabAnalyses};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};
use crate::services::lab_service::{LabService, NewLabAnalysis};

#[derive(Debug, Deserialize)]
pub struct LabAnalysisFilter {
    pub sample_type: Option<String>,
    pub status: Option<String>,
    pub plant_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateLabAnalysisRequest {
    pub sample_type: String,
    pub plant_id: Option<i32>,
    pub lab_name: Option<String>,
    pub results: serde_json::Value,
    pub sampled_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UpdateLabAnalysisRequest {
    pub interpretation: Option<String>,
    pub status: Option<String>,
}

const SAMPLE_TYPES: [&str; 4] = ["soil", "foliar", "water", "fruit"];

pub async fn list_lab_analyses(
    State(state): State<AppState>,
    Query(filter): Query<LabAnalysisFilter>,
) -> Result<Json<Vec<lab_analyses::Model>>, ApiError> {
    let mut query = LabAnalyses::find();
    if let Some(sample_type) = &filter.sample_type {
        query = query.filter(lab_analyses::Column::SampleType.eq(sample_type));
    }
    if let Some(status) = &filter.status {
        query = query.filter(lab_analyses::Column::Status.eq(status));
    }
    if let Some(plant_id) = filter.plant_id {
        query = query.filter(lab_analyses::Column::PlantId.eq(plant_id));
    }

    let rows = query
        .order_by_desc(lab_analyses::Column::SampledAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_lab_analysis(
    State(state): State<AppState>,
    Json(payload): Json<CreateLabAnalysisRequest>,
) -> Result<Json<lab_analyses::Model>, ApiError> {
    if !SAMPLE_TYPES.contains(&payload.sample_type.as_str()) {
        return Err(ApiError::validation(
            "sample_type must be one of soil, foliar, water, fruit",
        ));
    }
    if !payload.results.is_object() {
        return Err(ApiError::validation("results must be a JSON object"));
    }

    let service = LabService::new(state.db.clone(), state.provider.clone());
    let analysis = service
        .create(NewLabAnalysis {
            sample_type: payload.sample_type,
            plant_id: payload.plant_id,
            lab_name: payload.lab_name,
            results: payload.results,
            sampled_at: payload.sampled_at,
        })
        .await?;

    Ok(Json(analysis))
}

pub async fn get_lab_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<lab_analyses::Model>, ApiError> {
    let analysis = LabAnalyses::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("lab analysis", id))?;

    Ok(Json(analysis))
}

pub async fn update_lab_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLabAnalysisRequest>,
) -> Result<Json<lab_analyses::Model>, ApiError> {
    let analysis = LabAnalyses::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("lab analysis", id))?;

    let mut analysis: lab_analyses::ActiveModel = analysis.into();
    if let Some(interpretation) = payload.interpretation {
        analysis.interpretation = Set(Some(interpretation));
    }
    if let Some(status) = payload.status {
        if !["pending", "interpreted", "reviewed"].contains(&status.as_str()) {
            return Err(ApiError::validation(
                "status must be pending, interpreted or reviewed",
            ));
        }
        analysis.status = Set(status);
    }
    analysis.updated_at = Set(Utc::now());

    Ok(Json(analysis.update(&state.db).await?))
}

pub async fn delete_lab_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let analysis = LabAnalyses::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("lab analysis", id))?;

    LabAnalyses::delete_by_id(analysis.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Re-run the AI interpretation. Unlike creation, an unavailable
/// provider is surfaced here (503) since running it was the point.
pub async fn interpret_lab_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<lab_analyses::Model>, ApiError> {
    let service = LabService::new(state.db.clone(), state.provider.clone());
    Ok(Json(service.interpret(id).await?))
}
