use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{page_limit, page_offset};
use crate::database::entities::{training_images, training_images::Entity as TrainingImages};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};
use crate::services::DatasetService;

#[derive(Debug, Deserialize)]
pub struct TrainingImageFilter {
    pub crop_type: Option<String>,
    pub label: Option<String>,
    pub verified: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateTrainingImageRequest {
    pub image_url: String,
    pub crop_type: String,
    pub label: String,
    pub bbch_stage: Option<i32>,
    pub annotations: Option<serde_json::Value>,
    pub created_by: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateTrainingImageRequest {
    pub label: Option<String>,
    pub bbch_stage: Option<i32>,
    pub annotations: Option<serde_json::Value>,
    pub verified: Option<bool>,
}

pub async fn list_training_images(
    State(state): State<AppState>,
    Query(filter): Query<TrainingImageFilter>,
) -> Result<Json<Vec<training_images::Model>>, ApiError> {
    let mut query = TrainingImages::find();
    if let Some(crop_type) = &filter.crop_type {
        query = query.filter(training_images::Column::CropType.eq(crop_type));
    }
    if let Some(label) = &filter.label {
        query = query.filter(training_images::Column::Label.eq(label));
    }
    if let Some(verified) = filter.verified {
        query = query.filter(training_images::Column::Verified.eq(verified));
    }

    let rows = query
        .order_by_desc(training_images::Column::CreatedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_training_image(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrainingImageRequest>,
) -> Result<Json<training_images::Model>, ApiError> {
    if payload.image_url.trim().is_empty() {
        return Err(ApiError::validation("image_url must not be empty"));
    }
    if payload.label.trim().is_empty() {
        return Err(ApiError::validation("label must not be empty"));
    }

    let now = Utc::now();
    let image = training_images::ActiveModel {
        image_url: Set(payload.image_url),
        crop_type: Set(payload.crop_type),
        label: Set(payload.label),
        bbch_stage: Set(payload.bbch_stage),
        annotations: Set(payload
            .annotations
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(anyhow::Error::from)?),
        verified: Set(false),
        created_by: Set(payload.created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(image))
}

pub async fn update_training_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTrainingImageRequest>,
) -> Result<Json<training_images::Model>, ApiError> {
    let image = TrainingImages::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("training image", id))?;

    let mut image: training_images::ActiveModel = image.into();
    if let Some(label) = payload.label {
        image.label = Set(label);
    }
    if let Some(stage) = payload.bbch_stage {
        image.bbch_stage = Set(Some(stage));
    }
    if let Some(annotations) = payload.annotations {
        image.annotations = Set(Some(
            serde_json::to_string(&annotations).map_err(anyhow::Error::from)?,
        ));
    }
    if let Some(verified) = payload.verified {
        image.verified = Set(verified);
    }
    image.updated_at = Set(Utc::now());

    Ok(Json(image.update(&state.db).await?))
}

pub async fn delete_training_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let image = TrainingImages::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("training image", id))?;

    TrainingImages::delete_by_id(image.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// JSONL dataset export of verified images.
pub async fn export_dataset(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = DatasetService::new(state.db.clone()).export_jsonl().await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/jsonl")],
        body,
    )
        .into_response())
}
