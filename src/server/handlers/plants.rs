use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{page_limit, page_offset};
use crate::database::entities::{
    growth_alerts, growth_records, plants,
    growth_alerts::Entity as GrowthAlerts,
    growth_records::Entity as GrowthRecords,
    plants::Entity as Plants,
};
use crate::server::app::AppState;
use crate::server::error::{conflict_on_unique, ApiError};
use crate::server::extract::{Json, Query};
use crate::services::growth_service::{GrowthService, NewObservation};

#[derive(Debug, Deserialize)]
pub struct PlantFilter {
    pub crop_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreatePlantRequest {
    /// Generated when absent.
    pub code: Option<String>,
    pub crop_type: String,
    pub variety: Option<String>,
    pub planted_at: Option<NaiveDate>,
    pub location: Option<String>,
    /// Optional baseline measurements, stored as the first growth
    /// record in the same transaction as the plant.
    pub baseline: Option<BaselineMeasurements>,
}

#[derive(Deserialize)]
pub struct BaselineMeasurements {
    pub height_cm: Option<f64>,
    pub leaf_count: Option<i32>,
    pub stem_diameter_mm: Option<f64>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePlantRequest {
    pub crop_type: Option<String>,
    pub variety: Option<String>,
    pub planted_at: Option<NaiveDate>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct PlantCreatedResponse {
    pub plant: plants::Model,
    pub baseline_record: Option<growth_records::Model>,
}

#[derive(Serialize)]
pub struct PlantStatsResponse {
    pub plant_id: i32,
    pub record_count: u64,
    pub latest_height_cm: Option<f64>,
    pub average_growth_rate_pct: Option<f64>,
    pub min_health_score: Option<i32>,
    pub max_health_score: Option<i32>,
    pub open_alert_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct GrowthRecordFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateGrowthRecordRequest {
    pub image_url: Option<String>,
    pub height_cm: Option<f64>,
    pub leaf_count: Option<i32>,
    pub stem_diameter_mm: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub soil_moisture_pct: Option<f64>,
    pub notes: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct GrowthRecordCreatedResponse {
    pub record: growth_records::Model,
    pub alerts: Vec<growth_alerts::Model>,
}

pub async fn list_plants(
    State(state): State<AppState>,
    Query(filter): Query<PlantFilter>,
) -> Result<Json<Vec<plants::Model>>, ApiError> {
    let mut query = Plants::find();
    if let Some(crop_type) = &filter.crop_type {
        query = query.filter(plants::Column::CropType.eq(crop_type));
    }
    if let Some(status) = &filter.status {
        query = query.filter(plants::Column::Status.eq(status));
    }

    let rows = query
        .order_by_asc(plants::Column::Code)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_plant(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlantRequest>,
) -> Result<Json<PlantCreatedResponse>, ApiError> {
    if payload.crop_type.trim().is_empty() {
        return Err(ApiError::validation("crop_type must not be empty"));
    }

    let code = match payload.code {
        Some(code) if !code.trim().is_empty() => code,
        _ => generate_plant_code(),
    };

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let plant = plants::ActiveModel {
        code: Set(code),
        crop_type: Set(payload.crop_type),
        variety: Set(payload.variety),
        planted_at: Set(payload.planted_at),
        location: Set(payload.location),
        status: Set("active".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| conflict_on_unique(err, "plant code already exists"))?;

    let baseline_record = match payload.baseline {
        Some(baseline) => Some(
            growth_records::ActiveModel {
                plant_id: Set(plant.id),
                image_url: Set(baseline.image_url),
                height_cm: Set(baseline.height_cm),
                leaf_count: Set(baseline.leaf_count),
                stem_diameter_mm: Set(baseline.stem_diameter_mm),
                growth_rate_pct: Set(None),
                health_score: Set(None),
                ai_issues: Set(None),
                notes: Set(None),
                recorded_at: Set(now),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?,
        ),
        None => None,
    };

    txn.commit().await?;

    Ok(Json(PlantCreatedResponse {
        plant,
        baseline_record,
    }))
}

pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<plants::Model>, ApiError> {
    let plant = Plants::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("plant", id))?;

    Ok(Json(plant))
}

pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePlantRequest>,
) -> Result<Json<plants::Model>, ApiError> {
    let plant = Plants::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("plant", id))?;

    let mut plant: plants::ActiveModel = plant.into();
    if let Some(crop_type) = payload.crop_type {
        plant.crop_type = Set(crop_type);
    }
    if let Some(variety) = payload.variety {
        plant.variety = Set(Some(variety));
    }
    if let Some(planted_at) = payload.planted_at {
        plant.planted_at = Set(Some(planted_at));
    }
    if let Some(location) = payload.location {
        plant.location = Set(Some(location));
    }
    if let Some(status) = payload.status {
        if status != "active" && status != "archived" {
            return Err(ApiError::validation("status must be active or archived"));
        }
        plant.status = Set(status);
    }
    plant.updated_at = Set(Utc::now());

    Ok(Json(plant.update(&state.db).await?))
}

pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let plant = Plants::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("plant", id))?;

    // Records, alerts and readings go with it (FK cascade).
    Plants::delete_by_id(plant.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_plant_stats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PlantStatsResponse>, ApiError> {
    Plants::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("plant", id))?;

    let records = GrowthRecords::find()
        .filter(growth_records::Column::PlantId.eq(id))
        .order_by_asc(growth_records::Column::RecordedAt)
        .all(&state.db)
        .await?;

    let rates: Vec<f64> = records.iter().filter_map(|r| r.growth_rate_pct).collect();
    let average_growth_rate_pct = if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    };

    let open_alert_count = GrowthAlerts::find()
        .filter(growth_alerts::Column::PlantId.eq(id))
        .filter(growth_alerts::Column::Resolved.eq(false))
        .all(&state.db)
        .await?
        .len() as u64;

    Ok(Json(PlantStatsResponse {
        plant_id: id,
        record_count: records.len() as u64,
        latest_height_cm: records.iter().rev().find_map(|r| r.height_cm),
        average_growth_rate_pct,
        min_health_score: records.iter().filter_map(|r| r.health_score).min(),
        max_health_score: records.iter().filter_map(|r| r.health_score).max(),
        open_alert_count,
    }))
}

pub async fn list_growth_records(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(filter): Query<GrowthRecordFilter>,
) -> Result<Json<Vec<growth_records::Model>>, ApiError> {
    Plants::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::not_found("plant", id))?;

    let mut query = GrowthRecords::find().filter(growth_records::Column::PlantId.eq(id));
    if let Some(from) = filter.from {
        query = query.filter(growth_records::Column::RecordedAt.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(growth_records::Column::RecordedAt.lte(to));
    }

    let rows = query
        .order_by_desc(growth_records::Column::RecordedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// The ingestion pipeline entry point.
pub async fn create_growth_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateGrowthRecordRequest>,
) -> Result<Json<GrowthRecordCreatedResponse>, ApiError> {
    let service = GrowthService::new(
        state.db.clone(),
        state.provider.clone(),
        state.thresholds.clone(),
    );

    let outcome = service
        .ingest_record(
            id,
            NewObservation {
                image_url: payload.image_url,
                height_cm: payload.height_cm,
                leaf_count: payload.leaf_count,
                stem_diameter_mm: payload.stem_diameter_mm,
                temperature_c: payload.temperature_c,
                humidity_pct: payload.humidity_pct,
                soil_moisture_pct: payload.soil_moisture_pct,
                notes: payload.notes,
                recorded_at: payload.recorded_at,
            },
        )
        .await?;

    Ok(Json(GrowthRecordCreatedResponse {
        record: outcome.record,
        alerts: outcome.alerts,
    }))
}

fn generate_plant_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("PLT-{}", &id[..8].to_uppercase())
}
