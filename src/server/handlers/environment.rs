use axum::extract::State;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use super::{page_limit, page_offset};
use crate::database::entities::{
    environment_readings, environment_readings::Entity as EnvironmentReadings, growth_alerts,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};
use crate::services::GrowthService;

#[derive(Debug, Deserialize)]
pub struct ReadingFilter {
    pub plant_id: Option<i32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateReadingRequest {
    pub plant_id: Option<i32>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub soil_moisture_pct: Option<f64>,
    pub light_lux: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ReadingCreatedResponse {
    pub reading: environment_readings::Model,
    pub alerts: Vec<growth_alerts::Model>,
}

pub async fn list_readings(
    State(state): State<AppState>,
    Query(filter): Query<ReadingFilter>,
) -> Result<Json<Vec<environment_readings::Model>>, ApiError> {
    let mut query = EnvironmentReadings::find();
    if let Some(plant_id) = filter.plant_id {
        query = query.filter(environment_readings::Column::PlantId.eq(plant_id));
    }
    if let Some(from) = filter.from {
        query = query.filter(environment_readings::Column::RecordedAt.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(environment_readings::Column::RecordedAt.lte(to));
    }

    let rows = query
        .order_by_desc(environment_readings::Column::RecordedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_reading(
    State(state): State<AppState>,
    Json(payload): Json<CreateReadingRequest>,
) -> Result<Json<ReadingCreatedResponse>, ApiError> {
    if payload.temperature_c.is_none()
        && payload.humidity_pct.is_none()
        && payload.soil_moisture_pct.is_none()
        && payload.light_lux.is_none()
    {
        return Err(ApiError::validation("reading must carry at least one measurement"));
    }

    let service = GrowthService::new(
        state.db.clone(),
        state.provider.clone(),
        state.thresholds.clone(),
    );

    let (reading, alerts) = service
        .record_environment(
            payload.plant_id,
            payload.temperature_c,
            payload.humidity_pct,
            payload.soil_moisture_pct,
            payload.light_lux,
            payload.recorded_at,
        )
        .await?;

    Ok(Json(ReadingCreatedResponse { reading, alerts }))
}
