//! Growth-record ingestion: derive a growth rate from the prior record,
//! ask the model for a health verdict, store the record and emit alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AlertThresholds;
use crate::database::entities::{
    environment_readings, growth_alerts, growth_records, plants,
    growth_records::Entity as GrowthRecords, plants::Entity as Plants,
};
use crate::services::ai::{extract_json_object, ModelProvider};
use crate::services::ServiceError;

pub struct GrowthService {
    db: DatabaseConnection,
    provider: Option<Arc<dyn ModelProvider>>,
    thresholds: AlertThresholds,
}

/// One incoming observation: image reference plus optional measurements
/// and environment values.
#[derive(Debug, Default, Clone)]
pub struct NewObservation {
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

impl NewObservation {
    fn has_environment(&self) -> bool {
        self.temperature_c.is_some()
            || self.humidity_pct.is_some()
            || self.soil_moisture_pct.is_some()
    }
}

pub struct IngestOutcome {
    pub record: growth_records::Model,
    pub alerts: Vec<growth_alerts::Model>,
}

/// Health verdict parsed from the model reply.
#[derive(Debug, Deserialize)]
struct Assessment {
    health_score: Option<i32>,
    #[serde(default)]
    issues: Vec<String>,
}

impl GrowthService {
    pub fn new(
        db: DatabaseConnection,
        provider: Option<Arc<dyn ModelProvider>>,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            db,
            provider,
            thresholds,
        }
    }

    /// Ingest a new observation for a plant.
    ///
    /// The model call is best-effort: any provider failure is logged and
    /// the record is stored with NULL health fields. The record, the
    /// environment reading and all alerts land in one transaction.
    pub async fn ingest_record(
        &self,
        plant_id: i32,
        obs: NewObservation,
    ) -> Result<IngestOutcome, ServiceError> {
        let plant = Plants::find_by_id(plant_id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "plant",
                id: plant_id,
            })?;

        let prior = GrowthRecords::find()
            .filter(growth_records::Column::PlantId.eq(plant_id))
            .order_by_desc(growth_records::Column::RecordedAt)
            .one(&self.db)
            .await?;

        let recorded_at = obs.recorded_at.unwrap_or_else(Utc::now);
        let growth_rate = compute_growth_rate(obs.height_cm, prior.as_ref().and_then(|r| r.height_cm));

        let assessment = match &self.provider {
            Some(provider) => self.assess(&plant, &obs, growth_rate, provider.as_ref()).await,
            None => None,
        };

        let txn = self.db.begin().await?;

        let now = Utc::now();
        let record = growth_records::ActiveModel {
            plant_id: Set(plant_id),
            image_url: Set(obs.image_url.clone()),
            height_cm: Set(obs.height_cm),
            leaf_count: Set(obs.leaf_count),
            stem_diameter_mm: Set(obs.stem_diameter_mm),
            growth_rate_pct: Set(growth_rate),
            health_score: Set(assessment.as_ref().and_then(|a| a.health_score)),
            ai_issues: Set(assessment
                .as_ref()
                .filter(|a| !a.issues.is_empty())
                .map(|a| serde_json::to_string(&a.issues))
                .transpose()?),
            notes: Set(obs.notes.clone()),
            recorded_at: Set(recorded_at),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if obs.has_environment() {
            environment_readings::ActiveModel {
                plant_id: Set(Some(plant_id)),
                temperature_c: Set(obs.temperature_c),
                humidity_pct: Set(obs.humidity_pct),
                soil_moisture_pct: Set(obs.soil_moisture_pct),
                light_lux: Set(None),
                recorded_at: Set(recorded_at),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let mut alerts = Vec::new();

        if let Some(assessment) = &assessment {
            let severity = match assessment.health_score {
                Some(score) if score < self.thresholds.critical_health_score => "critical",
                _ => "warning",
            };
            for issue in &assessment.issues {
                alerts.push(
                    self.insert_alert(&txn, plant_id, Some(record.id), "ai_issue", severity, issue)
                        .await?,
                );
            }
        }

        if let (Some(rate), Some(prior)) = (growth_rate, prior.as_ref()) {
            let span_days = (recorded_at - prior.recorded_at).num_days();
            if rate < 0.0 && span_days >= self.thresholds.stunted_growth_days {
                let message = format!(
                    "height declined {:.1}% over {} days",
                    rate.abs(),
                    span_days
                );
                alerts.push(
                    self.insert_alert(&txn, plant_id, Some(record.id), "stunted_growth", "warning", &message)
                        .await?,
                );
            }
        }

        txn.commit().await?;

        debug!(
            plant = %plant.code,
            record_id = record.id,
            growth_rate = ?growth_rate,
            alert_count = alerts.len(),
            "Growth record ingested"
        );

        Ok(IngestOutcome { record, alerts })
    }

    /// Store a standalone sensor reading and flag threshold breaches.
    pub async fn record_environment(
        &self,
        plant_id: Option<i32>,
        temperature_c: Option<f64>,
        humidity_pct: Option<f64>,
        soil_moisture_pct: Option<f64>,
        light_lux: Option<f64>,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<(environment_readings::Model, Vec<growth_alerts::Model>), ServiceError> {
        if let Some(id) = plant_id {
            Plants::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(ServiceError::NotFound {
                    entity: "plant",
                    id,
                })?;
        }

        let now = Utc::now();
        let reading = environment_readings::ActiveModel {
            plant_id: Set(plant_id),
            temperature_c: Set(temperature_c),
            humidity_pct: Set(humidity_pct),
            soil_moisture_pct: Set(soil_moisture_pct),
            light_lux: Set(light_lux),
            recorded_at: Set(recorded_at.unwrap_or(now)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let mut alerts = Vec::new();
        // Threshold alerts need a plant to attach to.
        if let Some(plant_id) = plant_id {
            for message in self.breaches(&reading) {
                alerts.push(
                    self.insert_alert(&self.db, plant_id, None, "environment", "warning", &message)
                        .await?,
                );
            }
        }

        Ok((reading, alerts))
    }

    fn breaches(&self, reading: &environment_readings::Model) -> Vec<String> {
        let t = &self.thresholds;
        let mut out = Vec::new();
        if let Some(temp) = reading.temperature_c {
            if temp < t.temperature_min_c || temp > t.temperature_max_c {
                out.push(format!("temperature {:.1}C outside [{:.1}, {:.1}]", temp, t.temperature_min_c, t.temperature_max_c));
            }
        }
        if let Some(humidity) = reading.humidity_pct {
            if humidity < t.humidity_min_pct || humidity > t.humidity_max_pct {
                out.push(format!("humidity {:.0}% outside [{:.0}, {:.0}]", humidity, t.humidity_min_pct, t.humidity_max_pct));
            }
        }
        if let Some(moisture) = reading.soil_moisture_pct {
            if moisture < t.soil_moisture_min_pct {
                out.push(format!("soil moisture {:.0}% below {:.0}%", moisture, t.soil_moisture_min_pct));
            }
        }
        out
    }

    async fn insert_alert<C: ConnectionTrait>(
        &self,
        conn: &C,
        plant_id: i32,
        growth_record_id: Option<i32>,
        alert_type: &str,
        severity: &str,
        message: &str,
    ) -> Result<growth_alerts::Model, ServiceError> {
        let alert = growth_alerts::ActiveModel {
            plant_id: Set(plant_id),
            growth_record_id: Set(growth_record_id),
            alert_type: Set(alert_type.to_string()),
            severity: Set(severity.to_string()),
            message: Set(message.to_string()),
            resolved: Set(false),
            resolved_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(alert)
    }

    /// Ask the model for a health verdict. Failures are absorbed.
    async fn assess(
        &self,
        plant: &plants::Model,
        obs: &NewObservation,
        growth_rate: Option<f64>,
        provider: &dyn ModelProvider,
    ) -> Option<Assessment> {
        let prompt = build_assessment_prompt(plant, obs, growth_rate);

        let reply = match provider.complete(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(plant = %plant.code, error = %err, "Model call failed, storing record without health verdict");
                return None;
            }
        };

        match extract_json_object(&reply).and_then(|v| serde_json::from_value::<Assessment>(v).ok()) {
            Some(assessment) => Some(assessment),
            None => {
                warn!(plant = %plant.code, "Model reply was not the expected JSON, ignoring it");
                None
            }
        }
    }
}

/// Percentage height change against the prior record. NULL when either
/// height is missing or the prior height is zero.
pub fn compute_growth_rate(new_height: Option<f64>, prior_height: Option<f64>) -> Option<f64> {
    match (new_height, prior_height) {
        (Some(new), Some(prior)) if prior > 0.0 => Some((new - prior) / prior * 100.0),
        _ => None,
    }
}

fn build_assessment_prompt(
    plant: &plants::Model,
    obs: &NewObservation,
    growth_rate: Option<f64>,
) -> String {
    let mut lines = vec![
        "You are an agronomist reviewing a growth observation.".to_string(),
        format!("Crop: {} (plant {})", plant.crop_type, plant.code),
    ];
    if let Some(height) = obs.height_cm {
        lines.push(format!("Height: {:.1} cm", height));
    }
    if let Some(rate) = growth_rate {
        lines.push(format!("Growth rate vs previous record: {:.1}%", rate));
    }
    if let Some(leaves) = obs.leaf_count {
        lines.push(format!("Leaf count: {}", leaves));
    }
    if let Some(stem) = obs.stem_diameter_mm {
        lines.push(format!("Stem diameter: {:.1} mm", stem));
    }
    if let Some(temp) = obs.temperature_c {
        lines.push(format!("Temperature: {:.1} C", temp));
    }
    if let Some(humidity) = obs.humidity_pct {
        lines.push(format!("Humidity: {:.0}%", humidity));
    }
    if let Some(moisture) = obs.soil_moisture_pct {
        lines.push(format!("Soil moisture: {:.0}%", moisture));
    }
    lines.push(
        "Reply with a JSON object: {\"health_score\": 0-100, \"issues\": [\"...\"]}. \
         Leave issues empty if the plant looks fine."
            .to_string(),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_rate_is_percentage_change() {
        assert_eq!(compute_growth_rate(Some(110.0), Some(100.0)), Some(10.0));
        assert_eq!(compute_growth_rate(Some(90.0), Some(100.0)), Some(-10.0));
    }

    #[test]
    fn growth_rate_absent_without_both_heights() {
        assert_eq!(compute_growth_rate(None, Some(100.0)), None);
        assert_eq!(compute_growth_rate(Some(50.0), None), None);
        assert_eq!(compute_growth_rate(Some(50.0), Some(0.0)), None);
    }

    #[test]
    fn prompt_carries_numeric_fields() {
        let plant = plants::Model {
            id: 1,
            code: "B-17".to_string(),
            crop_type: "strawberry".to_string(),
            variety: None,
            planted_at: None,
            location: None,
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let obs = NewObservation {
            height_cm: Some(23.5),
            leaf_count: Some(12),
            ..Default::default()
        };
        let prompt = build_assessment_prompt(&plant, &obs, Some(4.2));
        assert!(prompt.contains("23.5 cm"));
        assert!(prompt.contains("Leaf count: 12"));
        assert!(prompt.contains("4.2%"));
        assert!(prompt.contains("strawberry"));
    }
}
