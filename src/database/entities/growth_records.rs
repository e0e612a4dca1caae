use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A periodic measurement of a plant, optionally annotated by the
/// vision model. `health_score` and `ai_issues` stay NULL when no
/// model verdict was available.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "growth_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plant_id: i32,
    pub image_url: Option<String>,
    pub height_cm: Option<f64>,
    pub leaf_count: Option<i32>,
    pub stem_diameter_mm: Option<f64>,
    /// Percentage change against the previous record's height.
    pub growth_rate_pct: Option<f64>,
    /// 0-100, as reported by the model.
    pub health_score: Option<i32>,
    /// JSON array of issue strings flagged by the model.
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_issues: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: ChronoDateTimeUtc,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plants::Entity",
        from = "Column::PlantId",
        to = "super::plants::Column::Id"
    )]
    Plants,
    #[sea_orm(has_many = "super::growth_alerts::Entity")]
    GrowthAlerts,
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plants.def()
    }
}

impl Related<super::growth_alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrowthAlerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Issues flagged by the model, decoded from the stored JSON array.
    pub fn issues(&self) -> Vec<String> {
        self.ai_issues
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}
