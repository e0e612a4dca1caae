use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A treatment action. Must reference the alert or the lab analysis
/// that motivated it (enforced at the API layer).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applied_treatments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub product: Option<String>,
    pub dose: Option<String>,
    pub method: Option<String>,
    pub alert_id: Option<i32>,
    pub lab_analysis_id: Option<i32>,
    pub applied_at: ChronoDateTimeUtc,
    pub notes: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::growth_alerts::Entity",
        from = "Column::AlertId",
        to = "super::growth_alerts::Column::Id"
    )]
    GrowthAlerts,
    #[sea_orm(
        belongs_to = "super::lab_analyses::Entity",
        from = "Column::LabAnalysisId",
        to = "super::lab_analyses::Column::Id"
    )]
    LabAnalyses,
}

impl Related<super::growth_alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrowthAlerts.def()
    }
}

impl Related<super::lab_analyses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabAnalyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
