use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// "ai_issue", "stunted_growth" or "environment"
pub type AlertType = String;
// "info", "warning" or "critical"
pub type AlertSeverity = String;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "growth_alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plant_id: i32,
    pub growth_record_id: Option<i32>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub resolved: bool,
    pub resolved_at: Option<ChronoDateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::growth_records::Entity",
        from = "Column::GrowthRecordId",
        to = "super::growth_records::Column::Id"
    )]
    GrowthRecords,
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plants.def()
    }
}

impl Related<super::growth_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrowthRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
