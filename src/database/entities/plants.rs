use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// "active" or "archived"
pub type PlantStatus = String;

/// A tracked plant. `code` is unique at the database level.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub crop_type: String,
    pub variety: Option<String>,
    pub planted_at: Option<Date>,
    pub location: Option<String>,
    pub status: PlantStatus,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::growth_records::Entity")]
    GrowthRecords,
    #[sea_orm(has_many = "super::growth_alerts::Entity")]
    GrowthAlerts,
    #[sea_orm(has_many = "super::environment_readings::Entity")]
    EnvironmentReadings,
}

impl Related<super::growth_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrowthRecords.def()
    }
}

impl Related<super::growth_alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GrowthAlerts.def()
    }
}

impl Related<super::environment_readings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnvironmentReadings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
