use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sensor reading. `plant_id` is NULL for greenhouse-wide readings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "environment_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plant_id: Option<i32>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub soil_moisture_pct: Option<f64>,
    pub light_lux: Option<f64>,
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
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
