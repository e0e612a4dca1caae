use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// "soil", "foliar", "water" or "fruit"
pub type SampleType = String;
// "pending", "interpreted" or "reviewed"
pub type LabStatus = String;

/// A lab report. `interpretation` is filled in by the model when one
/// is configured; otherwise the row stays `pending`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lab_analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sample_type: SampleType,
    pub plant_id: Option<i32>,
    pub lab_name: Option<String>,
    /// JSON object of measured parameters, e.g. {"ph": 6.1, "n_ppm": 42}.
    #[sea_orm(column_type = "Text")]
    pub results: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub interpretation: Option<String>,
    pub status: LabStatus,
    pub sampled_at: ChronoDateTimeUtc,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plants::Entity",
        from = "Column::PlantId",
        to = "super::plants::Column::Id"
    )]
    Plants,
    #[sea_orm(has_many = "super::applied_treatments::Entity")]
    AppliedTreatments,
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plants.def()
    }
}

impl Related<super::applied_treatments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppliedTreatments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn results_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.results)
    }
}
