use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// "healthy", "warning" or "critical"
pub type HealthStatus = String;

/// A single image-derived crop diagnosis.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub image_url: String,
    pub crop_type: String,
    pub health_status: HealthStatus,
    pub disease_name: Option<String>,
    pub disease_confidence: Option<f64>,
    pub pest_name: Option<String>,
    pub pest_confidence: Option<f64>,
    /// BBCH phenology stage code.
    pub bbch_stage: Option<i32>,
    pub fruit_count_ripe: Option<i32>,
    pub fruit_count_unripe: Option<i32>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
