use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A manually labeled image destined for the fine-tuning dataset.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "training_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub image_url: String,
    pub crop_type: String,
    pub label: String,
    pub bbch_stage: Option<i32>,
    /// JSON-encoded annotation payload (bounding boxes etc.).
    #[sea_orm(column_type = "Text", nullable)]
    pub annotations: Option<String>,
    pub verified: bool,
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

impl Model {
    /// Parse the stored annotation payload, if any.
    pub fn annotations_json(&self) -> Option<serde_json::Value> {
        self.annotations
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}
