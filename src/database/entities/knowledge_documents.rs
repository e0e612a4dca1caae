use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Free-text agronomy knowledge with a vector embedding for retrieval.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "knowledge_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// JSON-encoded Vec<f32>; NULL when no embedding provider was
    /// configured at insert time.
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing)]
    pub embedding: Option<String>,
    pub tags: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn embedding_vector(&self) -> Option<Vec<f32>> {
        self.embedding
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}
