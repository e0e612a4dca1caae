pub mod ai;
pub mod dataset_service;
pub mod growth_service;
pub mod knowledge_service;
pub mod lab_service;

pub use dataset_service::DatasetService;
pub use growth_service::GrowthService;
pub use knowledge_service::KnowledgeService;
pub use lab_service::LabService;

use thiserror::Error;

use self::ai::ProviderError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{0}")]
    Validation(String),

    #[error("model provider unavailable: {0}")]
    Unavailable(#[from] ProviderError),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
