use axum::extract::State;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use super::{page_limit, page_offset};
use crate::database::entities::{
    knowledge_documents, knowledge_documents::Entity as KnowledgeDocuments,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{Json, Query};
use crate::services::KnowledgeService;

#[derive(Debug, Deserialize)]
pub struct DocumentFilter {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchHitResponse {
    pub document: knowledge_documents::Model,
    pub score: f32,
}

pub async fn list_documents(
    State(state): State<AppState>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<knowledge_documents::Model>>, ApiError> {
    let rows = KnowledgeDocuments::find()
        .order_by_desc(knowledge_documents::Column::CreatedAt)
        .limit(page_limit(filter.limit))
        .offset(page_offset(filter.offset))
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<Json<knowledge_documents::Model>, ApiError> {
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(ApiError::validation("title and content must not be empty"));
    }

    let service = KnowledgeService::new(state.db.clone(), state.provider.clone());
    let document = service
        .add_document(payload.title, payload.content, payload.tags)
        .await?;

    Ok(Json(document))
}

pub async fn search_documents(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHitResponse>>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::validation("q must not be empty"));
    }

    let service = KnowledgeService::new(state.db.clone(), state.provider.clone());
    let hits = service.search(&query.q, query.k.unwrap_or(5)).await?;

    Ok(Json(
        hits.into_iter()
            .map(|hit| SearchHitResponse {
                document: hit.document,
                score: hit.score,
            })
            .collect(),
    ))
}
