//! Knowledge base: embed documents on insert, retrieve by cosine
//! similarity for RAG prompts and the search endpoint.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::warn;

use crate::database::entities::knowledge_documents::{self, Entity as KnowledgeDocuments};
use crate::services::ai::ModelProvider;
use crate::services::ServiceError;

pub struct KnowledgeService {
    db: DatabaseConnection,
    provider: Option<Arc<dyn ModelProvider>>,
}

#[derive(Debug)]
pub struct SearchHit {
    pub document: knowledge_documents::Model,
    pub score: f32,
}

impl KnowledgeService {
    pub fn new(db: DatabaseConnection, provider: Option<Arc<dyn ModelProvider>>) -> Self {
        Self { db, provider }
    }

    /// Store a document, embedding its content when a provider is
    /// configured. Embedding failures are absorbed: the document is
    /// stored without a vector and skipped by search.
    pub async fn add_document(
        &self,
        title: String,
        content: String,
        tags: Option<String>,
    ) -> Result<knowledge_documents::Model, ServiceError> {
        let embedding = match &self.provider {
            Some(provider) => match provider.embed(&content).await {
                Ok(vector) => Some(serde_json::to_string(&vector)?),
                Err(err) => {
                    warn!(title = %title, error = %err, "Embedding failed, storing document without vector");
                    None
                }
            },
            None => None,
        };

        let document = knowledge_documents::ActiveModel {
            title: Set(title),
            content: Set(content),
            embedding: Set(embedding),
            tags: Set(tags),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(document)
    }

    /// Top-k documents by cosine similarity against the query embedding.
    /// The corpus is small enough for a full scan.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, ServiceError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(ServiceError::Unavailable(
                crate::services::ai::ProviderError::NotConfigured,
            ))?;

        let query_vector = provider.embed(query).await?;

        let documents = KnowledgeDocuments::find().all(&self.db).await?;

        let mut hits: Vec<SearchHit> = documents
            .into_iter()
            .filter_map(|document| {
                let vector = document.embedding_vector()?;
                let score = cosine_similarity(&query_vector, &vector)?;
                Some(SearchHit { document, score })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}

/// Cosine similarity; None for mismatched dimensions or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.5, 0.5, 0.0];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn mismatched_or_zero_vectors_are_skipped() {
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_none());
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_none());
    }
}
