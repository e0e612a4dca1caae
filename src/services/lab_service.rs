//! Lab analyses: store reports and fill in an AI interpretation,
//! grounding the prompt with retrieved knowledge documents.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{info, warn};

use crate::database::entities::lab_analyses::{self, Entity as LabAnalyses};
use crate::services::ai::{ModelProvider, ProviderError};
use crate::services::{KnowledgeService, ServiceError};

pub struct LabService {
    db: DatabaseConnection,
    provider: Option<Arc<dyn ModelProvider>>,
}

#[derive(Debug, Clone)]
pub struct NewLabAnalysis {
    pub sample_type: String,
    pub plant_id: Option<i32>,
    pub lab_name: Option<String>,
    pub results: serde_json::Value,
    pub sampled_at: Option<DateTime<Utc>>,
}

impl LabService {
    pub fn new(db: DatabaseConnection, provider: Option<Arc<dyn ModelProvider>>) -> Self {
        Self { db, provider }
    }

    /// Store a lab report, then attempt the interpretation. A failed or
    /// unconfigured model leaves the row `pending` with a NULL
    /// interpretation; the insert itself always succeeds.
    pub async fn create(&self, new: NewLabAnalysis) -> Result<lab_analyses::Model, ServiceError> {
        let now = Utc::now();
        let analysis = lab_analyses::ActiveModel {
            sample_type: Set(new.sample_type),
            plant_id: Set(new.plant_id),
            lab_name: Set(new.lab_name),
            results: Set(serde_json::to_string(&new.results)?),
            interpretation: Set(None),
            status: Set("pending".to_string()),
            sampled_at: Set(new.sampled_at.unwrap_or(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        match self.interpret(analysis.id).await {
            Ok(interpreted) => Ok(interpreted),
            Err(ServiceError::Unavailable(err)) => {
                warn!(lab_analysis_id = analysis.id, error = %err, "Interpretation skipped");
                Ok(analysis)
            }
            Err(other) => Err(other),
        }
    }

    /// Run (or re-run) the interpretation for a stored report.
    pub async fn interpret(&self, id: i32) -> Result<lab_analyses::Model, ServiceError> {
        let analysis = LabAnalyses::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "lab analysis",
                id,
            })?;

        let provider = self
            .provider
            .as_ref()
            .ok_or(ServiceError::Unavailable(ProviderError::NotConfigured))?;

        let context = self.retrieval_context(&analysis).await;
        let prompt = build_interpretation_prompt(&analysis, &context);

        let interpretation = provider.complete(&prompt).await.map_err(ServiceError::Unavailable)?;

        info!(lab_analysis_id = id, "Lab analysis interpreted");

        let mut active: lab_analyses::ActiveModel = analysis.into();
        active.interpretation = Set(Some(interpretation));
        active.status = Set("interpreted".to_string());
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    /// Retrieve knowledge documents related to the sample. Retrieval
    /// failures degrade to an empty context rather than blocking the
    /// interpretation.
    async fn retrieval_context(&self, analysis: &lab_analyses::Model) -> Vec<String> {
        let knowledge = KnowledgeService::new(self.db.clone(), self.provider.clone());
        let query = format!("{} analysis {}", analysis.sample_type, analysis.results);
        match knowledge.search(&query, 2).await {
            Ok(hits) => hits
                .into_iter()
                .map(|hit| format!("{}: {}", hit.document.title, hit.document.content))
                .collect(),
            Err(err) => {
                warn!(error = %err, "Knowledge retrieval failed, interpreting without context");
                Vec::new()
            }
        }
    }
}

fn build_interpretation_prompt(analysis: &lab_analyses::Model, context: &[String]) -> String {
    let mut lines = vec![format!(
        "Interpret this {} lab report for farm staff. Measured values (JSON): {}",
        analysis.sample_type, analysis.results
    )];
    if !context.is_empty() {
        lines.push("Reference notes:".to_string());
        for entry in context {
            lines.push(format!("- {}", entry));
        }
    }
    lines.push("Give a short plain-language interpretation and any recommended action.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpretation_prompt_includes_results_and_context() {
        let analysis = lab_analyses::Model {
            id: 1,
            sample_type: "soil".to_string(),
            plant_id: None,
            lab_name: None,
            results: "{\"ph\":5.2}".to_string(),
            interpretation: None,
            status: "pending".to_string(),
            sampled_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let prompt = build_interpretation_prompt(
            &analysis,
            &["Soil pH guide: berries prefer 5.5-6.5".to_string()],
        );
        assert!(prompt.contains("{\"ph\":5.2}"));
        assert!(prompt.contains("Soil pH guide"));
    }
}
