//! Fine-tuning dataset export: verified training images as JSONL.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;

use crate::database::entities::training_images::{self, Entity as TrainingImages};
use crate::services::ServiceError;

pub struct DatasetService {
    db: DatabaseConnection,
}

impl DatasetService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// One JSON object per line, verified images only.
    pub async fn export_jsonl(&self) -> Result<String, ServiceError> {
        let images = TrainingImages::find()
            .filter(training_images::Column::Verified.eq(true))
            .order_by_asc(training_images::Column::Id)
            .all(&self.db)
            .await?;

        let mut out = String::new();
        for image in &images {
            let line = json!({
                "image_url": image.image_url,
                "label": image.label,
                "bbch_stage": image.bbch_stage,
                "annotations": image.annotations_json(),
            });
            out.push_str(&line.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{establish_connection, setup_database};
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};

    async fn seed_image(
        db: &sea_orm::DatabaseConnection,
        label: &str,
        verified: bool,
    ) -> training_images::Model {
        let now = Utc::now();
        training_images::ActiveModel {
            image_url: Set(format!("https://img.example/{}.jpg", label)),
            crop_type: Set("strawberry".to_string()),
            label: Set(label.to_string()),
            bbch_stage: Set(Some(65)),
            annotations: Set(Some("{\"boxes\":[]}".to_string())),
            verified: Set(verified),
            created_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn export_contains_only_verified_images() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
        let db = establish_connection(&db_url).await.unwrap();
        setup_database(&db).await.unwrap();

        seed_image(&db, "ripe", true).await;
        seed_image(&db, "unsure", false).await;

        let jsonl = DatasetService::new(db).export_jsonl().await.unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 1);

        let row: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(row["label"], "ripe");
        assert_eq!(row["bbch_stage"], 65);
        assert!(row["annotations"]["boxes"].is_array());
    }
}
