//! Schema and service-layer tests against a real SQLite database.

use std::sync::Arc;

use anyhow::Result;
use berryvision::database::entities::{
    environment_readings, environment_readings::Entity as EnvironmentReadings, growth_alerts,
    growth_alerts::Entity as GrowthAlerts, growth_records,
    growth_records::Entity as GrowthRecords, plants, plants::Entity as Plants,
};
use berryvision::database::{establish_connection, setup_database};
use berryvision::services::ai::{MockProvider, ModelProvider};
use berryvision::services::{KnowledgeService, LabService};
use berryvision::services::lab_service::NewLabAnalysis;
use berryvision::database::migrations::Migrator;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use tempfile::NamedTempFile;

async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = establish_connection(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

async fn insert_plant(db: &DatabaseConnection, code: &str) -> Result<plants::Model> {
    let now = Utc::now();
    let plant = plants::ActiveModel {
        code: Set(code.to_string()),
        crop_type: Set("strawberry".to_string()),
        status: Set("active".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(plant)
}

#[tokio::test]
async fn test_migrations_apply_revert_and_reapply() -> Result<()> {
    let (db, _file) = setup_test_db().await?;

    // setup_test_db already ran the migrations up; cycle them to prove
    // every statement (tables and standalone indexes) is valid SQLite
    // in both directions.
    Migrator::down(&db, None).await?;
    Migrator::up(&db, None).await?;

    let plant = insert_plant(&db, "REMIGRATED-1").await?;
    let now = Utc::now();
    growth_records::ActiveModel {
        plant_id: Set(plant.id),
        height_cm: Set(Some(7.5)),
        recorded_at: Set(now),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    Ok(())
}

#[tokio::test]
async fn test_deleting_a_plant_cascades_to_its_rows() -> Result<()> {
    let (db, _file) = setup_test_db().await?;
    let plant = insert_plant(&db, "CASCADE-1").await?;
    let now = Utc::now();

    let record = growth_records::ActiveModel {
        plant_id: Set(plant.id),
        height_cm: Set(Some(12.0)),
        recorded_at: Set(now),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    growth_alerts::ActiveModel {
        plant_id: Set(plant.id),
        growth_record_id: Set(Some(record.id)),
        alert_type: Set("ai_issue".to_string()),
        severity: Set("warning".to_string()),
        message: Set("leaf spot".to_string()),
        resolved: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    environment_readings::ActiveModel {
        plant_id: Set(Some(plant.id)),
        temperature_c: Set(Some(21.0)),
        recorded_at: Set(now),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    Plants::delete_by_id(plant.id).exec(&db).await?;

    let records = GrowthRecords::find()
        .filter(growth_records::Column::PlantId.eq(plant.id))
        .all(&db)
        .await?;
    assert!(records.is_empty());

    let alerts = GrowthAlerts::find()
        .filter(growth_alerts::Column::PlantId.eq(plant.id))
        .all(&db)
        .await?;
    assert!(alerts.is_empty());

    let readings = EnvironmentReadings::find()
        .filter(environment_readings::Column::PlantId.eq(plant.id))
        .all(&db)
        .await?;
    assert!(readings.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_plant_code_is_unique_at_the_schema_level() -> Result<()> {
    let (db, _file) = setup_test_db().await?;
    insert_plant(&db, "UNIQ-1").await?;

    let err = insert_plant(&db, "UNIQ-1").await.unwrap_err();
    let db_err = err.downcast::<sea_orm::DbErr>()?;
    assert!(matches!(
        db_err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_lab_analysis_is_interpreted_when_provider_is_up() -> Result<()> {
    let (db, _file) = setup_test_db().await?;
    let mock = Arc::new(MockProvider::with_replies(vec![
        "Soil is too acidic for strawberries; apply lime.".to_string(),
    ]));
    let service = LabService::new(db, Some(mock.clone() as Arc<dyn ModelProvider>));

    let analysis = service
        .create(NewLabAnalysis {
            sample_type: "soil".to_string(),
            plant_id: None,
            lab_name: Some("AgriLab".to_string()),
            results: json!({ "ph": 4.9, "nitrogen_ppm": 12 }),
            sampled_at: None,
        })
        .await?;

    assert_eq!(analysis.status, "interpreted");
    assert_eq!(
        analysis.interpretation.as_deref(),
        Some("Soil is too acidic for strawberries; apply lime.")
    );

    // The stored results round-trip as JSON.
    let results = analysis.results_json()?;
    assert_eq!(results["ph"], 4.9);
    assert_eq!(results["nitrogen_ppm"], 12);

    // The interpretation prompt carried the measured values.
    let prompts = mock.recorded_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("soil"));
    assert!(prompts[0].contains("\"ph\":4.9"));

    Ok(())
}

#[tokio::test]
async fn test_lab_analysis_stays_pending_without_provider() -> Result<()> {
    let (db, _file) = setup_test_db().await?;
    let service = LabService::new(db.clone(), None);

    let analysis = service
        .create(NewLabAnalysis {
            sample_type: "water".to_string(),
            plant_id: None,
            lab_name: None,
            results: json!({ "ec": 2.1 }),
            sampled_at: None,
        })
        .await?;

    assert_eq!(analysis.status, "pending");
    assert!(analysis.interpretation.is_none());

    Ok(())
}

#[tokio::test]
async fn test_knowledge_search_ranks_by_similarity() -> Result<()> {
    let (db, _file) = setup_test_db().await?;
    let mock = Arc::new(MockProvider::default());
    let service = KnowledgeService::new(db, Some(mock.clone() as Arc<dyn ModelProvider>));

    service
        .add_document(
            "Botrytis control".to_string(),
            "grey mould on strawberry fruit in humid tunnels".to_string(),
            None,
        )
        .await?;
    service
        .add_document(
            "Irrigation scheduling".to_string(),
            "drip irrigation volumes for sandy soils".to_string(),
            None,
        )
        .await?;

    // The mock embedding is a bag-of-letters vector, so reusing one
    // document's words scores it highest.
    let hits = service
        .search("grey mould on strawberry fruit in humid tunnels", 5)
        .await?;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document.title, "Botrytis control");
    assert!(hits[0].score > hits[1].score);

    let hits = service.search("grey mould", 1).await?;
    assert_eq!(hits.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unembedded_documents_are_skipped_by_search() -> Result<()> {
    let (db, _file) = setup_test_db().await?;

    // Stored while no provider was configured: no vector.
    let offline = KnowledgeService::new(db.clone(), None);
    let document = offline
        .add_document("Frost notes".to_string(), "row covers".to_string(), None)
        .await?;
    assert!(document.embedding.is_none());

    let mock = Arc::new(MockProvider::default());
    let online = KnowledgeService::new(db, Some(mock as Arc<dyn ModelProvider>));
    let hits = online.search("row covers", 5).await?;
    assert!(hits.is_empty());

    Ok(())
}
