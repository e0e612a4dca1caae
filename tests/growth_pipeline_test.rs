//! Growth-record ingestion pipeline tests, driven through the HTTP API
//! with a canned model provider.

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use berryvision::database::entities::growth_records;
use berryvision::database::{establish_connection, setup_database};
use berryvision::server::app::create_app;
use berryvision::services::ai::{MockProvider, ModelProvider};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

async fn setup_test_server(
    provider: Option<Arc<dyn ModelProvider>>,
) -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = establish_connection(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, provider, Some("*")).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

async fn create_plant(server: &TestServer, code: &str) -> Result<i64> {
    let response = server
        .post("/api/v1/plants")
        .json(&json!({ "code": code, "crop_type": "strawberry" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let created: Value = response.json();
    Ok(created["plant"]["id"].as_i64().unwrap())
}

#[tokio::test]
async fn test_flagged_issues_become_critical_alerts() -> Result<()> {
    let mock = Arc::new(MockProvider::with_replies(vec![
        r#"{"health_score": 25, "issues": ["leaf spot", "wilting"]}"#.to_string(),
    ]));
    let (server, _db) =
        setup_test_server(Some(mock.clone() as Arc<dyn ModelProvider>)).await?;
    let plant_id = create_plant(&server, "P-01").await?;

    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 18.0, "leaf_count": 9, "humidity_pct": 82.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    let record: growth_records::Model = serde_json::from_value(outcome["record"].clone())?;
    assert_eq!(record.health_score, Some(25));
    assert_eq!(record.issues(), vec!["leaf spot", "wilting"]);

    let alerts = outcome["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    for alert in alerts {
        assert_eq!(alert["alert_type"], "ai_issue");
        assert_eq!(alert["severity"], "critical");
        assert_eq!(alert["resolved"], false);
    }

    // The prompt sent to the model carries the observation numbers.
    let prompts = mock.recorded_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("18.0 cm"));
    assert!(prompts[0].contains("Leaf count: 9"));
    assert!(prompts[0].contains("strawberry"));

    // The humidity value also landed as an environment reading.
    let response = server
        .get("/api/v1/environment")
        .add_query_param("plant_id", plant_id)
        .await;
    let readings: Vec<Value> = response.json();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0]["humidity_pct"], 82.0);

    Ok(())
}

#[tokio::test]
async fn test_healthy_verdict_raises_no_alerts() -> Result<()> {
    let mock = Arc::new(MockProvider::with_replies(vec![
        r#"{"health_score": 92, "issues": []}"#.to_string(),
    ]));
    let (server, _db) =
        setup_test_server(Some(mock.clone() as Arc<dyn ModelProvider>)).await?;
    let plant_id = create_plant(&server, "P-02").await?;

    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 30.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    assert_eq!(outcome["record"]["health_score"], 92);
    assert!(outcome["record"]["ai_issues"].is_null());
    assert!(outcome["alerts"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_provider_failure_still_stores_record() -> Result<()> {
    let mock = Arc::new(MockProvider::failing());
    let (server, _db) =
        setup_test_server(Some(mock.clone() as Arc<dyn ModelProvider>)).await?;
    let plant_id = create_plant(&server, "P-03").await?;

    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 14.0, "notes": "after transplant" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    assert_eq!(outcome["record"]["height_cm"], 14.0);
    assert!(outcome["record"]["health_score"].is_null());
    assert!(outcome["record"]["ai_issues"].is_null());
    assert!(outcome["alerts"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unparseable_reply_is_ignored() -> Result<()> {
    let mock = Arc::new(MockProvider::with_replies(vec![
        "The plant looks okay to me.".to_string(),
    ]));
    let (server, _db) =
        setup_test_server(Some(mock.clone() as Arc<dyn ModelProvider>)).await?;
    let plant_id = create_plant(&server, "P-04").await?;

    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 21.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    assert!(outcome["record"]["health_score"].is_null());
    assert!(outcome["alerts"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_stunted_growth_alert_after_a_week_of_decline() -> Result<()> {
    // No provider: the decline rule does not depend on the model.
    let (server, _db) = setup_test_server(None).await?;
    let plant_id = create_plant(&server, "P-05").await?;

    let eight_days_ago = Utc::now() - Duration::days(8);
    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 100.0, "recorded_at": eight_days_ago }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let first: Value = response.json();
    assert!(first["record"]["growth_rate_pct"].is_null());
    assert!(first["alerts"].as_array().unwrap().is_empty());

    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 90.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    let rate = outcome["record"]["growth_rate_pct"].as_f64().unwrap();
    assert!((rate + 10.0).abs() < 1e-6);

    let alerts = outcome["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "stunted_growth");
    assert_eq!(alerts[0]["severity"], "warning");
    assert!(alerts[0]["message"].as_str().unwrap().contains("8 days"));

    // The alert can be resolved through the API.
    let response = server
        .patch(&format!("/api/v1/alerts/{}", alerts[0]["id"]))
        .json(&json!({ "resolved": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let resolved: Value = response.json();
    assert_eq!(resolved["resolved"], true);
    assert!(resolved["resolved_at"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_recent_decline_raises_no_alert() -> Result<()> {
    let (server, _db) = setup_test_server(None).await?;
    let plant_id = create_plant(&server, "P-06").await?;

    let yesterday = Utc::now() - Duration::days(1);
    server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 50.0, "recorded_at": yesterday }))
        .await;

    let response = server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 48.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    assert!(outcome["record"]["growth_rate_pct"].as_f64().unwrap() < 0.0);
    assert!(outcome["alerts"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_growth_record_for_missing_plant_is_not_found() -> Result<()> {
    let (server, _db) = setup_test_server(None).await?;

    let response = server
        .post("/api/v1/plants/999/growth-records")
        .json(&json!({ "height_cm": 10.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_environment_threshold_breach_raises_alert() -> Result<()> {
    let (server, _db) = setup_test_server(None).await?;
    let plant_id = create_plant(&server, "P-07").await?;

    let response = server
        .post("/api/v1/environment")
        .json(&json!({ "plant_id": plant_id, "temperature_c": 45.0, "humidity_pct": 60.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let outcome: Value = response.json();
    assert_eq!(outcome["reading"]["temperature_c"], 45.0);
    let alerts = outcome["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "environment");
    assert!(alerts[0]["message"].as_str().unwrap().contains("temperature"));

    // In-range reading without a plant: stored, no alerts possible.
    let response = server
        .post("/api/v1/environment")
        .json(&json!({ "temperature_c": 22.0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let outcome: Value = response.json();
    assert!(outcome["alerts"].as_array().unwrap().is_empty());

    // A reading with no measurement at all is rejected.
    let response = server
        .post("/api/v1/environment")
        .json(&json!({ "plant_id": plant_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_plant_stats_aggregate_records_and_alerts() -> Result<()> {
    let (server, _db) = setup_test_server(None).await?;
    let plant_id = create_plant(&server, "P-08").await?;

    let ten_days_ago = Utc::now() - Duration::days(10);
    server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 100.0, "recorded_at": ten_days_ago }))
        .await;
    server
        .post(&format!("/api/v1/plants/{}/growth-records", plant_id))
        .json(&json!({ "height_cm": 90.0 }))
        .await;

    let response = server.get(&format!("/api/v1/plants/{}/stats", plant_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let stats: Value = response.json();
    assert_eq!(stats["record_count"], 2);
    assert_eq!(stats["latest_height_cm"], 90.0);
    let avg = stats["average_growth_rate_pct"].as_f64().unwrap();
    assert!((avg + 10.0).abs() < 1e-6);
    // The decline produced one open stunted-growth alert.
    assert_eq!(stats["open_alert_count"], 1);

    Ok(())
}
