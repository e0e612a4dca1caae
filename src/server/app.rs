use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    alerts, analyses, environment, health, knowledge, lab_analyses, notifications, plants,
    training_images, treatments, users,
};
use crate::config::AlertThresholds;
use crate::services::ai::ModelProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub provider: Option<Arc<dyn ModelProvider>>,
    pub thresholds: AlertThresholds,
}

pub async fn create_app(
    db: DatabaseConnection,
    provider: Option<Arc<dyn ModelProvider>>,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let state = AppState {
        db,
        provider,
        thresholds: AlertThresholds::default(),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Analysis routes
        .route("/analyses", get(analyses::list_analyses))
        .route("/analyses", post(analyses::create_analysis))
        .route("/analyses/:id", get(analyses::get_analysis))
        .route("/analyses/:id", patch(analyses::update_analysis))
        .route("/analyses/:id", delete(analyses::delete_analysis))
        // Training image routes
        .route("/training-images", get(training_images::list_training_images))
        .route("/training-images", post(training_images::create_training_image))
        .route("/training-images/export", get(training_images::export_dataset))
        .route("/training-images/:id", patch(training_images::update_training_image))
        .route("/training-images/:id", delete(training_images::delete_training_image))
        // Plant routes
        .route("/plants", get(plants::list_plants))
        .route("/plants", post(plants::create_plant))
        .route("/plants/:id", get(plants::get_plant))
        .route("/plants/:id", patch(plants::update_plant))
        .route("/plants/:id", delete(plants::delete_plant))
        .route("/plants/:id/stats", get(plants::get_plant_stats))
        // Growth record routes
        .route("/plants/:id/growth-records", get(plants::list_growth_records))
        .route("/plants/:id/growth-records", post(plants::create_growth_record))
        // Alert routes
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/:id", patch(alerts::resolve_alert))
        .route("/alerts/:id", delete(alerts::delete_alert))
        // Environment routes
        .route("/environment", get(environment::list_readings))
        .route("/environment", post(environment::create_reading))
        // Lab analysis routes
        .route("/lab-analyses", get(lab_analyses::list_lab_analyses))
        .route("/lab-analyses", post(lab_analyses::create_lab_analysis))
        .route("/lab-analyses/:id", get(lab_analyses::get_lab_analysis))
        .route("/lab-analyses/:id", patch(lab_analyses::update_lab_analysis))
        .route("/lab-analyses/:id", delete(lab_analyses::delete_lab_analysis))
        .route("/lab-analyses/:id/interpret", post(lab_analyses::interpret_lab_analysis))
        // Treatment routes
        .route("/treatments", get(treatments::list_treatments))
        .route("/treatments", post(treatments::create_treatment))
        .route("/treatments/:id", delete(treatments::delete_treatment))
        // Knowledge routes
        .route("/knowledge", get(knowledge::list_documents))
        .route("/knowledge", post(knowledge::create_document))
        .route("/knowledge/search", get(knowledge::search_documents))
        // User routes
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:id", patch(users::update_user))
        .route("/users/:id", delete(users::delete_user))
        // Notification routes
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications", post(notifications::create_notification))
        .route("/notifications/:id/read", patch(notifications::mark_read))
}
