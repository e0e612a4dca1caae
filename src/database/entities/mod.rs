pub mod analyses;
pub mod applied_treatments;
pub mod environment_readings;
pub mod growth_alerts;
pub mod growth_records;
pub mod knowledge_documents;
pub mod lab_analyses;
pub mod notifications;
pub mod plants;
pub mod training_images;
pub mod users;
