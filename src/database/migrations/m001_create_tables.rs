use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("operator"))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .index(
                        Index::create()
                            .name("idx_users_email")
                            .table(Users::Table)
                            .col(Users::Email)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create analyses table
        manager
            .create_table(
                Table::create()
                    .table(Analyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Analyses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Analyses::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Analyses::CropType).string().not_null())
                    .col(
                        ColumnDef::new(Analyses::HealthStatus)
                            .string()
                            .not_null()
                            .default("healthy"),
                    )
                    .col(ColumnDef::new(Analyses::DiseaseName).string())
                    .col(ColumnDef::new(Analyses::DiseaseConfidence).double())
                    .col(ColumnDef::new(Analyses::PestName).string())
                    .col(ColumnDef::new(Analyses::PestConfidence).double())
                    .col(ColumnDef::new(Analyses::BbchStage).integer())
                    .col(ColumnDef::new(Analyses::FruitCountRipe).integer())
                    .col(ColumnDef::new(Analyses::FruitCountUnripe).integer())
                    .col(ColumnDef::new(Analyses::Notes).string())
                    .col(ColumnDef::new(Analyses::CreatedBy).integer())
                    .col(ColumnDef::new(Analyses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Analyses::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_analyses_created_by")
                            .from(Analyses::Table, Analyses::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create training_images table
        manager
            .create_table(
                Table::create()
                    .table(TrainingImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainingImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TrainingImages::ImageUrl).string().not_null())
                    .col(ColumnDef::new(TrainingImages::CropType).string().not_null())
                    .col(ColumnDef::new(TrainingImages::Label).string().not_null())
                    .col(ColumnDef::new(TrainingImages::BbchStage).integer())
                    .col(ColumnDef::new(TrainingImages::Annotations).text())
                    .col(
                        ColumnDef::new(TrainingImages::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TrainingImages::CreatedBy).integer())
                    .col(ColumnDef::new(TrainingImages::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(TrainingImages::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_images_created_by")
                            .from(TrainingImages::Table, TrainingImages::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plants table
        manager
            .create_table(
                Table::create()
                    .table(Plants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plants::Code).string().not_null())
                    .col(ColumnDef::new(Plants::CropType).string().not_null())
                    .col(ColumnDef::new(Plants::Variety).string())
                    .col(ColumnDef::new(Plants::PlantedAt).date())
                    .col(ColumnDef::new(Plants::Location).string())
                    .col(
                        ColumnDef::new(Plants::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Plants::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Plants::UpdatedAt).timestamp().not_null())
                    .index(
                        Index::create()
                            .name("idx_plants_code")
                            .table(Plants::Table)
                            .col(Plants::Code)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create growth_records table
        manager
            .create_table(
                Table::create()
                    .table(GrowthRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GrowthRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GrowthRecords::PlantId).integer().not_null())
                    .col(ColumnDef::new(GrowthRecords::ImageUrl).string())
                    .col(ColumnDef::new(GrowthRecords::HeightCm).double())
                    .col(ColumnDef::new(GrowthRecords::LeafCount).integer())
                    .col(ColumnDef::new(GrowthRecords::StemDiameterMm).double())
                    .col(ColumnDef::new(GrowthRecords::GrowthRatePct).double())
                    .col(ColumnDef::new(GrowthRecords::HealthScore).integer())
                    .col(ColumnDef::new(GrowthRecords::AiIssues).text())
                    .col(ColumnDef::new(GrowthRecords::Notes).string())
                    .col(ColumnDef::new(GrowthRecords::RecordedAt).timestamp().not_null())
                    .col(ColumnDef::new(GrowthRecords::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_growth_records_plant_id")
                            .from(GrowthRecords::Table, GrowthRecords::PlantId)
                            .to(Plants::Table, Plants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // SQLite only accepts non-unique indexes as standalone statements
        manager
            .create_index(
                Index::create()
                    .name("idx_growth_records_plant_recorded")
                    .table(GrowthRecords::Table)
                    .col(GrowthRecords::PlantId)
                    .col(GrowthRecords::RecordedAt)
                    .to_owned(),
            )
            .await?;

        // Create growth_alerts table
        manager
            .create_table(
                Table::create()
                    .table(GrowthAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GrowthAlerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GrowthAlerts::PlantId).integer().not_null())
                    .col(ColumnDef::new(GrowthAlerts::GrowthRecordId).integer())
                    .col(ColumnDef::new(GrowthAlerts::AlertType).string().not_null())
                    .col(
                        ColumnDef::new(GrowthAlerts::Severity)
                            .string()
                            .not_null()
                            .default("warning"),
                    )
                    .col(ColumnDef::new(GrowthAlerts::Message).string().not_null())
                    .col(
                        ColumnDef::new(GrowthAlerts::Resolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(GrowthAlerts::ResolvedAt).timestamp())
                    .col(ColumnDef::new(GrowthAlerts::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_growth_alerts_plant_id")
                            .from(GrowthAlerts::Table, GrowthAlerts::PlantId)
                            .to(Plants::Table, Plants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_growth_alerts_growth_record_id")
                            .from(GrowthAlerts::Table, GrowthAlerts::GrowthRecordId)
                            .to(GrowthRecords::Table, GrowthRecords::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create environment_readings table
        manager
            .create_table(
                Table::create()
                    .table(EnvironmentReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnvironmentReadings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EnvironmentReadings::PlantId).integer())
                    .col(ColumnDef::new(EnvironmentReadings::TemperatureC).double())
                    .col(ColumnDef::new(EnvironmentReadings::HumidityPct).double())
                    .col(ColumnDef::new(EnvironmentReadings::SoilMoisturePct).double())
                    .col(ColumnDef::new(EnvironmentReadings::LightLux).double())
                    .col(
                        ColumnDef::new(EnvironmentReadings::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentReadings::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_environment_readings_plant_id")
                            .from(EnvironmentReadings::Table, EnvironmentReadings::PlantId)
                            .to(Plants::Table, Plants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lab_analyses table
        manager
            .create_table(
                Table::create()
                    .table(LabAnalyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LabAnalyses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LabAnalyses::SampleType).string().not_null())
                    .col(ColumnDef::new(LabAnalyses::PlantId).integer())
                    .col(ColumnDef::new(LabAnalyses::LabName).string())
                    .col(ColumnDef::new(LabAnalyses::Results).text().not_null())
                    .col(ColumnDef::new(LabAnalyses::Interpretation).text())
                    .col(
                        ColumnDef::new(LabAnalyses::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(LabAnalyses::SampledAt).timestamp().not_null())
                    .col(ColumnDef::new(LabAnalyses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(LabAnalyses::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lab_analyses_plant_id")
                            .from(LabAnalyses::Table, LabAnalyses::PlantId)
                            .to(Plants::Table, Plants::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create applied_treatments table
        manager
            .create_table(
                Table::create()
                    .table(AppliedTreatments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppliedTreatments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AppliedTreatments::Name).string().not_null())
                    .col(ColumnDef::new(AppliedTreatments::Product).string())
                    .col(ColumnDef::new(AppliedTreatments::Dose).string())
                    .col(ColumnDef::new(AppliedTreatments::Method).string())
                    .col(ColumnDef::new(AppliedTreatments::AlertId).integer())
                    .col(ColumnDef::new(AppliedTreatments::LabAnalysisId).integer())
                    .col(
                        ColumnDef::new(AppliedTreatments::AppliedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AppliedTreatments::Notes).string())
                    .col(
                        ColumnDef::new(AppliedTreatments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applied_treatments_alert_id")
                            .from(AppliedTreatments::Table, AppliedTreatments::AlertId)
                            .to(GrowthAlerts::Table, GrowthAlerts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applied_treatments_lab_analysis_id")
                            .from(AppliedTreatments::Table, AppliedTreatments::LabAnalysisId)
                            .to(LabAnalyses::Table, LabAnalyses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create knowledge_documents table
        manager
            .create_table(
                Table::create()
                    .table(KnowledgeDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KnowledgeDocuments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(KnowledgeDocuments::Title).string().not_null())
                    .col(ColumnDef::new(KnowledgeDocuments::Content).text().not_null())
                    .col(ColumnDef::new(KnowledgeDocuments::Embedding).text())
                    .col(ColumnDef::new(KnowledgeDocuments::Tags).string())
                    .col(
                        ColumnDef::new(KnowledgeDocuments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).integer())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Body).string())
                    .col(
                        ColumnDef::new(Notifications::Kind)
                            .string()
                            .not_null()
                            .default("system"),
                    )
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(KnowledgeDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AppliedTreatments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LabAnalyses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnvironmentReadings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GrowthAlerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GrowthRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainingImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Analyses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Analyses {
    Table,
    Id,
    ImageUrl,
    CropType,
    HealthStatus,
    DiseaseName,
    DiseaseConfidence,
    PestName,
    PestConfidence,
    BbchStage,
    FruitCountRipe,
    FruitCountUnripe,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TrainingImages {
    Table,
    Id,
    ImageUrl,
    CropType,
    Label,
    BbchStage,
    Annotations,
    Verified,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Plants {
    Table,
    Id,
    Code,
    CropType,
    Variety,
    PlantedAt,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GrowthRecords {
    Table,
    Id,
    PlantId,
    ImageUrl,
    HeightCm,
    LeafCount,
    StemDiameterMm,
    GrowthRatePct,
    HealthScore,
    AiIssues,
    Notes,
    RecordedAt,
    CreatedAt,
}

#[derive(Iden)]
enum GrowthAlerts {
    Table,
    Id,
    PlantId,
    GrowthRecordId,
    AlertType,
    Severity,
    Message,
    Resolved,
    ResolvedAt,
    CreatedAt,
}

#[derive(Iden)]
enum EnvironmentReadings {
    Table,
    Id,
    PlantId,
    TemperatureC,
    HumidityPct,
    SoilMoisturePct,
    LightLux,
    RecordedAt,
    CreatedAt,
}

#[derive(Iden)]
enum LabAnalyses {
    Table,
    Id,
    SampleType,
    PlantId,
    LabName,
    Results,
    Interpretation,
    Status,
    SampledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AppliedTreatments {
    Table,
    Id,
    Name,
    Product,
    Dose,
    Method,
    AlertId,
    LabAnalysisId,
    AppliedAt,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum KnowledgeDocuments {
    Table,
    Id,
    Title,
    Content,
    Embedding,
    Tags,
    CreatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Body,
    Kind,
    Read,
    CreatedAt,
}
