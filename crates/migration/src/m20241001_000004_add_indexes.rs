use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CoachService: lookups are always by coach
        manager
            .create_index(
                Index::create()
                    .name("idx_coach_service_coach")
                    .table(CoachService::Table)
                    .col(CoachService::CoachId)
                    .to_owned(),
            )
            .await?;

        // AbonementService: lookups are always by abonement
        manager
            .create_index(
                Index::create()
                    .name("idx_abonement_service_abonement")
                    .table(AbonementService::Table)
                    .col(AbonementService::AbonementId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_abonement_service_abonement").table(AbonementService::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_coach_service_coach").table(CoachService::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum CoachService { Table, CoachId }

#[derive(DeriveIden)]
enum AbonementService { Table, AbonementId }
