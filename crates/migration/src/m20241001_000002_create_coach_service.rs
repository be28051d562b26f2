use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CoachId references an entity owned by the coach service, so it has no FK here.
        manager
            .create_table(
                Table::create()
                    .table(CoachService::Table)
                    .if_not_exists()
                    .col(uuid(CoachService::Id).primary_key())
                    .col(uuid(CoachService::CoachId).not_null())
                    .col(uuid(CoachService::ServiceId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coach_service_service")
                            .from(CoachService::Table, CoachService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CoachService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CoachService {
    Table,
    Id,
    CoachId,
    ServiceId,
}

#[derive(DeriveIden)]
enum Service { Table, Id }
