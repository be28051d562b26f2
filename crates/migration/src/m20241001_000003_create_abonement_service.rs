use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // AbonementId references an entity owned by the abonement service, so it has no FK here.
        manager
            .create_table(
                Table::create()
                    .table(AbonementService::Table)
                    .if_not_exists()
                    .col(uuid(AbonementService::Id).primary_key())
                    .col(uuid(AbonementService::AbonementId).not_null())
                    .col(uuid(AbonementService::ServiceId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_abonement_service_service")
                            .from(AbonementService::Table, AbonementService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AbonementService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AbonementService {
    Table,
    Id,
    AbonementId,
    ServiceId,
}

#[derive(DeriveIden)]
enum Service { Table, Id }
