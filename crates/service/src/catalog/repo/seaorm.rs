use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::{abonement_service, coach_service};

use crate::catalog::domain::{AbonementServicesCommand, CoachServicesCommand, CreateServiceCommand, Service, ServicesByOwner, UpdateServiceCommand};
use crate::catalog::repository::ServiceRepository;
use crate::db::{link_store, service_store};
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn create_service(&self, cmd: &CreateServiceCommand) -> Result<Service, ServiceError> {
        service_store::create_service(&self.db, cmd.id, &cmd.title, &cmd.photo).await
    }

    async fn get_service_by_id(&self, id: Uuid) -> Result<Service, ServiceError> {
        service_store::get_service(&self.db, id).await
    }

    async fn update_service(&self, cmd: &UpdateServiceCommand) -> Result<(), ServiceError> {
        service_store::update_service(&self.db, cmd.id, &cmd.title, &cmd.photo).await
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, ServiceError> {
        service_store::delete_service(&self.db, id).await
    }

    async fn get_services(&self) -> Result<Vec<Service>, ServiceError> {
        service_store::list_services(&self.db).await
    }

    async fn get_services_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>, ServiceError> {
        service_store::get_services_by_ids(&self.db, ids).await
    }

    async fn create_coach_services(&self, cmd: &CoachServicesCommand) -> Result<(), ServiceError> {
        link_store::append_links::<coach_service::Entity>(&self.db, cmd.coach_id, &cmd.service_ids).await
    }

    async fn create_abonement_services(&self, cmd: &AbonementServicesCommand) -> Result<(), ServiceError> {
        link_store::append_links::<abonement_service::Entity>(&self.db, cmd.abonement_id, &cmd.service_ids).await
    }

    async fn replace_coach_services(&self, coach_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
        link_store::replace_links::<coach_service::Entity>(&self.db, coach_id, service_ids).await
    }

    async fn replace_abonement_services(&self, abonement_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
        link_store::replace_links::<abonement_service::Entity>(&self.db, abonement_id, service_ids).await
    }

    async fn get_coach_services(&self, coach_id: Uuid) -> Result<Vec<Service>, ServiceError> {
        link_store::services_for_owner::<coach_service::Entity>(&self.db, coach_id).await
    }

    async fn get_abonement_services(&self, abonement_id: Uuid) -> Result<Vec<Service>, ServiceError> {
        link_store::services_for_owner::<abonement_service::Entity>(&self.db, abonement_id).await
    }

    async fn get_coaches_services(&self, coach_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError> {
        link_store::services_for_owners::<coach_service::Entity>(&self.db, coach_ids).await
    }

    async fn get_abonements_services(&self, abonement_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError> {
        link_store::services_for_owners::<abonement_service::Entity>(&self.db, abonement_ids).await
    }
}
