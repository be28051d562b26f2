use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{AbonementServicesCommand, CoachServicesCommand, CreateServiceCommand, Service, ServicesByOwner, UpdateServiceCommand};
use super::repository::ServiceRepository;
use crate::errors::ServiceError;
use crate::remote::{EntityLookup, EntityValidator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Coach,
    Abonement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkMode {
    Append,
    Replace,
}

/// Application service for the catalog.
///
/// Link writes follow one pipeline: confirm the owner with its sibling
/// service, confirm the referenced services exist, write, then re-read the
/// owner's full link set. Nothing is retried.
pub struct CatalogService<R: ServiceRepository, V: EntityValidator> {
    repo: Arc<R>,
    validator: Arc<V>,
}

impl<R: ServiceRepository, V: EntityValidator> Clone for CatalogService<R, V> {
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), validator: self.validator.clone() }
    }
}

impl<R: ServiceRepository, V: EntityValidator> CatalogService<R, V> {
    pub fn new(repo: Arc<R>, validator: Arc<V>) -> Self { Self { repo, validator } }

    #[instrument(skip(self, cmd), fields(service_id = %cmd.id))]
    pub async fn create_service(&self, cmd: CreateServiceCommand) -> Result<Service, ServiceError> {
        let created = self.repo.create_service(&cmd).await?;
        info!(title = %created.title, "service_created");
        Ok(created)
    }

    pub async fn get_service_by_id(&self, id: Uuid) -> Result<Service, ServiceError> {
        self.repo.get_service_by_id(id).await
    }

    /// Apply the non-empty fields, then return the stored record.
    #[instrument(skip(self, cmd), fields(service_id = %cmd.id))]
    pub async fn update_service(&self, cmd: UpdateServiceCommand) -> Result<Service, ServiceError> {
        self.repo.update_service(&cmd).await?;
        self.repo.get_service_by_id(cmd.id).await
    }

    /// Returns the record as it was before deletion.
    #[instrument(skip(self))]
    pub async fn delete_service_by_id(&self, id: Uuid) -> Result<Service, ServiceError> {
        let existing = self.repo.get_service_by_id(id).await?;
        if !self.repo.delete_service(id).await? {
            return Err(ServiceError::ServiceNotFound);
        }
        info!(title = %existing.title, "service_deleted");
        Ok(existing)
    }

    pub async fn get_services(&self) -> Result<Vec<Service>, ServiceError> {
        self.repo.get_services().await
    }

    #[instrument(skip(self, cmd), fields(coach_id = %cmd.coach_id))]
    pub async fn create_coach_services(&self, cmd: CoachServicesCommand) -> Result<Vec<Service>, ServiceError> {
        self.link_services(Owner::Coach, cmd.coach_id, &cmd.service_ids, LinkMode::Append).await
    }

    #[instrument(skip(self, cmd), fields(abonement_id = %cmd.abonement_id))]
    pub async fn create_abonement_services(&self, cmd: AbonementServicesCommand) -> Result<Vec<Service>, ServiceError> {
        self.link_services(Owner::Abonement, cmd.abonement_id, &cmd.service_ids, LinkMode::Append).await
    }

    /// The coach's links become exactly `cmd.service_ids`.
    #[instrument(skip(self, cmd), fields(coach_id = %cmd.coach_id))]
    pub async fn update_coach_services(&self, cmd: CoachServicesCommand) -> Result<Vec<Service>, ServiceError> {
        self.link_services(Owner::Coach, cmd.coach_id, &cmd.service_ids, LinkMode::Replace).await
    }

    #[instrument(skip(self, cmd), fields(abonement_id = %cmd.abonement_id))]
    pub async fn update_abonement_services(&self, cmd: AbonementServicesCommand) -> Result<Vec<Service>, ServiceError> {
        self.link_services(Owner::Abonement, cmd.abonement_id, &cmd.service_ids, LinkMode::Replace).await
    }

    pub async fn get_abonements_services(&self, abonement_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError> {
        self.repo.get_abonements_services(abonement_ids).await
    }

    pub async fn get_coaches_services(&self, coach_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError> {
        self.repo.get_coaches_services(coach_ids).await
    }

    async fn link_services(&self, owner: Owner, owner_id: Uuid, service_ids: &[Uuid], mode: LinkMode) -> Result<Vec<Service>, ServiceError> {
        self.ensure_owner_exists(owner, owner_id).await?;

        // only success matters; unknown ids in a partial match are caught by the foreign key
        self.repo.get_services_by_ids(service_ids).await?;

        match (owner, mode) {
            (Owner::Coach, LinkMode::Append) => {
                let cmd = CoachServicesCommand { coach_id: owner_id, service_ids: service_ids.to_vec() };
                self.repo.create_coach_services(&cmd).await?
            }
            (Owner::Abonement, LinkMode::Append) => {
                let cmd = AbonementServicesCommand { abonement_id: owner_id, service_ids: service_ids.to_vec() };
                self.repo.create_abonement_services(&cmd).await?
            }
            (Owner::Coach, LinkMode::Replace) => self.repo.replace_coach_services(owner_id, service_ids).await?,
            (Owner::Abonement, LinkMode::Replace) => self.repo.replace_abonement_services(owner_id, service_ids).await?,
        }
        info!(?owner, ?mode, %owner_id, count = service_ids.len(), "service_links_written");

        match owner {
            Owner::Coach => self.repo.get_coach_services(owner_id).await,
            Owner::Abonement => self.repo.get_abonement_services(owner_id).await,
        }
    }

    async fn ensure_owner_exists(&self, owner: Owner, owner_id: Uuid) -> Result<(), ServiceError> {
        let lookup = match owner {
            Owner::Coach => self.validator.coach_exists(owner_id).await,
            Owner::Abonement => self.validator.abonement_exists(owner_id).await,
        };
        match (owner, lookup) {
            (_, EntityLookup::Found) => Ok(()),
            (Owner::Coach, EntityLookup::NotFound) => Err(ServiceError::CoachNotFound),
            (Owner::Abonement, EntityLookup::NotFound) => Err(ServiceError::AbonementNotFound),
            (Owner::Coach, EntityLookup::Unavailable(reason)) => Err(ServiceError::InternalCoachServerError(reason)),
            (Owner::Abonement, EntityLookup::Unavailable(reason)) => Err(ServiceError::InternalAbonementServerError(reason)),
        }
    }
}
