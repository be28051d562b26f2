use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AbonementServicesCommand, CoachServicesCommand, CreateServiceCommand, Service, ServicesByOwner, UpdateServiceCommand};
use crate::errors::ServiceError;

/// Persistence abstraction for services and their coach/abonement links.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create_service(&self, cmd: &CreateServiceCommand) -> Result<Service, ServiceError>;
    /// Fails with `ServiceNotFound` when no row matches.
    async fn get_service_by_id(&self, id: Uuid) -> Result<Service, ServiceError>;
    async fn update_service(&self, cmd: &UpdateServiceCommand) -> Result<(), ServiceError>;
    async fn delete_service(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn get_services(&self) -> Result<Vec<Service>, ServiceError>;
    /// Fails with `ServiceNotFound` only when nothing matches; a partial match succeeds.
    async fn get_services_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>, ServiceError>;

    async fn create_coach_services(&self, cmd: &CoachServicesCommand) -> Result<(), ServiceError>;
    async fn create_abonement_services(&self, cmd: &AbonementServicesCommand) -> Result<(), ServiceError>;
    async fn replace_coach_services(&self, coach_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError>;
    async fn replace_abonement_services(&self, abonement_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError>;

    async fn get_coach_services(&self, coach_id: Uuid) -> Result<Vec<Service>, ServiceError>;
    async fn get_abonement_services(&self, abonement_id: Uuid) -> Result<Vec<Service>, ServiceError>;
    async fn get_coaches_services(&self, coach_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError>;
    async fn get_abonements_services(&self, abonement_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use chrono::Utc;

    #[derive(Default)]
    struct State {
        services: Vec<Service>,
        coach_links: Vec<(Uuid, Uuid)>,     // (coach_id, service_id)
        abonement_links: Vec<(Uuid, Uuid)>, // (abonement_id, service_id)
        mutations: usize,
    }

    /// Mirrors the SeaORM repository: replace is all-or-nothing, and a link to
    /// an unknown service fails the insert the way the foreign key would.
    #[derive(Default)]
    pub struct MockServiceRepository {
        state: Mutex<State>,
        fail_updates: Mutex<bool>,
    }

    impl MockServiceRepository {
        fn state(&self) -> MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Number of successful writes; lets tests assert nothing was mutated.
        pub fn mutations(&self) -> usize {
            self.state().mutations
        }

        /// Make every subsequent `update_service` fail with a database error.
        pub fn fail_updates(&self, fail: bool) {
            *self.fail_updates.lock().unwrap_or_else(PoisonError::into_inner) = fail;
        }

        fn links_of(links: &[(Uuid, Uuid)], services: &[Service], owner: Uuid) -> Vec<Service> {
            links
                .iter()
                .filter(|(o, _)| *o == owner)
                .filter_map(|(_, sid)| services.iter().find(|s| s.id == *sid).cloned())
                .collect()
        }

        fn group(links: &[(Uuid, Uuid)], services: &[Service], owners: &[Uuid]) -> ServicesByOwner {
            let mut out = ServicesByOwner::new();
            for (owner, sid) in links.iter().filter(|(o, _)| owners.contains(o)) {
                if let Some(s) = services.iter().find(|s| s.id == *sid) {
                    out.entry(*owner).or_default().push(s.clone());
                }
            }
            out
        }

        fn check_known(state: &State, service_ids: &[Uuid]) -> Result<(), ServiceError> {
            match service_ids.iter().find(|id| !state.services.iter().any(|s| s.id == **id)) {
                Some(missing) => Err(ServiceError::Db(format!("failed to insert service_id {missing}: foreign key violation"))),
                None => Ok(()),
            }
        }

        fn append(state: &mut State, coach: bool, owner: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
            Self::check_known(state, service_ids)?;
            let links = if coach { &mut state.coach_links } else { &mut state.abonement_links };
            links.extend(service_ids.iter().map(|sid| (owner, *sid)));
            state.mutations += 1;
            Ok(())
        }

        fn replace(state: &mut State, coach: bool, owner: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
            Self::check_known(state, service_ids)?;
            let links = if coach { &mut state.coach_links } else { &mut state.abonement_links };
            links.retain(|(o, _)| *o != owner);
            links.extend(service_ids.iter().map(|sid| (owner, *sid)));
            state.mutations += 1;
            Ok(())
        }
    }

    #[async_trait]
    impl ServiceRepository for MockServiceRepository {
        async fn create_service(&self, cmd: &CreateServiceCommand) -> Result<Service, ServiceError> {
            models::service::validate_title(&cmd.title)?;
            let mut state = self.state();
            if state.services.iter().any(|s| s.id == cmd.id) {
                return Err(ServiceError::ServiceAlreadyExists);
            }
            let now = Utc::now().into();
            let service = Service { id: cmd.id, title: cmd.title.clone(), photo: cmd.photo.clone(), created_time: now, updated_time: now };
            state.services.push(service.clone());
            state.mutations += 1;
            Ok(service)
        }

        async fn get_service_by_id(&self, id: Uuid) -> Result<Service, ServiceError> {
            self.state().services.iter().find(|s| s.id == id).cloned().ok_or(ServiceError::ServiceNotFound)
        }

        async fn update_service(&self, cmd: &UpdateServiceCommand) -> Result<(), ServiceError> {
            if *self.fail_updates.lock().unwrap_or_else(PoisonError::into_inner) {
                return Err(ServiceError::Db("update rejected".into()));
            }
            let mut state = self.state();
            let service = state.services.iter_mut().find(|s| s.id == cmd.id).ok_or(ServiceError::ServiceNotFound)?;
            if !cmd.title.is_empty() {
                models::service::validate_title(&cmd.title)?;
                service.title = cmd.title.clone();
            }
            if !cmd.photo.is_empty() {
                service.photo = cmd.photo.clone();
            }
            service.updated_time = Utc::now().into();
            state.mutations += 1;
            Ok(())
        }

        async fn delete_service(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut state = self.state();
            let before = state.services.len();
            state.services.retain(|s| s.id != id);
            let deleted = state.services.len() != before;
            if deleted {
                state.coach_links.retain(|(_, sid)| *sid != id);
                state.abonement_links.retain(|(_, sid)| *sid != id);
                state.mutations += 1;
            }
            Ok(deleted)
        }

        async fn get_services(&self) -> Result<Vec<Service>, ServiceError> {
            Ok(self.state().services.clone())
        }

        async fn get_services_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>, ServiceError> {
            let found: Vec<Service> = self.state().services.iter().filter(|s| ids.contains(&s.id)).cloned().collect();
            if found.is_empty() {
                return Err(ServiceError::ServiceNotFound);
            }
            Ok(found)
        }

        async fn create_coach_services(&self, cmd: &CoachServicesCommand) -> Result<(), ServiceError> {
            Self::append(&mut self.state(), true, cmd.coach_id, &cmd.service_ids)
        }

        async fn create_abonement_services(&self, cmd: &AbonementServicesCommand) -> Result<(), ServiceError> {
            Self::append(&mut self.state(), false, cmd.abonement_id, &cmd.service_ids)
        }

        async fn replace_coach_services(&self, coach_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
            Self::replace(&mut self.state(), true, coach_id, service_ids)
        }

        async fn replace_abonement_services(&self, abonement_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
            Self::replace(&mut self.state(), false, abonement_id, service_ids)
        }

        async fn get_coach_services(&self, coach_id: Uuid) -> Result<Vec<Service>, ServiceError> {
            let state = self.state();
            Ok(Self::links_of(&state.coach_links, &state.services, coach_id))
        }

        async fn get_abonement_services(&self, abonement_id: Uuid) -> Result<Vec<Service>, ServiceError> {
            let state = self.state();
            Ok(Self::links_of(&state.abonement_links, &state.services, abonement_id))
        }

        async fn get_coaches_services(&self, coach_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError> {
            let state = self.state();
            Ok(Self::group(&state.coach_links, &state.services, coach_ids))
        }

        async fn get_abonements_services(&self, abonement_ids: &[Uuid]) -> Result<ServicesByOwner, ServiceError> {
            let state = self.state();
            Ok(Self::group(&state.abonement_links, &state.services, abonement_ids))
        }
    }
}
