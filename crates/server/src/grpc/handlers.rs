use std::collections::HashSet;
use std::sync::Arc;

use tonic::{Request, Response, Status, Streaming};
use uuid::Uuid;

use proto::catalog::v1::service_catalog_server::ServiceCatalog;
use proto::catalog::v1::*;
use service::catalog::domain::{AbonementServicesCommand, CoachServicesCommand, Service, ServicesByOwner, UpdateServiceCommand};
use service::catalog::repository::ServiceRepository;
use service::catalog::CatalogService;
use service::errors::ServiceError;
use service::remote::EntityValidator;
use service::storage::ObjectStorage;

use super::convert::{parse_uuid, parse_uuids, service_object, service_objects};
use super::photo::{create_with_photo, update_with_photo};
use super::upload::collect_upload;
use crate::errors::status_from;
use crate::metrics::RpcTimer;

/// gRPC front of the catalog.
pub struct CatalogGrpc<R: ServiceRepository, V: EntityValidator, S: ObjectStorage> {
    catalog: CatalogService<R, V>,
    storage: Arc<S>,
}

impl<R: ServiceRepository, V: EntityValidator, S: ObjectStorage> CatalogGrpc<R, V, S> {
    pub fn new(catalog: CatalogService<R, V>, storage: Arc<S>) -> Self {
        Self { catalog, storage }
    }
}

fn link_ids(services: &[Service]) -> Vec<String> {
    services.iter().map(|s| s.id.to_string()).collect()
}

/// Owners in request order, each once, skipping those without links.
fn grouped<T>(owner_ids: &[Uuid], mut by_owner: ServicesByOwner, build: impl Fn(String, Vec<ServiceObject>) -> T) -> Vec<T> {
    let mut seen = HashSet::new();
    owner_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| by_owner.remove(id).map(|services| build(id.to_string(), service_objects(&services))))
        .collect()
}

#[tonic::async_trait]
impl<R, V, S> ServiceCatalog for CatalogGrpc<R, V, S>
where
    R: ServiceRepository + 'static,
    V: EntityValidator + 'static,
    S: ObjectStorage + 'static,
{
    async fn create_service(&self, request: Request<Streaming<CreateServiceRequest>>) -> Result<Response<CreateServiceResponse>, Status> {
        let timer = RpcTimer::start("CreateService");
        let result = async {
            let upload = collect_upload(request.into_inner()).await?;
            let data = upload.data.ok_or_else(|| status_from(ServiceError::VoidServiceData))?;
            let created = create_with_photo(&self.catalog, self.storage.as_ref(), Uuid::new_v4(), data.title, upload.photo)
                .await
                .map_err(status_from)?;
            Ok::<_, Status>(CreateServiceResponse { service_object: Some(service_object(&created)) })
        }
        .await;
        timer.finish(result)
    }

    async fn get_service_by_id(&self, request: Request<GetServiceByIdRequest>) -> Result<Response<GetServiceByIdResponse>, Status> {
        let timer = RpcTimer::start("GetServiceById");
        let result = async {
            let id = parse_uuid("id", &request.get_ref().id)?;
            let found = self.catalog.get_service_by_id(id).await.map_err(status_from)?;
            Ok::<_, Status>(GetServiceByIdResponse { service_object: Some(service_object(&found)) })
        }
        .await;
        timer.finish(result)
    }

    async fn update_service(&self, request: Request<Streaming<UpdateServiceRequest>>) -> Result<Response<UpdateServiceResponse>, Status> {
        let timer = RpcTimer::start("UpdateService");
        let result = async {
            let upload = collect_upload(request.into_inner()).await?;
            let data = upload.data.ok_or_else(|| status_from(ServiceError::VoidServiceData))?;
            let cmd = UpdateServiceCommand { id: parse_uuid("id", &data.id)?, title: data.title, photo: String::new() };
            let updated = update_with_photo(&self.catalog, self.storage.as_ref(), cmd, upload.photo)
                .await
                .map_err(status_from)?;
            Ok::<_, Status>(UpdateServiceResponse { service_object: Some(service_object(&updated)) })
        }
        .await;
        timer.finish(result)
    }

    async fn delete_service_by_id(&self, request: Request<DeleteServiceByIdRequest>) -> Result<Response<DeleteServiceByIdResponse>, Status> {
        let timer = RpcTimer::start("DeleteServiceById");
        let result = async {
            let id = parse_uuid("id", &request.get_ref().id)?;
            let deleted = self.catalog.delete_service_by_id(id).await.map_err(status_from)?;
            Ok::<_, Status>(DeleteServiceByIdResponse { service_object: Some(service_object(&deleted)) })
        }
        .await;
        timer.finish(result)
    }

    async fn get_services(&self, _request: Request<GetServicesRequest>) -> Result<Response<GetServicesResponse>, Status> {
        let timer = RpcTimer::start("GetServices");
        let result = self
            .catalog
            .get_services()
            .await
            .map(|services| GetServicesResponse { service_object: service_objects(&services) })
            .map_err(status_from);
        timer.finish(result)
    }

    async fn create_coach_services(&self, request: Request<CreateCoachServicesRequest>) -> Result<Response<CreateCoachServicesResponse>, Status> {
        let timer = RpcTimer::start("CreateCoachServices");
        let result = async {
            let cmd = coach_command(request.into_inner().coach_service)?;
            let coach_id = cmd.coach_id;
            let linked = self.catalog.create_coach_services(cmd).await.map_err(status_from)?;
            Ok::<_, Status>(CreateCoachServicesResponse { coach_service: Some(CoachService { coach_id: coach_id.to_string(), service_id: link_ids(&linked) }) })
        }
        .await;
        timer.finish(result)
    }

    async fn create_abonement_services(
        &self,
        request: Request<CreateAbonementServicesRequest>,
    ) -> Result<Response<CreateAbonementServicesResponse>, Status> {
        let timer = RpcTimer::start("CreateAbonementServices");
        let result = async {
            let cmd = abonement_command(request.into_inner().abonement_service)?;
            let abonement_id = cmd.abonement_id;
            let linked = self.catalog.create_abonement_services(cmd).await.map_err(status_from)?;
            Ok::<_, Status>(CreateAbonementServicesResponse {
                abonement_service: Some(AbonementService { abonement_id: abonement_id.to_string(), service_id: link_ids(&linked) }),
            })
        }
        .await;
        timer.finish(result)
    }

    async fn update_coach_services(&self, request: Request<UpdateCoachServicesRequest>) -> Result<Response<UpdateCoachServicesResponse>, Status> {
        let timer = RpcTimer::start("UpdateCoachServices");
        let result = async {
            let cmd = coach_command(request.into_inner().coach_service)?;
            let coach_id = cmd.coach_id;
            let linked = self.catalog.update_coach_services(cmd).await.map_err(status_from)?;
            Ok::<_, Status>(UpdateCoachServicesResponse { coach_service: Some(CoachService { coach_id: coach_id.to_string(), service_id: link_ids(&linked) }) })
        }
        .await;
        timer.finish(result)
    }

    async fn update_abonement_services(
        &self,
        request: Request<UpdateAbonementServicesRequest>,
    ) -> Result<Response<UpdateAbonementServicesResponse>, Status> {
        let timer = RpcTimer::start("UpdateAbonementServices");
        let result = async {
            let cmd = abonement_command(request.into_inner().abonement_service)?;
            let abonement_id = cmd.abonement_id;
            let linked = self.catalog.update_abonement_services(cmd).await.map_err(status_from)?;
            Ok::<_, Status>(UpdateAbonementServicesResponse {
                abonement_service: Some(AbonementService { abonement_id: abonement_id.to_string(), service_id: link_ids(&linked) }),
            })
        }
        .await;
        timer.finish(result)
    }

    async fn get_abonements_services(
        &self,
        request: Request<GetAbonementsServicesRequest>,
    ) -> Result<Response<GetAbonementsServicesResponse>, Status> {
        let timer = RpcTimer::start("GetAbonementsServices");
        let result = async {
            let ids = parse_uuids("abonement_ids", &request.get_ref().abonement_ids)?;
            let by_owner = self.catalog.get_abonements_services(&ids).await.map_err(status_from)?;
            let abonement_ids_with_services = grouped(&ids, by_owner, |abonement_id, service_objects| AbonementIdWithServices {
                abonement_id,
                service_objects,
            });
            Ok::<_, Status>(GetAbonementsServicesResponse { abonement_ids_with_services })
        }
        .await;
        timer.finish(result)
    }

    async fn get_coaches_services(&self, request: Request<GetCoachesServicesRequest>) -> Result<Response<GetCoachesServicesResponse>, Status> {
        let timer = RpcTimer::start("GetCoachesServices");
        let result = async {
            let ids = parse_uuids("coach_ids", &request.get_ref().coach_ids)?;
            let by_owner = self.catalog.get_coaches_services(&ids).await.map_err(status_from)?;
            let coach_ids_with_services = grouped(&ids, by_owner, |coach_id, service_objects| CoachIdWithServices { coach_id, service_objects });
            Ok::<_, Status>(GetCoachesServicesResponse { coach_ids_with_services })
        }
        .await;
        timer.finish(result)
    }
}

fn coach_command(body: Option<CoachService>) -> Result<CoachServicesCommand, Status> {
    let body = body.ok_or_else(|| Status::invalid_argument("coach_service is required"))?;
    Ok(CoachServicesCommand { coach_id: parse_uuid("coach_id", &body.coach_id)?, service_ids: parse_uuids("service_id", &body.service_id)? })
}

fn abonement_command(body: Option<AbonementService>) -> Result<AbonementServicesCommand, Status> {
    let body = body.ok_or_else(|| Status::invalid_argument("abonement_service is required"))?;
    Ok(AbonementServicesCommand {
        abonement_id: parse_uuid("abonement_id", &body.abonement_id)?,
        service_ids: parse_uuids("service_id", &body.service_id)?,
    })
}
