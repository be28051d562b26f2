use std::collections::HashMap;

use uuid::Uuid;

/// A catalog entry as stored in the `service` table.
pub type Service = models::service::Model;

/// Services linked to each requested owner id. Owners without links are absent.
pub type ServicesByOwner = HashMap<Uuid, Vec<Service>>;

#[derive(Debug, Clone)]
pub struct CreateServiceCommand {
    pub id: Uuid,
    pub title: String,
    pub photo: String,
}

/// Empty `title`/`photo` mean "leave unchanged".
#[derive(Debug, Clone)]
pub struct UpdateServiceCommand {
    pub id: Uuid,
    pub title: String,
    pub photo: String,
}

#[derive(Debug, Clone)]
pub struct CoachServicesCommand {
    pub coach_id: Uuid,
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct AbonementServicesCommand {
    pub abonement_id: Uuid,
    pub service_ids: Vec<Uuid>,
}
