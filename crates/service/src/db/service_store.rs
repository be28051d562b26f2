use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::service;
use crate::errors::ServiceError;

/// Create a service with a caller-chosen id.
pub async fn create_service(db: &DatabaseConnection, id: Uuid, title: &str, photo: &str) -> Result<service::Model, ServiceError> {
    Ok(service::create(db, id, title, photo).await?)
}

/// Get service by id, `ServiceNotFound` when absent.
pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::ServiceNotFound)
}

/// Partial update; empty strings leave the column unchanged.
pub async fn update_service(db: &DatabaseConnection, id: Uuid, title: &str, photo: &str) -> Result<(), ServiceError> {
    match service::update_fields(db, id, title, photo).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::ServiceNotFound),
    }
}

/// Delete service; links go with it through the cascading foreign key.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = service::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service::Model>, ServiceError> {
    Ok(service::Entity::find()
        .order_by_asc(service::Column::CreatedTime)
        .all(db)
        .await?)
}

/// Batch lookup. Zero matching rows (empty input included) is `ServiceNotFound`;
/// a partial match is returned as is.
pub async fn get_services_by_ids(db: &DatabaseConnection, ids: &[Uuid]) -> Result<Vec<service::Model>, ServiceError> {
    if ids.is_empty() {
        return Err(ServiceError::ServiceNotFound);
    }
    let rows = service::Entity::find()
        .filter(service::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    if rows.is_empty() {
        return Err(ServiceError::ServiceNotFound);
    }
    Ok(rows)
}
