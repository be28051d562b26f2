//! Join-table writes and reads, generic over coach and abonement links.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use tracing::{debug, error};
use uuid::Uuid;

use models::link::ServiceLink;
use models::service;
use crate::errors::ServiceError;

/// Insert `(owner, service)` pairs without touching existing rows.
pub async fn append_links<L: ServiceLink>(db: &DatabaseConnection, owner_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
    if service_ids.is_empty() {
        return Ok(());
    }
    let rows = service_ids.iter().map(|sid| L::row(owner_id, *sid));
    L::insert_many(rows).exec(db).await.map_err(|e| {
        error!(owner = L::OWNER, %owner_id, error = %e, "append links failed");
        ServiceError::Db(e.to_string())
    })?;
    debug!(owner = L::OWNER, %owner_id, count = service_ids.len(), "links appended");
    Ok(())
}

/// Replace the owner's whole link set in one transaction.
///
/// Any failed statement returns early and drops the transaction, which rolls
/// back; the previous set stays visible. A failed commit is reported as is.
pub async fn replace_links<L: ServiceLink>(db: &DatabaseConnection, owner_id: Uuid, service_ids: &[Uuid]) -> Result<(), ServiceError> {
    let txn = db.begin().await?;

    L::delete_many()
        .filter(L::owner_column().eq(owner_id))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(format!("delete {} links: {e}", L::OWNER)))?;

    for sid in service_ids {
        L::insert(L::row(owner_id, *sid))
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::Db(format!("insert {} link for service {sid}: {e}", L::OWNER)))?;
    }

    txn.commit().await.map_err(|e| {
        error!(owner = L::OWNER, %owner_id, error = %e, "commit of link rewrite failed");
        ServiceError::Db(format!("commit {} links: {e}", L::OWNER))
    })?;
    debug!(owner = L::OWNER, %owner_id, count = service_ids.len(), "links replaced");
    Ok(())
}

/// Services linked to one owner; a pair stored twice yields the service twice.
pub async fn services_for_owner<L: ServiceLink>(db: &DatabaseConnection, owner_id: Uuid) -> Result<Vec<service::Model>, ServiceError> {
    let mut grouped = services_for_owners::<L>(db, &[owner_id]).await?;
    Ok(grouped.remove(&owner_id).unwrap_or_default())
}

/// Services grouped by owner. Owners without links are absent from the map.
pub async fn services_for_owners<L: ServiceLink>(
    db: &DatabaseConnection,
    owner_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<service::Model>>, ServiceError> {
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let links = L::find()
        .filter(L::owner_column().is_in(owner_ids.iter().copied()))
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(HashMap::new());
    }

    let mut service_ids: Vec<Uuid> = links.iter().map(L::service_id).collect();
    service_ids.sort_unstable();
    service_ids.dedup();
    let services: HashMap<Uuid, service::Model> = service::Entity::find()
        .filter(service::Column::Id.is_in(service_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let mut out: HashMap<Uuid, Vec<service::Model>> = HashMap::new();
    for link in &links {
        if let Some(s) = services.get(&L::service_id(link)) {
            out.entry(L::owner_id(link)).or_default().push(s.clone());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{abonement_service, coach_service};

    use crate::db::service_store::{create_service, delete_service};
    use crate::test_support::get_db;

    fn ids(services: &[service::Model]) -> Vec<Uuid> {
        let mut v: Vec<Uuid> = services.iter().map(|s| s.id).collect();
        v.sort_unstable();
        v
    }

    #[tokio::test]
    async fn append_accumulates_and_replace_overwrites() {
        let Some(db) = get_db().await else { return };
        let a = create_service(&db, Uuid::new_v4(), "gym", "").await.unwrap();
        let b = create_service(&db, Uuid::new_v4(), "sauna", "").await.unwrap();
        let coach = Uuid::new_v4();

        append_links::<coach_service::Entity>(&db, coach, &[a.id]).await.unwrap();
        append_links::<coach_service::Entity>(&db, coach, &[a.id, b.id]).await.unwrap();
        let linked = services_for_owner::<coach_service::Entity>(&db, coach).await.unwrap();
        assert_eq!(linked.len(), 3);

        replace_links::<coach_service::Entity>(&db, coach, &[b.id]).await.unwrap();
        replace_links::<coach_service::Entity>(&db, coach, &[a.id]).await.unwrap();
        let linked = services_for_owner::<coach_service::Entity>(&db, coach).await.unwrap();
        assert_eq!(ids(&linked), vec![a.id]);

        delete_service(&db, a.id).await.unwrap();
        delete_service(&db, b.id).await.unwrap();
    }

    #[tokio::test]
    async fn failed_replace_keeps_previous_set() {
        let Some(db) = get_db().await else { return };
        let a = create_service(&db, Uuid::new_v4(), "pool", "").await.unwrap();
        let abonement = Uuid::new_v4();
        replace_links::<abonement_service::Entity>(&db, abonement, &[a.id]).await.unwrap();

        // second id has no service row, so the foreign key rejects it mid-transaction
        let err = replace_links::<abonement_service::Entity>(&db, abonement, &[a.id, Uuid::new_v4()]).await;
        assert!(matches!(err, Err(ServiceError::Db(_))));

        let linked = services_for_owner::<abonement_service::Entity>(&db, abonement).await.unwrap();
        assert_eq!(ids(&linked), vec![a.id]);

        delete_service(&db, a.id).await.unwrap();
    }

    #[tokio::test]
    async fn batch_read_groups_by_owner() {
        let Some(db) = get_db().await else { return };
        assert!(services_for_owners::<coach_service::Entity>(&db, &[]).await.unwrap().is_empty());

        let a = create_service(&db, Uuid::new_v4(), "gym", "").await.unwrap();
        let (c1, c2, c3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        append_links::<coach_service::Entity>(&db, c1, &[a.id]).await.unwrap();
        append_links::<coach_service::Entity>(&db, c2, &[a.id]).await.unwrap();

        let grouped = services_for_owners::<coach_service::Entity>(&db, &[c1, c2, c3]).await.unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(ids(&grouped[&c1]), vec![a.id]);
        assert!(!grouped.contains_key(&c3));

        delete_service(&db, a.id).await.unwrap();
    }
}
