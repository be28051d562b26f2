use crate::{abonement_service, service};
use crate::link::ServiceLink;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

async fn abonement_rows(db: &sea_orm::DatabaseConnection, abonement_id: Uuid) -> Result<Vec<Uuid>> {
    let rows = abonement_service::Entity::find()
        .filter(abonement_service::Column::AbonementId.eq(abonement_id))
        .all(db)
        .await?;
    Ok(rows.iter().map(abonement_service::Entity::service_id).collect())
}

/// A failed insert after the delete leaves the previous rows in place
#[tokio::test]
async fn test_failed_rewrite_rolls_back_delete() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let svc = service::create(&db, Uuid::new_v4(), "gym", "").await?;
    let abonement_id = Uuid::new_v4();
    abonement_service::Entity::insert(abonement_service::Entity::row(abonement_id, svc.id))
        .exec_without_returning(&db)
        .await?;

    let result = async {
        let txn = db.begin().await?;
        abonement_service::Entity::delete_many()
            .filter(abonement_service::Column::AbonementId.eq(abonement_id))
            .exec(&txn)
            .await?;
        // dangling service id violates the FK
        abonement_service::Entity::insert(abonement_service::Entity::row(abonement_id, Uuid::new_v4()))
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;
    assert!(result.is_err());

    assert_eq!(abonement_rows(&db, abonement_id).await?, vec![svc.id]);

    service::Entity::delete_by_id(svc.id).exec(&db).await?;
    Ok(())
}

/// Test basic transaction commit of a rewrite
#[tokio::test]
async fn test_rewrite_commit() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let a = service::create(&db, Uuid::new_v4(), "gym", "").await?;
    let b = service::create(&db, Uuid::new_v4(), "sauna", "").await?;
    let abonement_id = Uuid::new_v4();
    abonement_service::Entity::insert(abonement_service::Entity::row(abonement_id, a.id))
        .exec_without_returning(&db)
        .await?;

    let txn = db.begin().await?;
    abonement_service::Entity::delete_many()
        .filter(abonement_service::Column::AbonementId.eq(abonement_id))
        .exec(&txn)
        .await?;
    abonement_service::Entity::insert(abonement_service::Entity::row(abonement_id, b.id))
        .exec_without_returning(&txn)
        .await?;
    txn.commit().await?;

    assert_eq!(abonement_rows(&db, abonement_id).await?, vec![b.id]);

    // Cleanup
    for id in [a.id, b.id] {
        service::Entity::delete_by_id(id).exec(&db).await?;
    }
    Ok(())
}
