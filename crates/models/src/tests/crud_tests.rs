use crate::{coach_service, service};
use crate::link::ServiceLink;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

/// Test service CRUD operations
#[tokio::test]
async fn test_service_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    // Create
    let id = Uuid::new_v4();
    let created = service::create(&db, id, "gym", "http://s3/service/x").await?;
    assert_eq!(created.id, id);
    assert_eq!(created.title, "gym");
    assert_eq!(created.created_time, created.updated_time);

    // Read
    let found = service::Entity::find_by_id(id).one(&db).await?;
    assert_eq!(found.as_ref().map(|s| s.title.as_str()), Some("gym"));

    // Update with empty fields only bumps the timestamp
    let updated = service::update_fields(&db, id, "", "").await?.expect("row exists");
    assert_eq!(updated.title, "gym");
    assert_eq!(updated.photo, "http://s3/service/x");
    assert!(updated.updated_time >= created.updated_time);

    let renamed = service::update_fields(&db, id, "sauna", "").await?.expect("row exists");
    assert_eq!(renamed.title, "sauna");

    // Update of a missing row
    assert!(service::update_fields(&db, Uuid::new_v4(), "x", "").await?.is_none());

    // Delete
    let res = service::Entity::delete_by_id(id).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);
    assert!(service::Entity::find_by_id(id).one(&db).await?.is_none());

    Ok(())
}

/// Deleting a service cascades to its join rows
#[tokio::test]
async fn test_link_rows_cascade_on_service_delete() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let svc = service::create(&db, Uuid::new_v4(), "pool", "").await?;
    let coach_id = Uuid::new_v4();
    coach_service::Entity::insert(coach_service::Entity::row(coach_id, svc.id)).exec_without_returning(&db).await?;
    // duplicates are allowed: each row has its own id
    coach_service::Entity::insert(coach_service::Entity::row(coach_id, svc.id)).exec_without_returning(&db).await?;

    let rows = coach_service::Entity::find()
        .filter(coach_service::Column::CoachId.eq(coach_id))
        .all(&db)
        .await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| coach_service::Entity::service_id(r) == svc.id));

    service::Entity::delete_by_id(svc.id).exec(&db).await?;
    let rows = coach_service::Entity::find()
        .filter(coach_service::Column::CoachId.eq(coach_id))
        .all(&db)
        .await?;
    assert!(rows.is_empty());

    Ok(())
}
