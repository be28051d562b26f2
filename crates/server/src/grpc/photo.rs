//! Photo upload around service writes, with a compensating step when the
//! database write fails after the object was stored.

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use service::catalog::domain::{CreateServiceCommand, Service, UpdateServiceCommand};
use service::catalog::repository::ServiceRepository;
use service::catalog::CatalogService;
use service::errors::ServiceError;
use service::remote::EntityValidator;
use service::storage::{service_photo_key, ObjectStorage};

/// Upload `photo` (when non-empty) under the new id's key, then insert the row.
/// A failed insert deletes the uploaded object.
#[instrument(skip(catalog, storage, photo), fields(photo_len = photo.len()))]
pub async fn create_with_photo<R, V, S>(
    catalog: &CatalogService<R, V>,
    storage: &S,
    id: Uuid,
    title: String,
    photo: Vec<u8>,
) -> Result<Service, ServiceError>
where
    R: ServiceRepository,
    V: EntityValidator,
    S: ObjectStorage + ?Sized,
{
    if photo.is_empty() {
        return catalog.create_service(CreateServiceCommand { id, title, photo: String::new() }).await;
    }

    let key = service_photo_key(id);
    let url = storage.put_object(photo, &key).await?;
    match catalog.create_service(CreateServiceCommand { id, title, photo: url }).await {
        Ok(created) => Ok(created),
        Err(e) => {
            if let Err(cleanup) = storage.delete_object(&key).await {
                warn!(%key, error = %cleanup, "orphaned photo left after failed create");
            }
            Err(e)
        }
    }
}

/// Update a service, replacing its photo when `photo` is non-empty.
///
/// The previous object is read before the new one is written. If the database
/// update then fails, the previous bytes are written back once (or the new
/// object is deleted when there was none). A failed compensation is an error
/// of its own and leaves storage out of step with the row.
#[instrument(skip(catalog, storage, cmd, photo), fields(service_id = %cmd.id, photo_len = photo.len()))]
pub async fn update_with_photo<R, V, S>(
    catalog: &CatalogService<R, V>,
    storage: &S,
    mut cmd: UpdateServiceCommand,
    photo: Vec<u8>,
) -> Result<Service, ServiceError>
where
    R: ServiceRepository,
    V: EntityValidator,
    S: ObjectStorage + ?Sized,
{
    if photo.is_empty() {
        return catalog.update_service(cmd).await;
    }

    let key = service_photo_key(cmd.id);
    let previous = storage.get_object(&key).await?;
    cmd.photo = storage.put_object(photo, &key).await?;

    let err = match catalog.update_service(cmd).await {
        Ok(updated) => return Ok(updated),
        Err(e) => e,
    };

    let compensation = match previous {
        Some(bytes) => storage.put_object(bytes, &key).await.map(|_| ()),
        None => storage.delete_object(&key).await,
    };
    match compensation {
        Ok(()) => {
            info!(%key, error = %err, "photo restored after failed update");
            Err(err)
        }
        Err(restore) => {
            error!(%key, error = %err, restore_error = %restore, "photo rollback failed");
            Err(ServiceError::Storage(format!("update failed ({err}) and photo rollback failed ({restore})")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use service::catalog::repository::mock::MockServiceRepository;
    use service::remote::mock::StaticEntityValidator;
    use service::storage::ObjectStoreGateway;

    fn setup() -> (CatalogService<MockServiceRepository, StaticEntityValidator>, Arc<MockServiceRepository>, ObjectStoreGateway) {
        let repo = Arc::new(MockServiceRepository::default());
        let catalog = CatalogService::new(repo.clone(), Arc::new(StaticEntityValidator::new()));
        (catalog, repo, ObjectStoreGateway::in_memory("http://s3", "service"))
    }

    fn update(id: Uuid) -> UpdateServiceCommand {
        UpdateServiceCommand { id, title: String::new(), photo: String::new() }
    }

    #[tokio::test]
    async fn create_stores_photo_under_service_key() {
        let (catalog, _, storage) = setup();
        let id = Uuid::new_v4();
        let created = create_with_photo(&catalog, &storage, id, "gym".into(), b"img".to_vec()).await.unwrap();
        assert_eq!(created.photo, format!("http://s3/service/service/{id}"));
        assert_eq!(storage.get_object(&service_photo_key(id)).await.unwrap().as_deref(), Some(&b"img"[..]));
    }

    #[tokio::test]
    async fn failed_create_removes_uploaded_photo() {
        let (catalog, _, storage) = setup();
        let id = Uuid::new_v4();
        create_with_photo(&catalog, &storage, id, "gym".into(), Vec::new()).await.unwrap();

        let err = create_with_photo(&catalog, &storage, id, "gym".into(), b"img".to_vec()).await;
        assert!(matches!(err, Err(ServiceError::ServiceAlreadyExists)));
        assert!(storage.get_object(&service_photo_key(id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn successful_update_replaces_photo() {
        let (catalog, _, storage) = setup();
        let id = Uuid::new_v4();
        create_with_photo(&catalog, &storage, id, "gym".into(), b"old".to_vec()).await.unwrap();

        let updated = update_with_photo(&catalog, &storage, update(id), b"new".to_vec()).await.unwrap();
        assert_eq!(updated.title, "gym");
        assert_eq!(storage.get_object(&service_photo_key(id)).await.unwrap().as_deref(), Some(&b"new"[..]));
    }

    #[tokio::test]
    async fn failed_update_restores_previous_photo() {
        let (catalog, repo, storage) = setup();
        let id = Uuid::new_v4();
        create_with_photo(&catalog, &storage, id, "gym".into(), b"old".to_vec()).await.unwrap();

        repo.fail_updates(true);
        let err = update_with_photo(&catalog, &storage, update(id), b"new".to_vec()).await;
        assert!(matches!(err, Err(ServiceError::Db(_))));
        assert_eq!(storage.get_object(&service_photo_key(id)).await.unwrap().as_deref(), Some(&b"old"[..]));
    }

    #[tokio::test]
    async fn failed_update_without_previous_photo_deletes_new_one() {
        let (catalog, _, storage) = setup();
        let id = Uuid::new_v4();

        // no such service: the update fails after the upload
        let err = update_with_photo(&catalog, &storage, update(id), b"new".to_vec()).await;
        assert!(matches!(err, Err(ServiceError::ServiceNotFound)));
        assert!(storage.get_object(&service_photo_key(id)).await.unwrap().is_none());
    }

    /// Delegates to the in-memory gateway; every put after the first `ok_puts` fails.
    struct FlakyStore {
        inner: ObjectStoreGateway,
        ok_puts: usize,
        puts: AtomicUsize,
    }

    #[tonic::async_trait]
    impl ObjectStorage for FlakyStore {
        async fn put_object(&self, data: Vec<u8>, key: &str) -> Result<String, ServiceError> {
            if self.puts.fetch_add(1, Ordering::SeqCst) >= self.ok_puts {
                return Err(ServiceError::Storage("s3 down".into()));
            }
            self.inner.put_object(data, key).await
        }

        async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
            self.inner.get_object(key).await
        }

        async fn delete_object(&self, key: &str) -> Result<(), ServiceError> {
            self.inner.delete_object(key).await
        }
    }

    #[tokio::test]
    async fn failed_restore_is_reported_and_new_photo_stays() {
        let (catalog, repo, inner) = setup();
        let id = Uuid::new_v4();
        create_with_photo(&catalog, &inner, id, "gym".into(), b"old".to_vec()).await.unwrap();

        // the new upload succeeds, the restore of the old bytes does not
        let storage = FlakyStore { inner, ok_puts: 1, puts: AtomicUsize::new(0) };
        repo.fail_updates(true);
        let err = update_with_photo(&catalog, &storage, update(id), b"new".to_vec()).await;
        match err {
            Err(ServiceError::Storage(msg)) => assert!(msg.contains("s3 down"), "{msg}"),
            other => panic!("expected storage error, got {other:?}"),
        }
        assert_eq!(storage.get_object(&service_photo_key(id)).await.unwrap().as_deref(), Some(&b"new"[..]));
        assert_eq!(catalog.get_service_by_id(id).await.unwrap().title, "gym");
    }

    #[tokio::test]
    async fn update_without_photo_leaves_storage_alone() {
        let (catalog, _, storage) = setup();
        let id = Uuid::new_v4();
        create_with_photo(&catalog, &storage, id, "gym".into(), b"old".to_vec()).await.unwrap();

        let mut cmd = update(id);
        cmd.title = "spa".into();
        let updated = update_with_photo(&catalog, &storage, cmd, Vec::new()).await.unwrap();
        assert_eq!(updated.title, "spa");
        assert_eq!(storage.get_object(&service_photo_key(id)).await.unwrap().as_deref(), Some(&b"old"[..]));
    }
}
