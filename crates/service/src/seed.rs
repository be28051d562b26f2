//! Initial catalog written on first start.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::domain::CreateServiceCommand;
use crate::catalog::repository::ServiceRepository;
use crate::catalog::CatalogService;
use crate::errors::ServiceError;
use crate::remote::EntityValidator;
use crate::storage::{service_photo_key, ObjectStorage};

pub const INITIAL_SERVICES: [&str; 3] = ["gym", "sauna", "swimming-pool"];

/// Create the initial services when the catalog is empty.
///
/// A photo is uploaded from `{images_dir}/{title}.png` when that file exists;
/// otherwise the service is created without one. Returns how many services
/// were created.
pub async fn seed_initial_services<R, V, S>(
    catalog: &CatalogService<R, V>,
    storage: &S,
    images_dir: &Path,
) -> Result<usize, ServiceError>
where
    R: ServiceRepository,
    V: EntityValidator,
    S: ObjectStorage + ?Sized,
{
    if !catalog.get_services().await?.is_empty() {
        return Ok(0);
    }

    for title in INITIAL_SERVICES {
        let id = Uuid::new_v4();
        let image = images_dir.join(format!("{title}.png"));
        let photo = match tokio::fs::read(&image).await {
            Ok(bytes) => storage.put_object(bytes, &service_photo_key(id)).await?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %image.display(), "seed image missing, creating service without photo");
                String::new()
            }
            Err(e) => return Err(ServiceError::Storage(format!("read {}: {e}", image.display()))),
        };
        catalog.create_service(CreateServiceCommand { id, title: title.to_string(), photo }).await?;
    }
    info!(count = INITIAL_SERVICES.len(), "initial services inserted");
    Ok(INITIAL_SERVICES.len())
}
