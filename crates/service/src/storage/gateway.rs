use std::sync::Arc;

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, error};

use configs::StorageConfig;

use super::ObjectStorage;
use crate::errors::ServiceError;

/// [`ObjectStorage`] over any `object_store` backend. URLs are rendered path
/// style as `{endpoint}/{bucket}/{key}`.
#[derive(Clone)]
pub struct ObjectStoreGateway {
    store: Arc<dyn ObjectStore>,
    endpoint: String,
    bucket: String,
}

impl ObjectStoreGateway {
    pub fn new(store: Arc<dyn ObjectStore>, endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { store, endpoint, bucket: bucket.into() }
    }

    /// S3-compatible backend (AWS, MinIO, localstack).
    pub fn s3(cfg: &StorageConfig) -> Result<Self, ServiceError> {
        let store = AmazonS3Builder::new()
            .with_region(&cfg.region)
            .with_access_key_id(&cfg.access_key)
            .with_secret_access_key(&cfg.secret_key)
            .with_endpoint(&cfg.endpoint)
            .with_bucket_name(&cfg.bucket)
            .with_allow_http(cfg.endpoint.starts_with("http://"))
            .with_virtual_hosted_style_request(false)
            .build()
            .map_err(|e| ServiceError::Storage(format!("s3 client: {e}")))?;
        Ok(Self::new(Arc::new(store), cfg.endpoint.clone(), cfg.bucket.clone()))
    }

    pub fn in_memory(endpoint: &str, bucket: &str) -> Self {
        Self::new(Arc::new(InMemory::new()), endpoint, bucket)
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for ObjectStoreGateway {
    async fn put_object(&self, data: Vec<u8>, key: &str) -> Result<String, ServiceError> {
        let size = data.len();
        self.store
            .put(&Path::from(key), PutPayload::from(data))
            .await
            .map_err(|e| {
                error!(key, error = %e, "put object failed");
                ServiceError::Storage(e.to_string())
            })?;
        debug!(key, size, "object stored");
        Ok(self.object_url(key))
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        let result = match self.store.get(&Path::from(key)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        };
        let bytes = result.bytes().await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }

    async fn delete_object(&self, key: &str) -> Result<(), ServiceError> {
        match self.store.delete(&Path::from(key)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }
}
