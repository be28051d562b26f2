//! Photo storage for catalog entries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod gateway;

pub use gateway::ObjectStoreGateway;

/// Key under which a service's photo lives.
pub fn service_photo_key(id: Uuid) -> String {
    format!("service/{id}")
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` at `key` and return its public URL.
    async fn put_object(&self, data: Vec<u8>, key: &str) -> Result<String, ServiceError>;
    /// `None` when nothing is stored at `key`.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError>;
    async fn delete_object(&self, key: &str) -> Result<(), ServiceError>;
}
