//! tonic delivery layer for `catalog.v1.ServiceCatalog`.

pub mod convert;
pub mod handlers;
pub mod photo;
pub mod upload;

pub use handlers::CatalogGrpc;
