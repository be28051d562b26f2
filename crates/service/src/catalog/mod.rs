//! Catalog module: domain commands, repository abstraction, and the use-case
//! service coordinating remote validation with persistence.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::CatalogService;
