//! SeaORM persistence for services and their join tables.
//!
//! Free functions taking a connection, wrapped by
//! [`crate::catalog::repo::seaorm::SeaOrmServiceRepository`].

pub mod service_store;
pub mod link_store;
