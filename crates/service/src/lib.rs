//! Service layer for the fitness-center service catalog.
//! - `catalog`: use cases over services and their coach/abonement links.
//! - `db`: SeaORM-backed persistence used by the repository implementation.
//! - `remote`: existence checks against the coach and abonement services.
//! - `storage`: photo objects in S3-compatible storage.

pub mod errors;
pub mod catalog;
pub mod db;
pub mod remote;
pub mod storage;
pub mod seed;
#[cfg(test)]
pub mod test_support;
