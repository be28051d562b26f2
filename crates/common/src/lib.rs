//! Shared helpers for the catalog binaries: logging setup, the admin HTTP
//! listener and small response types.

pub mod types;
pub mod utils;
pub mod admin_http;
