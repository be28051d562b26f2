pub mod errors;
pub mod grpc;
pub mod metrics;
pub mod startup;

pub use startup::run;
