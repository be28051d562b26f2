use thiserror::Error;
use tonic::{Code, Status};
use tracing::{error, warn};

use service::errors::ServiceError;

/// Map a domain error onto the gRPC status returned to callers.
///
/// Database and storage details stay in the logs; callers get an opaque message.
pub fn status_from(err: ServiceError) -> Status {
    let code = match &err {
        ServiceError::ServiceNotFound | ServiceError::CoachNotFound | ServiceError::AbonementNotFound => Code::NotFound,
        ServiceError::ServiceAlreadyExists => Code::AlreadyExists,
        ServiceError::VoidServiceData | ServiceError::Validation(_) => Code::InvalidArgument,
        ServiceError::InternalCoachServerError(_)
        | ServiceError::InternalAbonementServerError(_)
        | ServiceError::Db(_)
        | ServiceError::Storage(_) => Code::Internal,
    };
    match &err {
        ServiceError::Db(_) | ServiceError::Storage(_) => {
            error!(code = err.code(), error = %err, "request failed");
            Status::new(code, "internal error")
        }
        ServiceError::InternalCoachServerError(_) | ServiceError::InternalAbonementServerError(_) => {
            error!(code = err.code(), error = %err, "sibling service failed");
            Status::new(code, err.to_string())
        }
        _ => {
            warn!(code = err.code(), error = %err, "request rejected");
            Status::new(code, err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
