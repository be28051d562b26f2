use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("void service data")]
    VoidServiceData,
    #[error("service already exists")]
    ServiceAlreadyExists,
    #[error("service not found")]
    ServiceNotFound,
    #[error("coach not found")]
    CoachNotFound,
    #[error("abonement not found")]
    AbonementNotFound,
    #[error("internal coach server error: {0}")]
    InternalCoachServerError(String),
    #[error("internal abonement server error: {0}")]
    InternalAbonementServerError(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::VoidServiceData => 1002,
            ServiceError::ServiceAlreadyExists => 1003,
            ServiceError::ServiceNotFound => 1101,
            ServiceError::CoachNotFound => 1102,
            ServiceError::AbonementNotFound => 1103,
            ServiceError::InternalCoachServerError(_) => 1201,
            ServiceError::InternalAbonementServerError(_) => 1202,
            ServiceError::Db(_) => 1300,
            ServiceError::Storage(_) => 1400,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Conflict(_) => ServiceError::ServiceAlreadyExists,
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Db(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_flatten() {
        assert!(matches!(ServiceError::from(ModelError::Validation("x".into())), ServiceError::Validation(_)));
        assert!(matches!(ServiceError::from(ModelError::Conflict("x".into())), ServiceError::ServiceAlreadyExists));
        assert!(matches!(ServiceError::from(ModelError::Db("x".into())), ServiceError::Db(_)));
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            ServiceError::Validation(String::new()),
            ServiceError::VoidServiceData,
            ServiceError::ServiceAlreadyExists,
            ServiceError::ServiceNotFound,
            ServiceError::CoachNotFound,
            ServiceError::AbonementNotFound,
            ServiceError::InternalCoachServerError(String::new()),
            ServiceError::InternalAbonementServerError(String::new()),
            ServiceError::Db(String::new()),
            ServiceError::Storage(String::new()),
        ];
        let mut codes: Vec<u16> = all.iter().map(ServiceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
