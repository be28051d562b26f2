use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{instrument, warn};
use uuid::Uuid;

use configs::RemoteConfig;
use proto::abonement::v1::{abonement_client::AbonementClient, GetAbonementByIdRequest};
use proto::coach::v1::{coach_client::CoachClient, GetCoachByIdRequest};

use super::{EntityLookup, EntityValidator};
use crate::errors::ServiceError;

/// Validator backed by the sibling services' gRPC `Get*ById` calls.
#[derive(Clone)]
pub struct GrpcEntityValidator {
    coach: CoachClient<Channel>,
    abonement: AbonementClient<Channel>,
}

impl GrpcEntityValidator {
    /// Build channels without dialing; the first call connects. Must run
    /// inside a tokio runtime.
    pub fn connect_lazy(cfg: &RemoteConfig) -> Result<Self, ServiceError> {
        let timeout = Duration::from_secs(cfg.timeout_secs);
        Ok(Self {
            coach: CoachClient::new(lazy_channel(&cfg.coach_addr, timeout)?),
            abonement: AbonementClient::new(lazy_channel(&cfg.abonement_addr, timeout)?),
        })
    }
}

fn lazy_channel(addr: &str, timeout: Duration) -> Result<Channel, ServiceError> {
    let endpoint = Endpoint::from_shared(addr.to_string())
        .map_err(|e| ServiceError::Validation(format!("invalid remote address {addr}: {e}")))?;
    Ok(endpoint.connect_timeout(timeout).timeout(timeout).connect_lazy())
}

fn classify<T>(kind: &'static str, id: Uuid, result: Result<T, Status>) -> EntityLookup {
    match result {
        Ok(_) => EntityLookup::Found,
        Err(status) if status.code() == Code::NotFound => EntityLookup::NotFound,
        Err(status) => {
            warn!(kind, %id, code = ?status.code(), message = status.message(), "remote lookup failed");
            EntityLookup::Unavailable(format!("{:?}: {}", status.code(), status.message()))
        }
    }
}

#[async_trait]
impl EntityValidator for GrpcEntityValidator {
    #[instrument(skip(self))]
    async fn coach_exists(&self, id: Uuid) -> EntityLookup {
        let mut client = self.coach.clone();
        let result = client.get_coach_by_id(GetCoachByIdRequest { id: id.to_string() }).await;
        classify("coach", id, result)
    }

    #[instrument(skip(self))]
    async fn abonement_exists(&self, id: Uuid) -> EntityLookup {
        let mut client = self.abonement.clone();
        let result = client.get_abonement_by_id(GetAbonementByIdRequest { id: id.to_string() }).await;
        classify("abonement", id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_lookup_outcomes() {
        let id = Uuid::new_v4();
        assert_eq!(classify("coach", id, Ok(())), EntityLookup::Found);
        assert_eq!(classify::<()>("coach", id, Err(Status::not_found("no coach"))), EntityLookup::NotFound);
        assert!(matches!(
            classify::<()>("coach", id, Err(Status::unavailable("down"))),
            EntityLookup::Unavailable(_)
        ));
        assert!(matches!(
            classify::<()>("abonement", id, Err(Status::internal("boom"))),
            EntityLookup::Unavailable(msg) if msg.contains("boom")
        ));
    }

    #[test]
    fn rejects_malformed_address() {
        let cfg = RemoteConfig { coach_addr: "http://bad host".into(), abonement_addr: "http://localhost:1".into(), timeout_secs: 1 };
        assert!(matches!(GrpcEntityValidator::connect_lazy(&cfg), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn unreachable_sibling_is_unavailable() {
        // nothing listens on port 1
        let cfg = RemoteConfig { coach_addr: "http://127.0.0.1:1".into(), abonement_addr: "http://127.0.0.1:1".into(), timeout_secs: 1 };
        let validator = GrpcEntityValidator::connect_lazy(&cfg).unwrap();
        assert!(matches!(validator.coach_exists(Uuid::new_v4()).await, EntityLookup::Unavailable(_)));
        assert!(matches!(validator.abonement_exists(Uuid::new_v4()).await, EntityLookup::Unavailable(_)));
    }
}
