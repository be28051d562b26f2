//! Existence checks against the sibling coach and abonement services.

use async_trait::async_trait;
use uuid::Uuid;

pub mod grpc;

pub use grpc::GrpcEntityValidator;

/// Outcome of asking a sibling service whether an entity exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityLookup {
    Found,
    NotFound,
    /// The sibling could not answer; carries the transport or status message.
    Unavailable(String),
}

#[async_trait]
pub trait EntityValidator: Send + Sync {
    async fn coach_exists(&self, id: Uuid) -> EntityLookup;
    async fn abonement_exists(&self, id: Uuid) -> EntityLookup;
}

/// Fixed answers for tests
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct StaticEntityValidator {
        coaches: HashSet<Uuid>,
        abonements: HashSet<Uuid>,
        unavailable: bool,
        calls: AtomicUsize,
    }

    impl StaticEntityValidator {
        pub fn new() -> Self { Self::default() }

        pub fn with_coach(mut self, id: Uuid) -> Self {
            self.coaches.insert(id);
            self
        }

        pub fn with_abonement(mut self, id: Uuid) -> Self {
            self.abonements.insert(id);
            self
        }

        /// Every lookup answers `Unavailable`.
        pub fn unavailable() -> Self {
            Self { unavailable: true, ..Self::default() }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn lookup(&self, known: &HashSet<Uuid>, id: Uuid) -> EntityLookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                EntityLookup::Unavailable("connection refused".into())
            } else if known.contains(&id) {
                EntityLookup::Found
            } else {
                EntityLookup::NotFound
            }
        }
    }

    #[async_trait]
    impl EntityValidator for StaticEntityValidator {
        async fn coach_exists(&self, id: Uuid) -> EntityLookup {
            self.lookup(&self.coaches, id)
        }

        async fn abonement_exists(&self, id: Uuid) -> EntityLookup {
            self.lookup(&self.abonements, id)
        }
    }
}
