//! Join tables linking services to entities owned by sibling services.
//!
//! Both `coach_service` and `abonement_service` share one shape, so the
//! store code in the service crate is written once against [`ServiceLink`].

use sea_orm::{ActiveModelTrait, EntityTrait};
use uuid::Uuid;

pub trait ServiceLink: EntityTrait {
    type Row: ActiveModelTrait<Entity = Self> + Send + 'static;

    /// Owner kind used in logs and error messages.
    const OWNER: &'static str;

    fn owner_column() -> Self::Column;
    fn owner_id(model: &Self::Model) -> Uuid;
    fn service_id(model: &Self::Model) -> Uuid;
    fn row(owner_id: Uuid, service_id: Uuid) -> Self::Row;
}
