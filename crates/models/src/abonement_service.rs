use sea_orm::{entity::prelude::*, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::link::ServiceLink;
use crate::service;

/// One abonement↔service pair. Rows carry their own id, so additive inserts may
/// repeat a pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "abonement_service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub abonement_id: Uuid,
    pub service_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl ServiceLink for Entity {
    type Row = ActiveModel;

    const OWNER: &'static str = "abonement";

    fn owner_column() -> Column { Column::AbonementId }

    fn owner_id(model: &Model) -> Uuid { model.abonement_id }

    fn service_id(model: &Model) -> Uuid { model.service_id }

    fn row(owner_id: Uuid, service_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            abonement_id: Set(owner_id),
            service_id: Set(service_id),
        }
    }
}
