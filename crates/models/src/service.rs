use sea_orm::{entity::prelude::*, ConnectionTrait, Set, SqlErr};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Upper bound enforced by the `service.title` column.
pub const TITLE_MAX_LEN: usize = 256;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub photo: String,
    pub created_time: DateTimeWithTimeZone,
    pub updated_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("title longer than {TITLE_MAX_LEN} characters")));
    }
    Ok(())
}

/// Insert a service with a caller-chosen id so that photo keys can be
/// derived from the id before the row exists.
pub async fn create<C: ConnectionTrait>(db: &C, id: Uuid, title: &str, photo: &str) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        photo: Set(photo.to_string()),
        created_time: Set(now),
        updated_time: Set(now),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => errors::ModelError::Conflict(msg),
        _ => errors::ModelError::Db(e.to_string()),
    })
}

/// Apply non-empty fields and always bump `updated_time`.
/// Returns `None` when no row has the given id.
pub async fn update_fields<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    title: &str,
    photo: &str,
) -> Result<Option<Model>, errors::ModelError> {
    let Some(existing) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let mut am: ActiveModel = existing.into();
    if !title.is_empty() {
        validate_title(title)?;
        am.title = Set(title.to_string());
    }
    if !photo.is_empty() {
        am.photo = Set(photo.to_string());
    }
    am.updated_time = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(Some(updated))
}
