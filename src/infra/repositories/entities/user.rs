//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{HashedPassword, User, UserCredentials, UserRole, UserStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Always stored normalized (trimmed, lowercase)
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity, dropping the hash
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            role: UserRole::from(model.role.as_str()),
            status: UserStatus::from(model.status.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for UserCredentials {
    fn from(mut model: Model) -> Self {
        let password_hash = HashedPassword::from_hash(std::mem::take(&mut model.password_hash));
        UserCredentials {
            user: User::from(model),
            password_hash,
        }
    }
}
