//! Doctor database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Doctor;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Doctor {
    fn from(model: Model) -> Self {
        Doctor {
            id: model.id,
            name: model.name,
            specialty: model.specialty,
            phone: model.phone,
            email: model.email,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
