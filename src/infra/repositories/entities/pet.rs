//! Pet database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Pet;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Pet {
    fn from(model: Model) -> Self {
        Pet {
            id: model.id,
            name: model.name,
            species: model.species,
            breed: model.breed,
            owner_id: model.owner_id,
            created_at: model.created_at,
        }
    }
}
