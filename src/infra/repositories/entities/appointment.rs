//! Appointment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Appointment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub doctor_id: Uuid,
    pub date: Date,
    pub time: Time,
    pub reason: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Appointment {
    fn from(model: Model) -> Self {
        Appointment {
            id: model.id,
            user_id: model.user_id,
            pet_id: model.pet_id,
            doctor_id: model.doctor_id,
            date: model.date,
            time: model.time,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
