//! Clinic repository - pets, doctors and appointments.
//!
//! Plain row access: list everything, insert one row. No joins.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::{appointment, doctor, pet};
use crate::config::STATUS_ACTIVE;
use crate::domain::{Appointment, Doctor, NewAppointment, NewDoctor, NewPet, Pet};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    async fn list_pets(&self) -> AppResult<Vec<Pet>>;

    async fn create_pet(&self, new_pet: NewPet) -> AppResult<Pet>;

    async fn list_doctors(&self) -> AppResult<Vec<Doctor>>;

    async fn create_doctor(&self, new_doctor: NewDoctor) -> AppResult<Doctor>;

    async fn list_appointments(&self) -> AppResult<Vec<Appointment>>;

    async fn create_appointment(&self, new_appointment: NewAppointment)
        -> AppResult<Appointment>;
}

pub struct ClinicStore {
    db: DatabaseConnection,
}

impl ClinicStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// A dangling owner/pet/doctor id is the caller's mistake, not ours.
fn map_reference_error(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::bad_request(format!("Referenced {} does not exist", what))
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl ClinicRepository for ClinicStore {
    async fn list_pets(&self) -> AppResult<Vec<Pet>> {
        let models = pet::Entity::find()
            .order_by_desc(pet::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Pet::from).collect())
    }

    async fn create_pet(&self, new_pet: NewPet) -> AppResult<Pet> {
        let model = pet::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_pet.name),
            species: Set(new_pet.species),
            breed: Set(new_pet.breed),
            owner_id: Set(new_pet.owner_id),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_reference_error(e, "owner"))?;

        Ok(Pet::from(model))
    }

    async fn list_doctors(&self) -> AppResult<Vec<Doctor>> {
        let models = doctor::Entity::find()
            .order_by_asc(doctor::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Doctor::from).collect())
    }

    async fn create_doctor(&self, new_doctor: NewDoctor) -> AppResult<Doctor> {
        let model = doctor::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_doctor.name),
            specialty: Set(new_doctor.specialty),
            phone: Set(new_doctor.phone),
            email: Set(new_doctor.email),
            status: Set(STATUS_ACTIVE.to_string()),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Doctor::from(model))
    }

    async fn list_appointments(&self) -> AppResult<Vec<Appointment>> {
        let models = appointment::Entity::find()
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::Time)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Appointment::from).collect())
    }

    async fn create_appointment(
        &self,
        new_appointment: NewAppointment,
    ) -> AppResult<Appointment> {
        let model = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new_appointment.user_id),
            pet_id: Set(new_appointment.pet_id),
            doctor_id: Set(new_appointment.doctor_id),
            date: Set(new_appointment.date),
            time: Set(new_appointment.time),
            reason: Set(new_appointment.reason),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_reference_error(e, "user, pet or doctor"))?;

        Ok(Appointment::from(model))
    }
}
