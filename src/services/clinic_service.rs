//! Clinic service - pets, doctors and appointments.
//!
//! Plain record keeping: required fields are checked at the HTTP layer and
//! dangling references are rejected by the store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    normalize_email, Appointment, Doctor, NewAppointment, NewDoctor, NewPet, Pet,
};
use crate::errors::AppResult;
use crate::infra::ClinicRepository;

#[async_trait]
pub trait ClinicService: Send + Sync {
    async fn list_pets(&self) -> AppResult<Vec<Pet>>;

    async fn create_pet(&self, new_pet: NewPet) -> AppResult<Pet>;

    async fn list_doctors(&self) -> AppResult<Vec<Doctor>>;

    async fn create_doctor(&self, new_doctor: NewDoctor) -> AppResult<Doctor>;

    async fn list_appointments(&self) -> AppResult<Vec<Appointment>>;

    async fn create_appointment(&self, new_appointment: NewAppointment)
        -> AppResult<Appointment>;
}

pub struct ClinicManager {
    records: Arc<dyn ClinicRepository>,
}

impl ClinicManager {
    pub fn new(records: Arc<dyn ClinicRepository>) -> Self {
        Self { records }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl ClinicService for ClinicManager {
    async fn list_pets(&self) -> AppResult<Vec<Pet>> {
        self.records.list_pets().await
    }

    async fn create_pet(&self, new_pet: NewPet) -> AppResult<Pet> {
        let pet = self
            .records
            .create_pet(NewPet {
                name: new_pet.name.trim().to_string(),
                species: new_pet.species.trim().to_string(),
                breed: trimmed(new_pet.breed),
                owner_id: new_pet.owner_id,
            })
            .await?;
        tracing::info!(pet_id = %pet.id, owner_id = %pet.owner_id, "Pet created");
        Ok(pet)
    }

    async fn list_doctors(&self) -> AppResult<Vec<Doctor>> {
        self.records.list_doctors().await
    }

    async fn create_doctor(&self, new_doctor: NewDoctor) -> AppResult<Doctor> {
        let doctor = self
            .records
            .create_doctor(NewDoctor {
                name: new_doctor.name.trim().to_string(),
                specialty: new_doctor.specialty.trim().to_string(),
                phone: trimmed(new_doctor.phone),
                email: trimmed(new_doctor.email).map(|e| normalize_email(&e)),
            })
            .await?;
        tracing::info!(doctor_id = %doctor.id, "Doctor created");
        Ok(doctor)
    }

    async fn list_appointments(&self) -> AppResult<Vec<Appointment>> {
        self.records.list_appointments().await
    }

    async fn create_appointment(
        &self,
        new_appointment: NewAppointment,
    ) -> AppResult<Appointment> {
        let appointment = self
            .records
            .create_appointment(NewAppointment {
                reason: trimmed(new_appointment.reason),
                ..new_appointment
            })
            .await?;
        tracing::info!(
            appointment_id = %appointment.id,
            doctor_id = %appointment.doctor_id,
            "Appointment booked"
        );
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use crate::errors::AppError;
    use crate::infra::MockClinicRepository;

    #[tokio::test]
    async fn test_create_doctor_normalizes_contact_fields() {
        let mut repo = MockClinicRepository::new();
        repo.expect_create_doctor()
            .withf(|d| {
                d.name == "Dr. Elena Ruiz"
                    && d.email.as_deref() == Some("elena@clinic.com")
                    && d.phone.is_none()
            })
            .returning(|d| {
                Ok(Doctor {
                    id: Uuid::new_v4(),
                    name: d.name,
                    specialty: d.specialty,
                    phone: d.phone,
                    email: d.email,
                    status: "active".to_string(),
                    created_at: Utc::now(),
                })
            });

        let doctor = ClinicManager::new(Arc::new(repo))
            .create_doctor(NewDoctor {
                name: " Dr. Elena Ruiz ".into(),
                specialty: "surgery".into(),
                phone: Some("  ".into()),
                email: Some("Elena@Clinic.com".into()),
            })
            .await
            .unwrap();

        assert_eq!(doctor.status, "active");
    }

    #[tokio::test]
    async fn test_create_appointment_with_dangling_reference() {
        let mut repo = MockClinicRepository::new();
        repo.expect_create_appointment()
            .returning(|_| Err(AppError::bad_request("Referenced pet does not exist")));

        let result = ClinicManager::new(Arc::new(repo))
            .create_appointment(NewAppointment {
                user_id: Uuid::new_v4(),
                pet_id: Uuid::new_v4(),
                doctor_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
                time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                reason: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_list_pets_passes_through() {
        let owner = Uuid::new_v4();
        let mut repo = MockClinicRepository::new();
        repo.expect_list_pets().returning(move || {
            Ok(vec![Pet {
                id: Uuid::new_v4(),
                name: "Luna".into(),
                species: "dog".into(),
                breed: None,
                owner_id: owner,
                created_at: Utc::now(),
            }])
        });

        let pets = ClinicManager::new(Arc::new(repo)).list_pets().await.unwrap();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].owner_id, owner);
    }
}
