//! Shared in-memory fakes for integration tests.
//!
//! The fake stores enforce the same contract as the SeaORM stores (unique
//! email, `NotFound` on missing rows) without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use vet_clinic_api::config::{AuthSettings, HashingSettings};
use vet_clinic_api::domain::{
    Appointment, Argon2Hasher, Doctor, HashedPassword, NewAppointment, NewDoctor, NewPet, NewUser,
    Pet, User, UserChanges, UserCredentials, UserRole, UserStatus,
};
use vet_clinic_api::errors::{AppError, AppResult};
use vet_clinic_api::infra::{ClinicRepository, UserRepository};
use vet_clinic_api::services::{Authenticator, ClinicManager, JwtIssuer, UserManager};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Cheap Argon2 parameters so tests stay fast.
pub fn fast_hasher() -> Arc<Argon2Hasher> {
    Arc::new(
        Argon2Hasher::new(HashingSettings {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid test hashing params"),
    )
}

pub fn test_settings() -> AuthSettings {
    AuthSettings::new(TEST_SECRET, "24h").expect("valid test auth settings")
}

pub fn test_issuer() -> Arc<JwtIssuer> {
    Arc::new(JwtIssuer::new(&test_settings()))
}

#[derive(Clone)]
struct StoredUser {
    user: User,
    password_hash: HashedPassword,
}

/// In-memory credential store.
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<StoredUser>>,
}

impl InMemoryUsers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Change a user's role directly, as an operator would in the database.
    pub fn set_role(&self, id: Uuid, role: UserRole) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.user.id == id) {
            row.user.role = role;
        }
    }

    pub fn stored_hash(&self, id: Uuid) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.password_hash.as_str().to_string())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.find_by_id_with_secret(id).await?.map(|c| c.user))
    }

    async fn find_by_id_with_secret(&self, id: Uuid) -> AppResult<Option<UserCredentials>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.user.id == id).map(|r| UserCredentials {
            user: r.user.clone(),
            password_hash: r.password_hash.clone(),
        }))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_by_email_with_secret(email).await?.map(|c| c.user))
    }

    async fn find_by_email_with_secret(
        &self,
        email: &str,
    ) -> AppResult<Option<UserCredentials>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.user.email == email)
            .map(|r| UserCredentials {
                user: r.user.clone(),
                password_hash: r.password_hash.clone(),
            }))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.user.email == new_user.email) {
            return Err(AppError::conflict("Email"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            role: UserRole::Client,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        rows.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &changes.email {
            if rows.iter().any(|r| &r.user.email == email && r.user.id != id) {
                return Err(AppError::conflict("Email"));
            }
        }

        let row = rows
            .iter_mut()
            .find(|r| r.user.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(name) = changes.name {
            row.user.name = name;
        }
        if let Some(email) = changes.email {
            row.user.email = email;
        }
        if let Some(phone) = changes.phone {
            row.user.phone = phone;
        }
        if let Some(hash) = changes.password_hash {
            row.password_hash = hash;
        }
        if let Some(role) = changes.role {
            row.user.role = role;
        }
        if let Some(status) = changes.status {
            row.user.status = status;
        }
        row.user.updated_at = Utc::now();

        Ok(row.user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.user.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().map(|r| r.user.clone()).collect())
    }
}

/// In-memory pets, doctors and appointments with reference checks.
pub struct InMemoryClinic {
    users: Arc<InMemoryUsers>,
    pets: Mutex<Vec<Pet>>,
    doctors: Mutex<Vec<Doctor>>,
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryClinic {
    pub fn new(users: Arc<InMemoryUsers>) -> Arc<Self> {
        Arc::new(Self {
            users,
            pets: Mutex::new(Vec::new()),
            doctors: Mutex::new(Vec::new()),
            appointments: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ClinicRepository for InMemoryClinic {
    async fn list_pets(&self) -> AppResult<Vec<Pet>> {
        Ok(self.pets.lock().unwrap().clone())
    }

    async fn create_pet(&self, new_pet: NewPet) -> AppResult<Pet> {
        if self.users.find_by_id(new_pet.owner_id).await?.is_none() {
            return Err(AppError::bad_request("Referenced owner does not exist"));
        }
        let pet = Pet {
            id: Uuid::new_v4(),
            name: new_pet.name,
            species: new_pet.species,
            breed: new_pet.breed,
            owner_id: new_pet.owner_id,
            created_at: Utc::now(),
        };
        self.pets.lock().unwrap().push(pet.clone());
        Ok(pet)
    }

    async fn list_doctors(&self) -> AppResult<Vec<Doctor>> {
        Ok(self.doctors.lock().unwrap().clone())
    }

    async fn create_doctor(&self, new_doctor: NewDoctor) -> AppResult<Doctor> {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: new_doctor.name,
            specialty: new_doctor.specialty,
            phone: new_doctor.phone,
            email: new_doctor.email,
            status: "active".to_string(),
            created_at: Utc::now(),
        };
        self.doctors.lock().unwrap().push(doctor.clone());
        Ok(doctor)
    }

    async fn list_appointments(&self) -> AppResult<Vec<Appointment>> {
        Ok(self.appointments.lock().unwrap().clone())
    }

    async fn create_appointment(
        &self,
        new_appointment: NewAppointment,
    ) -> AppResult<Appointment> {
        let pet_known = self
            .pets
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.id == new_appointment.pet_id);
        let doctor_known = self
            .doctors
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.id == new_appointment.doctor_id);
        let user_known = self.users.find_by_id(new_appointment.user_id).await?.is_some();
        if !(pet_known && doctor_known && user_known) {
            return Err(AppError::bad_request(
                "Referenced user, pet or doctor does not exist",
            ));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: new_appointment.user_id,
            pet_id: new_appointment.pet_id,
            doctor_id: new_appointment.doctor_id,
            date: new_appointment.date,
            time: new_appointment.time,
            reason: new_appointment.reason,
            created_at: Utc::now(),
        };
        self.appointments.lock().unwrap().push(appointment.clone());
        Ok(appointment)
    }
}

/// Real services wired over the in-memory stores.
pub struct TestServices {
    pub users: Arc<InMemoryUsers>,
    pub auth: Arc<Authenticator>,
    pub user_admin: Arc<UserManager>,
    pub clinic: Arc<ClinicManager>,
}

pub fn test_services() -> TestServices {
    let users = InMemoryUsers::new();
    let records = InMemoryClinic::new(users.clone());

    TestServices {
        auth: Arc::new(Authenticator::new(
            users.clone(),
            fast_hasher(),
            test_issuer(),
        )),
        user_admin: Arc::new(UserManager::new(users.clone())),
        clinic: Arc::new(ClinicManager::new(records)),
        users,
    }
}
