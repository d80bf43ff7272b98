// 🧑 Patient Entity + Patient Service

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::error::{ClinicError, Result};
use crate::id_allocator::RecordId;
use crate::search::Searchable;
use crate::store::RecordStore;
use crate::validation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub age: i32,
    pub disease: String,
}

impl Patient {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        age: i32,
        disease: impl Into<String>,
    ) -> Self {
        Patient {
            id,
            name: name.into(),
            age,
            disease: disease.into(),
        }
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Age: {}, Disease: {}",
            self.id, self.name, self.age, self.disease
        )
    }
}

impl Searchable for Patient {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.disease.as_str()]
    }

    fn display_key(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// PATIENT SERVICE
// ============================================================================

#[derive(Default)]
pub struct PatientService {
    store: RecordStore<Patient>,
}

impl PatientService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate (id, name, age, disease) and register a patient. Name and
    /// disease are stored trimmed.
    pub fn add_patient(&self, mut patient: Patient) -> Result<()> {
        validation::validate_id(patient.id)?;
        validation::validate_name(&patient.name)?;
        validation::validate_age(patient.age)?;
        validation::validate_disease(&patient.disease)?;
        patient.name = patient.name.trim().to_string();
        patient.disease = patient.disease.trim().to_string();

        let id = patient.id;
        if !self.store.add_unless(patient, |existing| existing.id == id) {
            return Err(ClinicError::DuplicateId {
                entity: "Patient",
                id,
            });
        }

        info!(patient_id = id, "patient registered");
        Ok(())
    }

    pub fn find_patient_by_id(&self, id: RecordId) -> Option<Patient> {
        let found = self.store.find_by_id(|p| Some(p.id), id);
        debug!(patient_id = id, found = found.is_some(), "patient lookup");
        found
    }

    /// Patients whose disease equals `disease`, ignoring case and padding.
    pub fn find_patients_by_disease(&self, disease: &str) -> Vec<Patient> {
        let wanted = disease.trim().to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.store
            .find_by_predicate(|p| p.disease.trim().to_lowercase() == wanted)
    }

    pub fn count_patients(&self) -> usize {
        self.store.len()
    }

    pub fn get_all_patients(&self) -> Vec<Patient> {
        self.store.get_all()
    }

    pub fn search(&self, keyword: &str) -> Vec<Patient> {
        self.store.find_by_predicate(|p| p.matches(keyword))
    }

    pub fn remove_patient(&self, id: RecordId) -> bool {
        match self.find_patient_by_id(id) {
            Some(patient) => {
                let removed = self.store.remove(&patient);
                if removed {
                    info!(patient_id = id, "patient removed");
                }
                removed
            }
            None => false,
        }
    }
}
