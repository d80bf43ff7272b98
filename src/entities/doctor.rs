// 🩺 Doctor Entity + Doctor Service
//
// Identity is the numeric id: two Doctor values with the same id are the
// same doctor, whatever their other fields say.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{ClinicError, Result};
use crate::id_allocator::RecordId;
use crate::search::Searchable;
use crate::store::RecordStore;
use crate::validation;

// ============================================================================
// SPECIALIZATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialization {
    Cardiology,
    Dermatology,
    Neurology,
    Orthopedics,
    Pediatrics,
    GeneralMedicine,
}

impl Specialization {
    pub const ALL: [Specialization; 6] = [
        Specialization::Cardiology,
        Specialization::Dermatology,
        Specialization::Neurology,
        Specialization::Orthopedics,
        Specialization::Pediatrics,
        Specialization::GeneralMedicine,
    ];

    /// Textual name, as written to the doctors file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::Cardiology => "CARDIOLOGY",
            Specialization::Dermatology => "DERMATOLOGY",
            Specialization::Neurology => "NEUROLOGY",
            Specialization::Orthopedics => "ORTHOPEDICS",
            Specialization::Pediatrics => "PEDIATRICS",
            Specialization::GeneralMedicine => "GENERAL_MEDICINE",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialization {
    type Err = ClinicError;

    /// Accepts the textual name in any case; spaces and dashes count as `_`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Specialization::ALL
            .iter()
            .copied()
            .find(|spec| spec.as_str() == normalized)
            .ok_or_else(|| ClinicError::invalid(format!("Unknown specialization: {}", s.trim())))
    }
}

// ============================================================================
// DOCTOR ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: RecordId,
    pub name: String,
    pub age: i32,
    pub specialization: Option<Specialization>,
    pub consultation_fee: f64,
}

impl Doctor {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        age: i32,
        specialization: Option<Specialization>,
        consultation_fee: f64,
    ) -> Self {
        Doctor {
            id,
            name: name.into(),
            age,
            specialization,
            consultation_fee,
        }
    }

    pub fn specialization_name(&self) -> &'static str {
        self.specialization.map(|s| s.as_str()).unwrap_or("")
    }
}

impl PartialEq for Doctor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Doctor {}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Age: {}, Specialization: {}, Fee: {:.2}",
            self.id,
            self.name,
            self.age,
            self.specialization
                .map(|s| s.as_str())
                .unwrap_or("-"),
            self.consultation_fee
        )
    }
}

impl Searchable for Doctor {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.specialization_name()]
    }

    fn display_key(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// DOCTOR SERVICE
// ============================================================================

/// Validating front for the doctor records.
#[derive(Default)]
pub struct DoctorService {
    store: RecordStore<Doctor>,
}

impl DoctorService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a doctor.
    ///
    /// Rules are checked in order (id, name, age, fee); the first violation
    /// is returned as `InvalidInput`. An already-registered id yields
    /// `DuplicateId`. The name is stored trimmed.
    pub fn add_doctor(&self, mut doctor: Doctor) -> Result<()> {
        validation::validate_id(doctor.id)?;
        validation::validate_name(&doctor.name)?;
        validation::validate_age(doctor.age)?;
        validation::validate_consultation_fee(doctor.consultation_fee)?;
        doctor.name = doctor.name.trim().to_string();

        let id = doctor.id;
        if !self.store.add_unless(doctor, |existing| existing.id == id) {
            return Err(ClinicError::DuplicateId {
                entity: "Doctor",
                id,
            });
        }

        info!(doctor_id = id, "doctor registered");
        Ok(())
    }

    pub fn find_doctor_by_id(&self, id: RecordId) -> Option<Doctor> {
        let found = self.store.find_by_id(|d| Some(d.id), id);
        debug!(doctor_id = id, found = found.is_some(), "doctor lookup");
        found
    }

    /// Doctors in the given specialization; `None` matches nobody.
    pub fn find_doctors_by_specialization(
        &self,
        specialization: Option<Specialization>,
    ) -> Vec<Doctor> {
        match specialization {
            Some(spec) => self
                .store
                .find_by_predicate(|d| d.specialization == Some(spec)),
            None => Vec::new(),
        }
    }

    /// Mean consultation fee, or 0 when there are no doctors.
    pub fn get_average_consultation_fee(&self) -> f64 {
        let doctors = self.store.get_all();
        if doctors.is_empty() {
            return 0.0;
        }
        let total: f64 = doctors.iter().map(|d| d.consultation_fee).sum();
        total / doctors.len() as f64
    }

    pub fn count_doctors(&self) -> usize {
        self.store.len()
    }

    pub fn get_all_doctors(&self) -> Vec<Doctor> {
        self.store.get_all()
    }

    pub fn search(&self, keyword: &str) -> Vec<Doctor> {
        self.store.find_by_predicate(|d| d.matches(keyword))
    }

    /// Remove the doctor with `id`. Returns whether one was removed.
    pub fn remove_doctor(&self, id: RecordId) -> bool {
        match self.find_doctor_by_id(id) {
            Some(doctor) => {
                let removed = self.store.remove(&doctor);
                if removed {
                    info!(doctor_id = id, "doctor removed");
                }
                removed
            }
            None => false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn smith() -> Doctor {
        Doctor::new(1, "Smith", 40, Some(Specialization::Cardiology), 100.0)
    }

    #[test]
    fn test_specialization_parse() {
        assert_eq!(
            "CARDIOLOGY".parse::<Specialization>().unwrap(),
            Specialization::Cardiology
        );
        assert_eq!(
            "general medicine".parse::<Specialization>().unwrap(),
            Specialization::GeneralMedicine
        );
        assert!(matches!(
            "ASTROLOGY".parse::<Specialization>(),
            Err(ClinicError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_specialization_serializes_as_text_name() {
        let json = serde_json::to_string(&Specialization::GeneralMedicine).unwrap();
        assert_eq!(json, "\"GENERAL_MEDICINE\"");
    }

    #[test]
    fn test_doctor_equality_by_id() {
        let a = smith();
        let mut b = smith();
        b.name = "Someone Else".to_string();
        b.consultation_fee = 5.0;
        assert_eq!(a, b);

        let c = Doctor::new(2, "Smith", 40, Some(Specialization::Cardiology), 100.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_doctor_display() {
        assert_eq!(
            smith().to_string(),
            "ID: 1, Name: Smith, Age: 40, Specialization: CARDIOLOGY, Fee: 100.00"
        );
        let generalist = Doctor::new(2, "Lee", 50, None, 80.5);
        assert!(generalist.to_string().contains("Specialization: -"));
    }

    #[test]
    fn test_add_and_find_doctor() {
        let service = DoctorService::new();
        service.add_doctor(smith()).unwrap();

        let found = service.find_doctor_by_id(1).unwrap();
        assert_eq!(found.name, "Smith");
        assert_eq!(found.age, 40);
        assert_eq!(found.specialization, Some(Specialization::Cardiology));
        assert_eq!(found.consultation_fee, 100.0);
        assert!(service.find_doctor_by_id(99).is_none());
    }

    #[test]
    fn test_add_doctor_reports_first_violation() {
        let service = DoctorService::new();
        let bad = Doctor::new(1, " ", 0, None, -1.0);

        match service.add_doctor(bad) {
            Err(ClinicError::InvalidInput(msg)) => assert!(msg.contains("Name")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert_eq!(service.count_doctors(), 0);
    }

    #[test]
    fn test_add_doctor_rejects_zero_id() {
        let service = DoctorService::new();
        let result = service.add_doctor(Doctor::new(0, "Smith", 40, None, 100.0));

        assert!(matches!(result, Err(ClinicError::InvalidInput(_))));
        assert_eq!(service.count_doctors(), 0);
    }

    #[test]
    fn test_add_doctor_stores_trimmed_name() {
        let service = DoctorService::new();
        service
            .add_doctor(Doctor::new(1, "  Smith \t", 40, None, 100.0))
            .unwrap();
        assert_eq!(service.find_doctor_by_id(1).unwrap().name, "Smith");
    }

    #[test]
    fn test_add_doctor_rejects_duplicate_id() {
        let service = DoctorService::new();
        service.add_doctor(smith()).unwrap();

        let result = service.add_doctor(Doctor::new(1, "Jones", 35, None, 60.0));
        assert!(matches!(
            result,
            Err(ClinicError::DuplicateId { entity: "Doctor", id: 1 })
        ));
        assert_eq!(service.count_doctors(), 1);
    }

    #[test]
    fn test_find_by_specialization() {
        let service = DoctorService::new();
        service.add_doctor(smith()).unwrap();
        service
            .add_doctor(Doctor::new(2, "Grey", 38, Some(Specialization::Neurology), 120.0))
            .unwrap();
        service
            .add_doctor(Doctor::new(3, "Shepherd", 45, Some(Specialization::Cardiology), 90.0))
            .unwrap();

        let cardio = service.find_doctors_by_specialization(Some(Specialization::Cardiology));
        assert_eq!(cardio.len(), 2);
        assert!(service
            .find_doctors_by_specialization(Some(Specialization::Pediatrics))
            .is_empty());
        assert!(service.find_doctors_by_specialization(None).is_empty());
    }

    #[test]
    fn test_average_fee() {
        let service = DoctorService::new();
        assert_eq!(service.get_average_consultation_fee(), 0.0);

        service.add_doctor(smith()).unwrap();
        service
            .add_doctor(Doctor::new(2, "Grey", 38, None, 50.0))
            .unwrap();
        assert!((service.get_average_consultation_fee() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_search_by_name_or_specialization() {
        let service = DoctorService::new();
        service.add_doctor(smith()).unwrap();
        service
            .add_doctor(Doctor::new(2, "Grey", 38, Some(Specialization::Neurology), 120.0))
            .unwrap();

        assert_eq!(service.search("smi").len(), 1);
        assert_eq!(service.search("neuro")[0].name, "Grey");
        assert!(service.search("").is_empty());
    }

    #[test]
    fn test_remove_doctor() {
        let service = DoctorService::new();
        service.add_doctor(smith()).unwrap();

        assert!(service.remove_doctor(1));
        assert!(!service.remove_doctor(1));
        assert_eq!(service.count_doctors(), 0);
    }

    proptest! {
        #[test]
        fn test_valid_doctor_round_trips(
            id in 1u32..10_000,
            name in "[A-Za-z][A-Za-z ]{0,20}",
            age in 1i32..120,
            fee in 0.01f64..10_000.0,
        ) {
            let service = DoctorService::new();
            service
                .add_doctor(Doctor::new(id, name.clone(), age, Some(Specialization::Dermatology), fee))
                .unwrap();

            let found = service.find_doctor_by_id(id).unwrap();
            prop_assert_eq!(found.name.as_str(), name.trim());
            prop_assert_eq!(found.age, age);
            prop_assert_eq!(found.specialization, Some(Specialization::Dermatology));
            prop_assert_eq!(found.consultation_fee, fee);
        }

        #[test]
        fn test_invalid_doctor_leaves_store_unchanged(
            age in -50i32..=0,
            fee in -100.0f64..=0.0,
        ) {
            let service = DoctorService::new();
            service.add_doctor(smith()).unwrap();

            let by_age = service.add_doctor(Doctor::new(2, "Valid", age, None, 10.0));
            let by_fee = service.add_doctor(Doctor::new(3, "Valid", 30, None, fee));
            let by_name = service.add_doctor(Doctor::new(4, "", 30, None, 10.0));

            prop_assert!(matches!(by_age, Err(ClinicError::InvalidInput(_))));
            prop_assert!(matches!(by_fee, Err(ClinicError::InvalidInput(_))));
            prop_assert!(matches!(by_name, Err(ClinicError::InvalidInput(_))));
            prop_assert_eq!(service.count_doctors(), 1);
        }
    }
}
