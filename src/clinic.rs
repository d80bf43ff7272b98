// 🏥 Clinic - wires the services, the id allocator and the CSV files
//
// Startup sequence:
//   1. load doctors, then patients
//   2. push every record through the validating add path (bad ones are
//      logged and skipped)
//   3. raise the allocator past every accepted id
//
// Clean exit writes doctors and patients back, except a file that failed to
// load: it keeps its on-disk contents. Appointments live only in memory.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ClinicConfig;
use crate::entities::{
    Appointment, AppointmentService, Doctor, DoctorService, Patient, PatientService,
};
use crate::error::{ClinicError, Result};
use crate::id_allocator::{IdAllocator, RecordId};
use crate::persistence;

/// What startup managed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub doctors_loaded: usize,
    pub patients_loaded: usize,
    /// Records read from disk but rejected by validation or as duplicates.
    pub skipped: Vec<String>,
    /// Files that could not be read at all, with the reason.
    pub failed_files: Vec<String>,
}

pub struct Clinic {
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub appointments: AppointmentService,
    ids: Arc<IdAllocator>,
    config: ClinicConfig,
    unreadable: Vec<PathBuf>,
}

impl Clinic {
    /// Empty clinic with its own allocator.
    pub fn new(config: ClinicConfig) -> Self {
        Self::with_allocator(config, Arc::new(IdAllocator::new()))
    }

    pub fn with_allocator(config: ClinicConfig, ids: Arc<IdAllocator>) -> Self {
        Clinic {
            doctors: DoctorService::new(),
            patients: PatientService::new(),
            appointments: AppointmentService::new(config.tax_rate),
            ids,
            config,
            unreadable: Vec::new(),
        }
    }

    /// Build a clinic from the configured data files.
    pub fn bootstrap(config: ClinicConfig) -> Result<(Self, BootstrapReport)> {
        config.validate()?;
        let mut clinic = Self::new(config);
        let mut report = BootstrapReport::default();

        let doctor_path = clinic.config.doctor_path();
        match persistence::load_doctors(&doctor_path) {
            Ok(doctors) => {
                for doctor in doctors {
                    let id = doctor.id;
                    match clinic.doctors.add_doctor(doctor) {
                        Ok(()) => {
                            clinic.ids.ensure_at_least(id);
                            report.doctors_loaded += 1;
                        }
                        Err(err) => {
                            warn!(doctor_id = id, error = %err, "skipped doctor from file");
                            report.skipped.push(format!("doctor {}: {}", id, err));
                        }
                    }
                }
            }
            Err(err) => {
                warn!(path = %doctor_path.display(), error = %err, "failed to load doctors");
                report.failed_files.push(err.to_string());
                clinic.unreadable.push(doctor_path);
            }
        }

        let patient_path = clinic.config.patient_path();
        match persistence::load_patients(&patient_path) {
            Ok(patients) => {
                for patient in patients {
                    let id = patient.id;
                    match clinic.patients.add_patient(patient) {
                        Ok(()) => {
                            clinic.ids.ensure_at_least(id);
                            report.patients_loaded += 1;
                        }
                        Err(err) => {
                            warn!(patient_id = id, error = %err, "skipped patient from file");
                            report.skipped.push(format!("patient {}: {}", id, err));
                        }
                    }
                }
            }
            Err(err) => {
                warn!(path = %patient_path.display(), error = %err, "failed to load patients");
                report.failed_files.push(err.to_string());
                clinic.unreadable.push(patient_path);
            }
        }

        info!(
            doctors = report.doctors_loaded,
            patients = report.patients_loaded,
            skipped = report.skipped.len(),
            next_id = clinic.ids.current().saturating_add(1),
            "clinic bootstrapped"
        );
        Ok((clinic, report))
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    pub fn ids(&self) -> &Arc<IdAllocator> {
        &self.ids
    }

    pub fn next_id(&self) -> Result<RecordId> {
        self.ids.generate_id()
    }

    /// Data files that failed to load at startup; `save` leaves them alone.
    pub fn unsaved_files(&self) -> &[PathBuf] {
        &self.unreadable
    }

    /// Register a doctor under a freshly allocated id.
    pub fn register_doctor(&self, mut doctor: Doctor) -> Result<RecordId> {
        doctor.id = self.next_id()?;
        let id = doctor.id;
        self.doctors.add_doctor(doctor)?;
        Ok(id)
    }

    /// Register a patient under a freshly allocated id.
    pub fn register_patient(&self, mut patient: Patient) -> Result<RecordId> {
        patient.id = self.next_id()?;
        let id = patient.id;
        self.patients.add_patient(patient)?;
        Ok(id)
    }

    /// Resolve both parties and book under a fresh id.
    ///
    /// The appointment keeps copies of the patient and doctor as they are now.
    pub fn book_appointment(
        &self,
        patient_id: RecordId,
        doctor_id: RecordId,
        date: NaiveDate,
    ) -> Result<Appointment> {
        let patient = self
            .patients
            .find_patient_by_id(patient_id)
            .ok_or(ClinicError::NotFound {
                entity: "Patient",
                id: patient_id,
            })?;
        let doctor = self
            .doctors
            .find_doctor_by_id(doctor_id)
            .ok_or(ClinicError::NotFound {
                entity: "Doctor",
                id: doctor_id,
            })?;

        let id = self.next_id()?;
        self.appointments.book_appointment(id, patient, doctor, date)
    }

    /// Overwrite both data files with the current doctors and patients.
    ///
    /// A file listed in `unsaved_files` is skipped so its unread records
    /// are not replaced.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.config.data_dir)?;

        let doctor_path = self.config.doctor_path();
        if self.writable(&doctor_path) {
            persistence::save_doctors(&doctor_path, &self.doctors.get_all_doctors())?;
        }
        let patient_path = self.config.patient_path();
        if self.writable(&patient_path) {
            persistence::save_patients(&patient_path, &self.patients.get_all_patients())?;
        }
        Ok(())
    }

    fn writable(&self, path: &Path) -> bool {
        if self.unreadable.iter().any(|p| p == path) {
            warn!(path = %path.display(), "not saving a file that failed to load");
            return false;
        }
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================
