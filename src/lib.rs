// MediTrack - Core Library
// Exposes the record store, domain services and CSV layer for the CLI and tests

pub mod error;
pub mod id_allocator;
pub mod store;
pub mod validation;
pub mod search;
pub mod entities;     // Doctor, Patient, Appointment, Bill
pub mod persistence;  // doctors.csv / patients.csv
pub mod config;
pub mod logging;
pub mod clinic;       // Services + allocator + files, wired together
pub mod menu;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use error::{ClinicError, Result};
pub use id_allocator::{IdAllocator, RecordId};
pub use store::RecordStore;
pub use search::Searchable;
pub use entities::{
    Appointment, AppointmentService, AppointmentStatus,
    Bill, BillSummary,
    Doctor, DoctorService, Specialization,
    Patient, PatientService,
};
pub use persistence::{load_doctors, load_patients, save_doctors, save_patients};
pub use config::ClinicConfig;
pub use clinic::{BootstrapReport, Clinic};
pub use menu::Menu;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
