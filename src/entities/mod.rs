// Entity models and their domain services
//
// Each entity file carries:
// - the value type (id + fields)
// - its service: validation on insert, lookups over a RecordStore snapshot

pub mod appointment;
pub mod bill;
pub mod doctor;
pub mod patient;

pub use appointment::{Appointment, AppointmentService, AppointmentStatus};
pub use bill::{Bill, BillSummary};
pub use doctor::{Doctor, DoctorService, Specialization};
pub use patient::{Patient, PatientService};
