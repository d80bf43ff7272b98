// 📅 Appointment Entity + Appointment Service
//
// An appointment holds its own copies of the patient and doctor as they
// were at booking time. Later edits to the registries do not reach it.
//
// Status moves only along the transition table:
//
//   PENDING   -> CONFIRMED | CANCELLED
//   CONFIRMED -> CANCELLED
//   CANCELLED -> (terminal)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::entities::{Bill, BillSummary, Doctor, Patient};
use crate::error::{ClinicError, Result};
use crate::id_allocator::RecordId;
use crate::store::RecordStore;
use crate::validation;

// ============================================================================
// APPOINTMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == AppointmentStatus::Cancelled
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// APPOINTMENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub id: RecordId,
    pub patient: Patient,
    pub doctor: Doctor,
    pub date: NaiveDate,
    status: AppointmentStatus,
}

impl Appointment {
    /// New appointment in PENDING.
    pub fn new(id: RecordId, patient: Patient, doctor: Doctor, date: NaiveDate) -> Self {
        Appointment {
            id,
            patient,
            doctor,
            date,
            status: AppointmentStatus::Pending,
        }
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn confirm(&mut self) -> Result<()> {
        self.transition(AppointmentStatus::Confirmed)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.transition(AppointmentStatus::Cancelled)
    }

    fn transition(&mut self, next: AppointmentStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(ClinicError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appointment ID: {}, Patient: {}, Doctor: {}, Date: {}, Status: {}",
            self.id, self.patient.name, self.doctor.name, self.date, self.status
        )
    }
}

// ============================================================================
// APPOINTMENT SERVICE
// ============================================================================

pub struct AppointmentService {
    store: RecordStore<Appointment>,
    tax_rate: Decimal,
}

impl AppointmentService {
    pub fn new(tax_rate: Decimal) -> Self {
        AppointmentService {
            store: RecordStore::new(),
            tax_rate,
        }
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Book a PENDING appointment.
    ///
    /// Whether the patient and doctor are registered is the caller's
    /// concern; only the appointment id is checked for uniqueness.
    pub fn book_appointment(
        &self,
        id: RecordId,
        patient: Patient,
        doctor: Doctor,
        date: NaiveDate,
    ) -> Result<Appointment> {
        validation::validate_id(id)?;
        let appointment = Appointment::new(id, patient, doctor, date);
        if !self
            .store
            .add_unless(appointment.clone(), |existing| existing.id == id)
        {
            return Err(ClinicError::DuplicateId {
                entity: "Appointment",
                id,
            });
        }

        info!(
            appointment_id = id,
            patient_id = appointment.patient.id,
            doctor_id = appointment.doctor.id,
            %date,
            "appointment booked"
        );
        Ok(appointment)
    }

    pub fn cancel_appointment(&self, id: RecordId) -> Result<()> {
        self.apply(id, Appointment::cancel)?;
        info!(appointment_id = id, "appointment cancelled");
        Ok(())
    }

    pub fn confirm_appointment(&self, id: RecordId) -> Result<()> {
        self.apply(id, Appointment::confirm)?;
        info!(appointment_id = id, "appointment confirmed");
        Ok(())
    }

    fn apply(&self, id: RecordId, change: fn(&mut Appointment) -> Result<()>) -> Result<()> {
        let outcome = self
            .store
            .update_by_id(|a| Some(a.id), id, change)
            .ok_or_else(|| ClinicError::appointment_not_found(id))?;

        if let Err(err) = &outcome {
            warn!(appointment_id = id, error = %err, "status change rejected");
        }
        outcome
    }

    /// Tax-inclusive bill for an appointment. Read-only.
    pub fn generate_bill(&self, id: RecordId) -> Result<BillSummary> {
        let appointment = self
            .find_appointment_by_id(id)
            .ok_or_else(|| ClinicError::appointment_not_found(id))?;

        Bill::from_appointment(&appointment)?.generate_summary(self.tax_rate)
    }

    pub fn find_appointment_by_id(&self, id: RecordId) -> Option<Appointment> {
        self.store.find_by_id(|a| Some(a.id), id)
    }

    /// Snapshot of every appointment in booking order.
    pub fn get_all_appointments(&self) -> Vec<Appointment> {
        self.store.get_all()
    }

    /// One display line per appointment.
    pub fn display_appointments(&self) -> Vec<String> {
        self.store
            .get_all()
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    pub fn find_appointments_by_status(&self, status: AppointmentStatus) -> Vec<Appointment> {
        self.store.find_by_predicate(|a| a.status == status)
    }

    pub fn count_appointments(&self) -> usize {
        self.store.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
