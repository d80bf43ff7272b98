// 🧾 Bill + BillSummary - derived on demand, never stored
//
// Total = fee × (1 + tax rate), rounded half-up to 2 decimal places.
// Arithmetic is done in Decimal so the rounding is exact.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::entities::Appointment;
use crate::error::{ClinicError, Result};

/// Billing data copied out of an appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    patient_name: String,
    doctor_name: String,
    consultation_fee: f64,
    appointment_date: NaiveDate,
}

impl Bill {
    pub fn from_appointment(appointment: &Appointment) -> Result<Self> {
        Ok(Bill {
            patient_name: non_blank(&appointment.patient.name, "patient name")?,
            doctor_name: non_blank(&appointment.doctor.name, "doctor name")?,
            consultation_fee: appointment.doctor.consultation_fee,
            appointment_date: appointment.date,
        })
    }

    /// Summary with the tax-inclusive total.
    pub fn generate_summary(&self, tax_rate: Decimal) -> Result<BillSummary> {
        let fee = fee_to_decimal(self.consultation_fee)?;
        let total = fee
            .checked_mul(tax_rate)
            .and_then(|tax| fee.checked_add(tax))
            .ok_or_else(|| ClinicError::invalid("bill total out of range"))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        BillSummary::new(
            self.patient_name.clone(),
            self.doctor_name.clone(),
            total,
            self.appointment_date,
        )
    }
}

fn non_blank(value: &str, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ClinicError::invalid(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

// Shortest round-trip text form, so 99.995 becomes exactly 99.995.
pub(crate) fn fee_to_decimal(fee: f64) -> Result<Decimal> {
    if !fee.is_finite() {
        return Err(ClinicError::invalid(format!("fee is not finite: {}", fee)));
    }
    Decimal::from_str(&fee.to_string())
        .map_err(|e| ClinicError::invalid(format!("fee {} out of range: {}", fee, e)))
}

// ============================================================================
// BILL SUMMARY
// ============================================================================

/// Immutable result of billing one appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillSummary {
    patient_name: String,
    doctor_name: String,
    total_amount: Decimal,
    appointment_date: NaiveDate,
}

impl BillSummary {
    /// Fails when a name is blank or the total is negative.
    pub fn new(
        patient_name: String,
        doctor_name: String,
        total_amount: Decimal,
        appointment_date: NaiveDate,
    ) -> Result<Self> {
        let patient_name = non_blank(&patient_name, "patient name")?;
        let doctor_name = non_blank(&doctor_name, "doctor name")?;
        if total_amount.is_sign_negative() && !total_amount.is_zero() {
            return Err(ClinicError::invalid(format!(
                "bill total must not be negative, got {}",
                total_amount
            )));
        }

        Ok(BillSummary {
            patient_name,
            doctor_name,
            total_amount,
            appointment_date,
        })
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn doctor_name(&self) -> &str {
        &self.doctor_name
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn appointment_date(&self) -> NaiveDate {
        self.appointment_date
    }
}

impl fmt::Display for BillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bill: Patient: {}, Doctor: {}, Date: {}, Total: {:.2}",
            self.patient_name, self.doctor_name, self.appointment_date, self.total_amount
        )
    }
}
