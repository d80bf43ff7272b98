// 💾 CSV persistence for doctors and patients
//
// Line formats (no header, no quoting, no escaping):
//   doctors.csv   id,name,age,specialization,fee   (fee with 2 decimals)
//   patients.csv  id,name,age,disease
//
// Blank lines are skipped. A short line, a non-numeric id/age/fee or an
// unknown specialization fails the whole file. A missing file loads as empty.
// Appointments are never written.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::RoundingStrategy;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::entities::bill::fee_to_decimal;
use crate::entities::{Doctor, Patient, Specialization};
use crate::error::{ClinicError, Result};

const DOCTOR_COLUMNS: usize = 5;
const PATIENT_COLUMNS: usize = 4;

// ============================================================================
// LOADING
// ============================================================================

pub fn load_doctors(path: &Path) -> Result<Vec<Doctor>> {
    let doctors = read_rows(path, DOCTOR_COLUMNS, |row| {
        let specialization = match row.text(3) {
            "" => None,
            name => Some(
                Specialization::from_str(name)
                    .map_err(|_| row.malformed(format!("unknown specialization '{}'", name)))?,
            ),
        };

        Ok(Doctor::new(
            row.number(0, "id")?,
            row.text(1),
            row.number(2, "age")?,
            specialization,
            row.number(4, "fee")?,
        ))
    })?;

    info!(path = %path.display(), count = doctors.len(), "doctors loaded");
    Ok(doctors)
}

pub fn load_patients(path: &Path) -> Result<Vec<Patient>> {
    let patients = read_rows(path, PATIENT_COLUMNS, |row| {
        Ok(Patient::new(
            row.number(0, "id")?,
            row.text(1),
            row.number(2, "age")?,
            row.text(3),
        ))
    })?;

    info!(path = %path.display(), count = patients.len(), "patients loaded");
    Ok(patients)
}

/// One parsed line plus where it came from, for error messages.
struct Row<'a> {
    record: &'a StringRecord,
    path: &'a Path,
    line: u64,
}

impl Row<'_> {
    fn text(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or("")
    }

    fn number<N: FromStr>(&self, index: usize, field: &str) -> Result<N> {
        let raw = self.text(index);
        raw.parse()
            .map_err(|_| self.malformed(format!("{} is not a number: '{}'", field, raw)))
    }

    fn malformed(&self, message: String) -> ClinicError {
        ClinicError::Malformed {
            path: self.path.to_path_buf(),
            line: self.line,
            message,
        }
    }
}

fn read_rows<T, F>(path: &Path, columns: usize, parse: F) -> Result<Vec<T>>
where
    F: Fn(&Row<'_>) -> Result<T>,
{
    if !path.exists() {
        debug!(path = %path.display(), "no data file yet");
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row = Row {
            record: &record,
            path,
            line: record.position().map(|p| p.line()).unwrap_or(0),
        };
        if record.len() < columns {
            return Err(row.malformed(format!(
                "expected {} columns, found {}",
                columns,
                record.len()
            )));
        }
        rows.push(parse(&row)?);
    }

    Ok(rows)
}

// ============================================================================
// SAVING
// ============================================================================

/// Overwrite `path` with one line per doctor, in the given order.
pub fn save_doctors(path: &Path, doctors: &[Doctor]) -> Result<()> {
    let mut wtr = writer(path)?;
    for doctor in doctors {
        wtr.write_record([
            doctor.id.to_string(),
            doctor.name.clone(),
            doctor.age.to_string(),
            doctor.specialization_name().to_string(),
            format_fee(doctor.consultation_fee),
        ])?;
    }
    wtr.flush()?;

    info!(path = %path.display(), count = doctors.len(), "doctors saved");
    Ok(())
}

/// Overwrite `path` with one line per patient, in the given order.
pub fn save_patients(path: &Path, patients: &[Patient]) -> Result<()> {
    let mut wtr = writer(path)?;
    for patient in patients {
        wtr.write_record([
            patient.id.to_string(),
            patient.name.clone(),
            patient.age.to_string(),
            patient.disease.clone(),
        ])?;
    }
    wtr.flush()?;

    info!(path = %path.display(), count = patients.len(), "patients saved");
    Ok(())
}

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    Ok(WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_path(path)?)
}

/// Two decimals, half-up.
fn format_fee(fee: f64) -> String {
    match fee_to_decimal(fee) {
        Ok(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Err(_) => format!("{:.2}", fee),
    }
}

// ============================================================================
// TESTS
// ============================================================================
