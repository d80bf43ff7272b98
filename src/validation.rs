// ✅ Field validation - pure checks run by the services before any insert
//
// Each check returns `InvalidInput` naming the violated rule. The store
// itself never sees these rules.

use crate::error::{ClinicError, Result};
use crate::id_allocator::RecordId;

/// Identifiers are positive; 0 is never issued by the allocator.
pub fn validate_id(id: RecordId) -> Result<()> {
    if id == 0 {
        return Err(ClinicError::invalid("ID must be a positive integer"));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ClinicError::invalid("Name must not be empty"));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<()> {
    if age <= 0 {
        return Err(ClinicError::invalid(format!(
            "Age must be greater than 0, got {}",
            age
        )));
    }
    Ok(())
}

/// Fee must be a finite number above zero.
pub fn validate_consultation_fee(fee: f64) -> Result<()> {
    if !fee.is_finite() || fee <= 0.0 {
        return Err(ClinicError::invalid(format!(
            "Consultation fee must be positive, got {}",
            fee
        )));
    }
    Ok(())
}

pub fn validate_disease(disease: &str) -> Result<()> {
    if disease.trim().is_empty() {
        return Err(ClinicError::invalid("Disease must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        match result {
            Err(ClinicError::InvalidInput(msg)) => msg,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_inputs() {
        assert!(validate_name("Alice").is_ok());
        assert!(validate_age(30).is_ok());
        assert!(validate_consultation_fee(50.0).is_ok());
        assert!(validate_disease("Flu").is_ok());
    }

    #[test]
    fn test_zero_id_rejected() {
        assert!(message(validate_id(0)).contains("ID"));
        assert!(validate_id(1).is_ok());
        assert!(validate_id(RecordId::MAX).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(message(validate_name("  ")).contains("Name"));
        assert!(validate_name("").is_err());
    }

    #[test]
    fn test_non_positive_age_rejected() {
        assert!(message(validate_age(0)).contains("Age"));
        assert!(validate_age(-4).is_err());
    }

    #[test]
    fn test_bad_fee_rejected() {
        assert!(message(validate_consultation_fee(-10.0)).contains("fee"));
        assert!(validate_consultation_fee(0.0).is_err());
        assert!(validate_consultation_fee(f64::NAN).is_err());
        assert!(validate_consultation_fee(f64::INFINITY).is_err());
    }

    #[test]
    fn test_blank_disease_rejected() {
        assert!(message(validate_disease("")).contains("Disease"));
        assert!(validate_disease("\t").is_err());
    }
}
