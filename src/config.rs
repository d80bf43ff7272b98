// ⚙️ Configuration - file locations, tax rate, log filter
//
// Every value comes from a CLI flag, then a MEDITRACK_* environment
// variable, then the default below.

use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::error::{ClinicError, Result};

pub const DEFAULT_DOCTOR_FILE: &str = "doctors.csv";
pub const DEFAULT_PATIENT_FILE: &str = "patients.csv";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// 10%.
pub fn default_tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// 100%.
pub fn max_tax_rate() -> Decimal {
    Decimal::ONE
}

#[derive(Debug, Clone, Args)]
pub struct ClinicConfig {
    /// Directory holding the doctor and patient files
    #[arg(long, env = "MEDITRACK_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Doctor file name, relative to the data directory
    #[arg(long, env = "MEDITRACK_DOCTOR_FILE", default_value = DEFAULT_DOCTOR_FILE)]
    pub doctor_file: String,

    /// Patient file name, relative to the data directory
    #[arg(long, env = "MEDITRACK_PATIENT_FILE", default_value = DEFAULT_PATIENT_FILE)]
    pub patient_file: String,

    /// Tax applied to consultation fees when billing (0.10 = 10%)
    #[arg(long, env = "MEDITRACK_TAX_RATE", default_value = "0.10")]
    pub tax_rate: Decimal,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "MEDITRACK_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl ClinicConfig {
    /// Defaults rooted at `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        ClinicConfig {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn doctor_path(&self) -> PathBuf {
        self.data_dir.join(&self.doctor_file)
    }

    pub fn patient_path(&self) -> PathBuf {
        self.data_dir.join(&self.patient_file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tax_rate.is_sign_negative() && !self.tax_rate.is_zero() {
            return Err(ClinicError::invalid(format!(
                "tax rate must not be negative, got {}",
                self.tax_rate
            )));
        }
        if self.tax_rate > max_tax_rate() {
            return Err(ClinicError::invalid(format!(
                "tax rate must not exceed {}, got {}",
                max_tax_rate(),
                self.tax_rate
            )));
        }
        if self.doctor_file.trim().is_empty() || self.patient_file.trim().is_empty() {
            return Err(ClinicError::invalid("data file names must not be empty"));
        }
        Ok(())
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        ClinicConfig {
            data_dir: PathBuf::from("."),
            doctor_file: DEFAULT_DOCTOR_FILE.to_string(),
            patient_file: DEFAULT_PATIENT_FILE.to_string(),
            tax_rate: default_tax_rate(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: ClinicConfig,
    }

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::default();
        assert_eq!(config.doctor_path(), PathBuf::from("./doctors.csv"));
        assert_eq!(config.patient_path(), PathBuf::from("./patients.csv"));
        assert_eq!(config.tax_rate, Decimal::new(10, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let harness = Harness::try_parse_from([
            "meditrack",
            "--data-dir",
            "/tmp/clinic",
            "--tax-rate",
            "0.18",
            "--doctor-file",
            "staff.csv",
        ])
        .unwrap();

        assert_eq!(
            harness.config.doctor_path(),
            PathBuf::from("/tmp/clinic/staff.csv")
        );
        assert_eq!(harness.config.tax_rate, Decimal::new(18, 2));
    }

    #[test]
    fn test_negative_tax_rate_rejected() {
        let config = ClinicConfig {
            tax_rate: Decimal::new(-5, 2),
            ..ClinicConfig::default()
        };
        assert!(matches!(config.validate(), Err(ClinicError::InvalidInput(_))));
    }

    #[test]
    fn test_tax_rate_upper_bound() {
        let at_limit = ClinicConfig {
            tax_rate: Decimal::ONE,
            ..ClinicConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let harness =
            Harness::try_parse_from(["meditrack", "--tax-rate", "79228162514264337593543950335"])
                .unwrap();
        assert!(matches!(
            harness.config.validate(),
            Err(ClinicError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_in_dir() {
        let config = ClinicConfig::in_dir("/srv/data");
        assert_eq!(config.patient_path(), PathBuf::from("/srv/data/patients.csv"));
    }
}
