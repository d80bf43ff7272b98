use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;

use meditrack::{logging, Clinic, ClinicConfig, Menu};

/// Clinic console: doctors, patients, appointments and bills.
#[derive(Parser)]
#[command(name = "meditrack", version)]
struct Cli {
    #[command(flatten)]
    config: ClinicConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Print the stored doctors
    Doctors {
        #[arg(long)]
        json: bool,
    },
    /// Print the stored patients
    Patients {
        #[arg(long)]
        json: bool,
    },
    /// Browse the stored records in a terminal UI
    #[cfg(feature = "tui")]
    Browse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.config.log_filter);

    let data_dir = cli.config.data_dir.display().to_string();
    let (clinic, report) = Clinic::bootstrap(cli.config)
        .with_context(|| format!("failed to start clinic in {}", data_dir))?;

    for skipped in &report.skipped {
        eprintln!("Skipped invalid record from CSV: {}", skipped);
    }
    for failed in &report.failed_files {
        eprintln!("Failed to load data file: {}", failed);
    }

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => run_menu(&clinic)?,
        Command::Doctors { json } => {
            let doctors = clinic.doctors.get_all_doctors();
            if json {
                println!("{}", serde_json::to_string_pretty(&doctors)?);
            } else {
                for doctor in &doctors {
                    println!("{}", doctor);
                }
            }
        }
        Command::Patients { json } => {
            let patients = clinic.patients.get_all_patients();
            if json {
                println!("{}", serde_json::to_string_pretty(&patients)?);
            } else {
                for patient in &patients {
                    println!("{}", patient);
                }
            }
        }
        #[cfg(feature = "tui")]
        Command::Browse => {
            let mut app = meditrack::ui::App::from_clinic(&clinic);
            meditrack::ui::run_ui(&mut app)?;
        }
    }

    Ok(())
}

fn run_menu(clinic: &Clinic) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(clinic, stdin.lock(), stdout.lock())
        .run()
        .context("console I/O failed")
}
