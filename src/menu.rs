// 📋 Interactive menu - line-oriented console front end
//
// Reads choices and field values one line at a time from any BufRead and
// writes prompts and results to any Write, so a whole session can be
// scripted in tests. Service errors are printed and the loop goes on.
// Exit, or running out of input, saves doctors and patients.

use chrono::{Local, NaiveDate};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::clinic::Clinic;
use crate::entities::{Doctor, Patient, Specialization};
use crate::id_allocator::RecordId;

const OPTIONS: &[(u32, &str)] = &[
    (1, "Add Doctor"),
    (2, "Add Patient"),
    (3, "Book Appointment"),
    (4, "View Doctors"),
    (5, "View Patients"),
    (6, "View Appointments"),
    (7, "Exit"),
    (8, "Generate Bill"),
    (9, "Cancel Appointment"),
    (10, "Confirm Appointment"),
    (11, "Doctors by Specialization"),
    (12, "Search"),
    (13, "Doctor Statistics"),
];

#[cfg(feature = "tui")]
const BROWSE: (u32, &str) = (14, "Browse Records");

fn last_option() -> u32 {
    if cfg!(feature = "tui") {
        14
    } else {
        13
    }
}

/// What the loop should do after one choice.
enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    clinic: &'a Clinic,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(clinic: &'a Clinic, input: R, output: W) -> Self {
        Menu {
            clinic,
            input,
            output,
        }
    }

    /// Run until Exit or end of input, then save.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                break;
            };

            let choice = match line.parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    writeln!(
                        self.output,
                        "Invalid input. Please enter a number between 1 and {}.",
                        last_option()
                    )?;
                    continue;
                }
            };

            if let Flow::Exit = self.dispatch(choice)? {
                break;
            }
        }

        self.save_and_exit()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n===== MEDI TRACK MENU =====")?;
        for (number, label) in OPTIONS {
            writeln!(self.output, "{}. {}", number, label)?;
        }
        #[cfg(feature = "tui")]
        writeln!(self.output, "{}. {}", BROWSE.0, BROWSE.1)?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()
    }

    fn dispatch(&mut self, choice: u32) -> io::Result<Flow> {
        match choice {
            1 => self.add_doctor()?,
            2 => self.add_patient()?,
            3 => self.book_appointment()?,
            4 => self.view_doctors()?,
            5 => self.view_patients()?,
            6 => self.view_appointments()?,
            7 => return Ok(Flow::Exit),
            8 => self.generate_bill()?,
            9 => self.cancel_appointment()?,
            10 => self.confirm_appointment()?,
            11 => self.doctors_by_specialization()?,
            12 => self.search()?,
            13 => self.doctor_statistics()?,
            #[cfg(feature = "tui")]
            14 => self.browse()?,
            _ => writeln!(self.output, "Invalid choice!")?,
        }
        Ok(Flow::Continue)
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    fn add_doctor(&mut self) -> io::Result<()> {
        let name = self.prompt("Enter Name: ")?;
        let Some(age) = self.prompt_number::<i32>("Enter Age: ", "Invalid age. Aborting add doctor.")? else {
            return Ok(());
        };
        let Some(fee) = self.prompt_number::<f64>("Enter Fee: ", "Invalid fee. Aborting add doctor.")? else {
            return Ok(());
        };
        let Some(specialization) = self.prompt_specialization()? else {
            return Ok(());
        };

        match self
            .clinic
            .register_doctor(Doctor::new(0, name, age, specialization, fee))
        {
            Ok(id) => writeln!(self.output, "Doctor added successfully with ID: {}", id),
            Err(err) => writeln!(self.output, "Error adding doctor: {}", err),
        }
    }

    fn add_patient(&mut self) -> io::Result<()> {
        let name = self.prompt("Enter Name: ")?;
        let Some(age) = self.prompt_number::<i32>("Enter Age: ", "Invalid age. Aborting add patient.")? else {
            return Ok(());
        };
        let disease = self.prompt("Enter Disease: ")?;

        match self
            .clinic
            .register_patient(Patient::new(0, name, age, disease))
        {
            Ok(id) => writeln!(self.output, "Patient added successfully with ID: {}", id),
            Err(err) => writeln!(self.output, "Error adding patient: {}", err),
        }
    }

    // ========================================================================
    // APPOINTMENTS
    // ========================================================================

    fn book_appointment(&mut self) -> io::Result<()> {
        let Some(patient_id) = self.prompt_id("Enter Patient ID: ", "Invalid patient ID.")? else {
            return Ok(());
        };
        let Some(doctor_id) = self.prompt_id("Enter Doctor ID: ", "Invalid doctor ID.")? else {
            return Ok(());
        };
        let Some(date) = self.prompt_date()? else {
            return Ok(());
        };

        match self.clinic.book_appointment(patient_id, doctor_id, date) {
            Ok(appointment) => {
                writeln!(self.output, "Appointment booked with ID: {}", appointment.id)
            }
            Err(err) => writeln!(self.output, "Could not book appointment: {}", err),
        }
    }

    fn generate_bill(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter Appointment ID: ", "Invalid appointment ID.")? else {
            return Ok(());
        };

        match self.clinic.appointments.generate_bill(id) {
            Ok(summary) => writeln!(self.output, "{}", summary),
            Err(err) => writeln!(self.output, "Could not generate bill: {}", err),
        }
    }

    fn cancel_appointment(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter Appointment ID: ", "Invalid appointment ID.")? else {
            return Ok(());
        };

        match self.clinic.appointments.cancel_appointment(id) {
            Ok(()) => writeln!(self.output, "Appointment {} cancelled.", id),
            Err(err) => writeln!(self.output, "Could not cancel appointment: {}", err),
        }
    }

    fn confirm_appointment(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter Appointment ID: ", "Invalid appointment ID.")? else {
            return Ok(());
        };

        match self.clinic.appointments.confirm_appointment(id) {
            Ok(()) => writeln!(self.output, "Appointment {} confirmed.", id),
            Err(err) => writeln!(self.output, "Could not confirm appointment: {}", err),
        }
    }

    // ========================================================================
    // LISTINGS + QUERIES
    // ========================================================================

    fn view_doctors(&mut self) -> io::Result<()> {
        let doctors = self.clinic.doctors.get_all_doctors();
        self.print_all(&doctors, "No doctors registered.")
    }

    fn view_patients(&mut self) -> io::Result<()> {
        let patients = self.clinic.patients.get_all_patients();
        self.print_all(&patients, "No patients registered.")
    }

    fn view_appointments(&mut self) -> io::Result<()> {
        let lines = self.clinic.appointments.display_appointments();
        self.print_all(&lines, "No appointments booked.")
    }

    fn doctors_by_specialization(&mut self) -> io::Result<()> {
        let Some(specialization) = self.prompt_specialization()? else {
            return Ok(());
        };
        let doctors = self
            .clinic
            .doctors
            .find_doctors_by_specialization(specialization);
        self.print_all(&doctors, "No matching doctors.")
    }

    fn search(&mut self) -> io::Result<()> {
        let keyword = self.prompt("Enter keyword: ")?;
        let doctors = self.clinic.doctors.search(&keyword);
        let patients = self.clinic.patients.search(&keyword);

        writeln!(self.output, "Doctors:")?;
        self.print_all(&doctors, "  (none)")?;
        writeln!(self.output, "Patients:")?;
        self.print_all(&patients, "  (none)")
    }

    fn doctor_statistics(&mut self) -> io::Result<()> {
        let doctors = &self.clinic.doctors;
        writeln!(self.output, "Doctors: {}", doctors.count_doctors())?;
        writeln!(
            self.output,
            "Average consultation fee: {:.2}",
            doctors.get_average_consultation_fee()
        )?;
        for specialization in Specialization::ALL {
            let count = doctors
                .find_doctors_by_specialization(Some(specialization))
                .len();
            if count > 0 {
                writeln!(self.output, "  {}: {}", specialization, count)?;
            }
        }
        Ok(())
    }

    #[cfg(feature = "tui")]
    fn browse(&mut self) -> io::Result<()> {
        let mut app = crate::ui::App::from_clinic(self.clinic);
        if let Err(err) = crate::ui::run_ui(&mut app) {
            writeln!(self.output, "Browser failed: {}", err)?;
        }
        Ok(())
    }

    fn print_all<T: std::fmt::Display>(&mut self, items: &[T], empty: &str) -> io::Result<()> {
        if items.is_empty() {
            return writeln!(self.output, "{}", empty);
        }
        for item in items {
            writeln!(self.output, "{}", item)?;
        }
        Ok(())
    }

    fn save_and_exit(&mut self) -> io::Result<()> {
        writeln!(self.output, "Saving data and exiting...")?;
        for path in self.clinic.unsaved_files() {
            writeln!(
                self.output,
                "Warning: {} failed to load at startup and was left unchanged.",
                path.display()
            )?;
        }
        if let Err(err) = self.clinic.save() {
            writeln!(self.output, "Failed to save data: {}", err)?;
        }
        writeln!(self.output, "Exiting...")
    }

    // ========================================================================
    // INPUT HELPERS
    // ========================================================================

    /// Next trimmed line, or None at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// End of input mid-prompt reads as an empty answer.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn prompt_number<N: FromStr>(&mut self, label: &str, invalid: &str) -> io::Result<Option<N>> {
        let raw = self.prompt(label)?;
        match raw.parse() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                writeln!(self.output, "{}", invalid)?;
                Ok(None)
            }
        }
    }

    fn prompt_id(&mut self, label: &str, invalid: &str) -> io::Result<Option<RecordId>> {
        self.prompt_number(label, invalid)
    }

    /// Blank means no specialization. Outer None aborts the operation.
    fn prompt_specialization(&mut self) -> io::Result<Option<Option<Specialization>>> {
        let names: Vec<&str> = Specialization::ALL.iter().map(|s| s.as_str()).collect();
        let raw = self.prompt(&format!("Enter Specialization ({}): ", names.join(", ")))?;
        if raw.is_empty() {
            return Ok(Some(None));
        }
        match Specialization::from_str(&raw) {
            Ok(spec) => Ok(Some(Some(spec))),
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                Ok(None)
            }
        }
    }

    /// Blank means today.
    fn prompt_date(&mut self) -> io::Result<Option<NaiveDate>> {
        let raw = self.prompt("Enter Date (YYYY-MM-DD, blank for today): ")?;
        if raw.is_empty() {
            return Ok(Some(Local::now().date_naive()));
        }
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                writeln!(self.output, "Invalid date: {}", raw)?;
                Ok(None)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
