//! Plausible employee records for local development and demos.

use std::collections::HashSet;

use chrono::{Days, NaiveDate, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{info, warn};

use crate::{
    error::{HrError, HrResult},
    model::EmployeeForm,
    service::EmployeeService,
};

const POSITIONS: [&str; 10] = [
    "Manager",
    "Supervisor",
    "Staff Administrasi",
    "Analis",
    "Koordinator",
    "Sekretaris",
    "Asisten Manager",
    "Specialist",
    "Officer",
    "Konsultan",
];

const WORK_UNITS: [&str; 10] = [
    "Human Resources",
    "Keuangan",
    "Pemasaran",
    "IT",
    "Operasional",
    "Produksi",
    "Quality Assurance",
    "Research & Development",
    "Customer Service",
    "Legal",
];

const FIRST_NAMES: [&str; 16] = [
    "Agus", "Budi", "Citra", "Dewi", "Eko", "Fitri", "Gilang", "Hendra", "Indah", "Joko",
    "Kartika", "Lestari", "Made", "Nur", "Putri", "Rudi",
];

const LAST_NAMES: [&str; 12] = [
    "Santoso",
    "Wijaya",
    "Saputra",
    "Halim",
    "Kusuma",
    "Pratama",
    "Siregar",
    "Nasution",
    "Hidayat",
    "Wibowo",
    "Setiawan",
    "Lubis",
];

const PHONE_PREFIXES: [&str; 6] = ["0812", "0813", "0821", "0852", "0857", "0878"];

const EMPLOYEE_NUMBERS: std::ops::RangeInclusive<u32> = 1000..=9999;
const SALARY_RANGE: std::ops::RangeInclusive<i64> = 5_000_000..=25_000_000;
const TENURE_DAYS: u64 = 5 * 365;

/// Largest batch the factory can keep unique.
pub const MAX_GENERATED: usize = 9000;

/// Hands out forms with employee ids and emails unique within one factory.
pub struct EmployeeFactory<R: Rng> {
    rng: R,
    used_ids: HashSet<u32>,
    used_emails: HashSet<String>,
}

impl EmployeeFactory<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for EmployeeFactory<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> EmployeeFactory<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            used_ids: HashSet::new(),
            used_emails: HashSet::new(),
        }
    }

    /// `None` once every employee number has been handed out.
    pub fn next_form(&mut self) -> Option<EmployeeForm> {
        if self.used_ids.len() >= MAX_GENERATED {
            return None;
        }
        let number = loop {
            let candidate = self.rng.gen_range(EMPLOYEE_NUMBERS);
            if self.used_ids.insert(candidate) {
                break candidate;
            }
        };
        let first = *FIRST_NAMES.choose(&mut self.rng)?;
        let last = *LAST_NAMES.choose(&mut self.rng)?;
        let email = self.unique_email(first, last);
        let start_date = self.start_date();
        let salary = self.rng.gen_range(SALARY_RANGE);
        let prefix = *PHONE_PREFIXES.choose(&mut self.rng)?;
        let phone = format!("{prefix}{:08}", self.rng.gen_range(0..100_000_000u32));
        Some(EmployeeForm {
            employee_id: Some(format!("EMP{number}")),
            full_name: Some(format!("{first} {last}")),
            position: Some(POSITIONS.choose(&mut self.rng)?.to_string()),
            work_unit: Some(WORK_UNITS.choose(&mut self.rng)?.to_string()),
            start_date: Some(start_date.format("%Y-%m-%d").to_string()),
            salary: Some(salary.to_string()),
            email: Some(email),
            phone: Some(phone),
            ..Default::default()
        })
    }

    fn unique_email(&mut self, first: &str, last: &str) -> String {
        let base = format!("{}.{}", first.to_lowercase(), last.to_lowercase());
        let mut email = format!("{base}@example.com");
        while !self.used_emails.insert(email.clone()) {
            email = format!("{base}{}@example.com", self.rng.gen_range(1..10_000));
        }
        email
    }

    fn start_date(&mut self) -> NaiveDate {
        let today = Utc::now().date_naive();
        let back = self.rng.gen_range(0..=TENURE_DAYS);
        today.checked_sub_days(Days::new(back)).unwrap_or(today)
    }
}

/// Creates up to `count` employees through the validated create path.
/// Submissions that collide with existing rows are skipped; returns how many
/// were stored.
pub async fn seed_employees(service: &EmployeeService, count: usize) -> HrResult<usize> {
    let mut factory = EmployeeFactory::new();
    let mut created = 0;
    for _ in 0..count {
        let Some(form) = factory.next_form() else {
            break;
        };
        match service.create(&form).await {
            Ok(_) => created += 1,
            Err(HrError::Validation(errors)) => {
                warn!(fields = %errors, "skipping generated employee");
            }
            Err(err) => return Err(err),
        }
    }
    info!(requested = count, created, "employees seeded");
    Ok(created)
}
