//! Localized validation messages.
//!
//! The Indonesian catalogue is the default and mirrors the wording users of
//! the records screens already know; English follows the usual
//! "The … field …" phrasing.

use crate::model::Field;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Indonesian,
    English,
}

impl Locale {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id" | "id_id" | "indonesian" => Some(Self::Indonesian),
            "en" | "en_us" | "en_gb" | "english" => Some(Self::English),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::Indonesian => "id",
            Locale::English => "en",
        }
    }
}

/// The rule a value failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// A JSON value that is not text.
    Text,
    Date,
    Numeric,
    Min,
    MaxValue,
    MaxLength(usize),
    Email,
    Unique,
}

/// Upper salary bound as shown to users.
const MAX_SALARY_TEXT: &str = "9999999999.99";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn label(&self, field: Field) -> &'static str {
        match self.locale {
            Locale::Indonesian => match field {
                Field::EmployeeId => "ID Karyawan",
                Field::FullName => "Nama lengkap",
                Field::Position => "Jabatan",
                Field::WorkUnit => "Unit kerja",
                Field::StartDate => "Tanggal mulai kerja",
                Field::Salary => "Gaji",
                Field::Email => "Email",
                Field::Phone => "Nomor telepon",
            },
            Locale::English => match field {
                Field::EmployeeId => "employee id",
                Field::FullName => "full name",
                Field::Position => "position",
                Field::WorkUnit => "work unit",
                Field::StartDate => "start date",
                Field::Salary => "salary",
                Field::Email => "email",
                Field::Phone => "phone",
            },
        }
    }

    pub fn message(&self, field: Field, rule: Rule) -> String {
        let label = self.label(field);
        match self.locale {
            Locale::Indonesian => match rule {
                Rule::Required => format!("{label} wajib diisi."),
                Rule::Text => format!("{label} harus berupa teks."),
                Rule::Date => "Format tanggal tidak valid.".to_string(),
                Rule::Numeric => format!("{label} harus berupa angka."),
                Rule::Min => format!("{label} tidak boleh kurang dari 0."),
                Rule::MaxValue => format!("{label} tidak boleh lebih dari {MAX_SALARY_TEXT}."),
                Rule::MaxLength(max) => {
                    format!("{label} tidak boleh lebih dari {max} karakter.")
                }
                Rule::Email => "Format email tidak valid.".to_string(),
                Rule::Unique => format!("{label} sudah digunakan karyawan lain."),
            },
            Locale::English => match rule {
                Rule::Required => format!("The {label} field is required."),
                Rule::Text => format!("The {label} field must be a string."),
                Rule::Date => format!("The {label} field must be a valid date."),
                Rule::Numeric => format!("The {label} field must be a number."),
                Rule::Min => format!("The {label} field must be at least 0."),
                Rule::MaxValue => {
                    format!("The {label} field must not be greater than {MAX_SALARY_TEXT}.")
                }
                Rule::MaxLength(max) => {
                    format!("The {label} field must not be greater than {max} characters.")
                }
                Rule::Email => format!("The {label} field must be a valid email address."),
                Rule::Unique => format!("The {label} has already been taken."),
            },
        }
    }
}
