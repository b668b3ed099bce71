//! Alumni biography (biografi) wizard.

use crate::config::{DEFAULT_COUNTRY_CODE, WizardSettings};
use crate::error::Result;
use crate::form::transport::{encode_records, join_tags};
use crate::form::{
    ClientId, CollectionOp, FormSchema, Hydrated, PayloadReader, RecordKind, SubRecord, TagOp,
    TransportOptions, TransportPayload, collection,
};
use crate::notification::normalize_phone;
use crate::wizard::validate::{FieldIssue, each_record, max_chars, require_some, require_text};
use crate::wizard::Step;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

pub const FULL_NAME_MAX: usize = 100;
pub const BIOGRAPHY_MAX: usize = 5000;
pub const EARLIEST_GRADUATION_YEAR: i32 = 1950;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Internship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(skip)]
    pub id: ClientId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub start_year: Option<i32>,
    /// `None` while the position is current
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkExperienceEdit {
    Company(String),
    Position(String),
    EmploymentType(EmploymentType),
    StartYear(Option<i32>),
    EndYear(Option<i32>),
    Description(String),
}

impl SubRecord for WorkExperience {
    type Kind = EmploymentType;
    type Edit = WorkExperienceEdit;

    fn blank(id: ClientId, employment_type: EmploymentType) -> Self {
        Self {
            id,
            company: String::new(),
            position: String::new(),
            employment_type,
            start_year: None,
            end_year: None,
            description: String::new(),
        }
    }

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn assign_id(&mut self, id: ClientId) {
        self.id = id;
    }

    fn apply(&mut self, edit: WorkExperienceEdit) {
        match edit {
            WorkExperienceEdit::Company(v) => self.company = v,
            WorkExperienceEdit::Position(v) => self.position = v,
            WorkExperienceEdit::EmploymentType(v) => self.employment_type = v,
            WorkExperienceEdit::StartYear(v) => self.start_year = v,
            WorkExperienceEdit::EndYear(v) => self.end_year = v,
            WorkExperienceEdit::Description(v) => self.description = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BiographyForm {
    pub full_name: String,
    pub student_number: String,
    pub graduation_year: Option<i32>,
    pub faculty: String,
    pub study_program: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub current_position: String,
    pub current_company: String,
    pub work_experiences: Vec<WorkExperience>,
    pub interests: Vec<String>,
    /// Rich text life story
    pub biography: String,
    pub photo: Option<String>,
    /// Whether email and phone are shown on the public profile
    pub show_contact: bool,
    /// Prefix replacing a leading `0` in `phone`; empty means the default
    #[serde(default)]
    pub country_code: String,
}

impl BiographyForm {
    pub fn country_code(&self) -> &str {
        if self.country_code.is_empty() {
            DEFAULT_COUNTRY_CODE
        } else {
            &self.country_code
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiographyField {
    FullName,
    StudentNumber,
    GraduationYear,
    Faculty,
    StudyProgram,
    Email,
    Phone,
    Address,
    City,
    CurrentPosition,
    CurrentCompany,
    WorkExperiences,
    Interests,
    Biography,
    Photo,
    ShowContact,
}

#[derive(Debug, Clone)]
pub enum BiographyUpdate {
    FullName(String),
    StudentNumber(String),
    GraduationYear(Option<i32>),
    Faculty(String),
    StudyProgram(String),
    Email(String),
    Phone(String),
    Address(String),
    City(String),
    CurrentPosition(String),
    CurrentCompany(String),
    WorkExperiences(CollectionOp<WorkExperience>),
    Interests(TagOp),
    Biography(String),
    Photo(Option<String>),
    ShowContact(bool),
}

fn latest_graduation_year() -> i32 {
    chrono::Local::now().year() + 1
}

/// A single `@` with something on both sides.
fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

fn check_identity(f: &BiographyForm) -> std::result::Result<(), FieldIssue> {
    require_text("full_name", "Full name", &f.full_name)?;
    max_chars("full_name", "Full name", &f.full_name, FULL_NAME_MAX)?;
    require_text("student_number", "Student number", &f.student_number)?;
    require_some("graduation_year", "Graduation year", &f.graduation_year)?;
    let latest = latest_graduation_year();
    match f.graduation_year {
        Some(year) if !(EARLIEST_GRADUATION_YEAR..=latest).contains(&year) => {
            return Err(FieldIssue::new(
                "graduation_year",
                format!("Graduation year must be between {EARLIEST_GRADUATION_YEAR} and {latest}"),
            ));
        }
        _ => {}
    }
    require_text("study_program", "Study program", &f.study_program)
}

fn check_contact(f: &BiographyForm) -> std::result::Result<(), FieldIssue> {
    let email = f.email.trim();
    require_text("email", "Email", email)?;
    if !is_plausible_email(email) {
        return Err(FieldIssue::new("email", "Email address is not valid"));
    }
    if !f.phone.trim().is_empty() && normalize_phone(&f.phone, f.country_code()).is_none() {
        return Err(FieldIssue::new("phone", "Phone number is not valid"));
    }
    Ok(())
}

fn check_career(f: &BiographyForm) -> std::result::Result<(), FieldIssue> {
    each_record(&f.work_experiences, |w| {
        require_text("work_experiences", "Company", &w.company)?;
        require_text("work_experiences", "Position", &w.position)?;
        match (w.start_year, w.end_year) {
            (Some(start), Some(end)) if end < start => Err(FieldIssue::new(
                "work_experiences",
                "End year cannot be before start year",
            )),
            _ => Ok(()),
        }
    })
}

fn check_story(f: &BiographyForm) -> std::result::Result<(), FieldIssue> {
    max_chars("biography", "Biography", &f.biography, BIOGRAPHY_MAX)
}

impl FormSchema for BiographyForm {
    type Field = BiographyField;
    type Update = BiographyUpdate;

    const KIND: RecordKind = RecordKind::Biography;

    fn field_of(update: &BiographyUpdate) -> BiographyField {
        match update {
            BiographyUpdate::FullName(_) => BiographyField::FullName,
            BiographyUpdate::StudentNumber(_) => BiographyField::StudentNumber,
            BiographyUpdate::GraduationYear(_) => BiographyField::GraduationYear,
            BiographyUpdate::Faculty(_) => BiographyField::Faculty,
            BiographyUpdate::StudyProgram(_) => BiographyField::StudyProgram,
            BiographyUpdate::Email(_) => BiographyField::Email,
            BiographyUpdate::Phone(_) => BiographyField::Phone,
            BiographyUpdate::Address(_) => BiographyField::Address,
            BiographyUpdate::City(_) => BiographyField::City,
            BiographyUpdate::CurrentPosition(_) => BiographyField::CurrentPosition,
            BiographyUpdate::CurrentCompany(_) => BiographyField::CurrentCompany,
            BiographyUpdate::WorkExperiences(_) => BiographyField::WorkExperiences,
            BiographyUpdate::Interests(_) => BiographyField::Interests,
            BiographyUpdate::Biography(_) => BiographyField::Biography,
            BiographyUpdate::Photo(_) => BiographyField::Photo,
            BiographyUpdate::ShowContact(_) => BiographyField::ShowContact,
        }
    }

    fn apply(&mut self, update: BiographyUpdate) {
        match update {
            BiographyUpdate::FullName(v) => self.full_name = v,
            BiographyUpdate::StudentNumber(v) => self.student_number = v,
            BiographyUpdate::GraduationYear(v) => self.graduation_year = v,
            BiographyUpdate::Faculty(v) => self.faculty = v,
            BiographyUpdate::StudyProgram(v) => self.study_program = v,
            BiographyUpdate::Email(v) => self.email = v,
            BiographyUpdate::Phone(v) => self.phone = v,
            BiographyUpdate::Address(v) => self.address = v,
            BiographyUpdate::City(v) => self.city = v,
            BiographyUpdate::CurrentPosition(v) => self.current_position = v,
            BiographyUpdate::CurrentCompany(v) => self.current_company = v,
            BiographyUpdate::WorkExperiences(op) => {
                self.work_experiences = op.apply_to(&self.work_experiences)
            }
            BiographyUpdate::Interests(op) => self.interests = op.apply_to(&self.interests),
            BiographyUpdate::Biography(v) => self.biography = v,
            BiographyUpdate::Photo(v) => self.photo = v,
            BiographyUpdate::ShowContact(v) => self.show_contact = v,
        }
    }

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step::new("identity", "Identity", check_identity),
            Step::new("contact", "Contact", check_contact),
            Step::new("career", "Career", check_career),
            Step::new("story", "Story", check_story),
            Step::optional("review", "Review"),
        ]
    }

    fn configure(&mut self, settings: &WizardSettings) {
        self.country_code = settings.country_code.clone();
    }

    fn reassign_ids(&mut self) {
        collection::reassign_ids(&mut self.work_experiences);
    }

    fn to_transport(&self, options: &TransportOptions) -> Result<TransportPayload> {
        let mut p = TransportPayload::new();
        p.insert_text("full_name", self.full_name.trim());
        p.insert_text("student_number", self.student_number.trim());
        p.insert_opt_int("graduation_year", self.graduation_year.map(i64::from));
        p.insert_text("faculty", self.faculty.as_str());
        p.insert_text("study_program", self.study_program.as_str());
        p.insert_text("email", self.email.trim());
        // Stored normalised when it parses, verbatim otherwise (drafts).
        let phone = normalize_phone(&self.phone, self.country_code())
            .unwrap_or_else(|| self.phone.trim().to_string());
        p.insert_text("phone", phone);
        p.insert_text("address", self.address.as_str());
        p.insert_text("city", self.city.as_str());
        p.insert_text("current_position", self.current_position.as_str());
        p.insert_text("current_company", self.current_company.as_str());
        p.insert_text("work_experiences", encode_records(&self.work_experiences)?);
        p.insert_text("interests", join_tags(&self.interests, &options.tag_delimiter));
        p.insert_text("biography", self.biography.as_str());
        p.insert_opt_text("photo", self.photo.as_deref());
        p.insert_bool("show_contact", self.show_contact);
        Ok(p)
    }

    fn from_transport(payload: &TransportPayload, options: &TransportOptions) -> Hydrated<Self> {
        let mut r = PayloadReader::new(payload);
        let state = BiographyForm {
            full_name: payload.text_or_default("full_name"),
            student_number: payload.text_or_default("student_number"),
            graduation_year: payload
                .int("graduation_year")
                .and_then(|v| i32::try_from(v).ok()),
            faculty: payload.text_or_default("faculty"),
            study_program: payload.text_or_default("study_program"),
            email: payload.text_or_default("email"),
            phone: payload.text_or_default("phone"),
            address: payload.text_or_default("address"),
            city: payload.text_or_default("city"),
            current_position: payload.text_or_default("current_position"),
            current_company: payload.text_or_default("current_company"),
            work_experiences: r.records("work_experiences"),
            interests: r.tags("interests", &options.tag_delimiter),
            biography: payload.text_or_default("biography"),
            photo: payload.text("photo").filter(|s| !s.is_empty()),
            show_contact: payload.bool("show_contact").unwrap_or(false),
            country_code: options.country_code.clone(),
        };
        Hydrated {
            state,
            warnings: r.finish(),
        }
    }
}
