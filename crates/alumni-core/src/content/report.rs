//! Activity report (laporan) wizard.

use super::media::MediaAttachment;
use super::news::parse_date;
use crate::config::{DEFAULT_SUMMARY_LENGTH, WizardSettings};
use crate::error::Result;
use crate::form::derived::{self, ELLIPSIS};
use crate::form::transport::{encode_records, join_tags};
use crate::form::{
    ClientId, CollectionOp, DerivedRule, FormSchema, Hydrated, PayloadReader, RecordKind,
    SubRecord, TagOp, TransportOptions, TransportPayload, collection,
};
use crate::wizard::validate::{
    FieldIssue, each_record, max_chars, min_chars, require_some, require_text,
};
use crate::wizard::Step;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const TITLE_MAX: usize = 200;
pub const SUMMARY_MAX: usize = 500;
pub const CONTENT_MIN: usize = 50;
pub const LOCATION_MAX: usize = 255;
pub const PARTICIPANT_NAME_MAX: usize = 100;
pub const SUMMARY_LENGTH_MAX: usize = SUMMARY_MAX - ELLIPSIS.len();

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
pub enum ReportType {
    #[default]
    Activity,
    Financial,
    Meeting,
    Other,
}

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
pub enum ParticipantRole {
    #[default]
    Attendee,
    Organizer,
    Speaker,
    Committee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(skip)]
    pub id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: ParticipantRole,
    /// Phone number or email, free form
    #[serde(default)]
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantEdit {
    Name(String),
    Role(ParticipantRole),
    Contact(String),
}

impl SubRecord for Participant {
    type Kind = ParticipantRole;
    type Edit = ParticipantEdit;

    fn blank(id: ClientId, role: ParticipantRole) -> Self {
        Self {
            id,
            name: String::new(),
            role,
            contact: String::new(),
        }
    }

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn assign_id(&mut self, id: ClientId) {
        self.id = id;
    }

    fn apply(&mut self, edit: ParticipantEdit) {
        match edit {
            ParticipantEdit::Name(v) => self.name = v,
            ParticipantEdit::Role(v) => self.role = v,
            ParticipantEdit::Contact(v) => self.contact = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportForm {
    pub title: String,
    pub report_type: ReportType,
    pub event_date: Option<NaiveDate>,
    pub location: String,
    /// Coordinates picked on the map widget
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub content: String,
    pub summary: String,
    pub summary_length: usize,
    pub participants: Vec<Participant>,
    pub attachments: Vec<MediaAttachment>,
    pub tags: Vec<String>,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            report_type: ReportType::default(),
            event_date: None,
            location: String::new(),
            latitude: None,
            longitude: None,
            content: String::new(),
            summary: String::new(),
            summary_length: DEFAULT_SUMMARY_LENGTH,
            participants: Vec::new(),
            attachments: Vec::new(),
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    Title,
    ReportType,
    EventDate,
    Location,
    Coordinates,
    Content,
    Summary,
    SummaryLength,
    Participants,
    Attachments,
    Tags,
}

#[derive(Debug, Clone)]
pub enum ReportUpdate {
    Title(String),
    ReportType(ReportType),
    EventDate(Option<NaiveDate>),
    Location(String),
    /// Latitude and longitude are always set together
    Coordinates(Option<(f64, f64)>),
    Content(String),
    Summary(String),
    SummaryLength(usize),
    Participants(CollectionOp<Participant>),
    Attachments(CollectionOp<MediaAttachment>),
    Tags(TagOp),
}

fn check_basic(f: &ReportForm) -> std::result::Result<(), FieldIssue> {
    require_text("title", "Title", &f.title)?;
    max_chars("title", "Title", &f.title, TITLE_MAX)?;
    require_some("event_date", "Event date", &f.event_date)?;
    max_chars("summary", "Summary", &f.summary, SUMMARY_MAX)
}

fn check_detail(f: &ReportForm) -> std::result::Result<(), FieldIssue> {
    let plain = derived::strip_markup(&f.content);
    require_text("content", "Content", &plain)?;
    min_chars("content", "Content", &plain, CONTENT_MIN)?;
    require_text("location", "Location", &f.location)?;
    max_chars("location", "Location", &f.location, LOCATION_MAX)
}

fn check_participants(f: &ReportForm) -> std::result::Result<(), FieldIssue> {
    each_record(&f.participants, |p| {
        require_text("participants", "Participant name", &p.name)?;
        max_chars(
            "participants",
            "Participant name",
            &p.name,
            PARTICIPANT_NAME_MAX,
        )
    })
}

fn check_attachments(f: &ReportForm) -> std::result::Result<(), FieldIssue> {
    each_record(&f.attachments, |a| {
        require_text("attachments", "Attachment URL", &a.url)
    })
}

fn compute_summary(f: &ReportForm) -> String {
    derived::summarize(&f.content, f.summary_length)
}

fn read_summary(f: &ReportForm) -> &str {
    &f.summary
}

fn write_summary(f: &mut ReportForm, value: String) {
    f.summary = value;
}

impl FormSchema for ReportForm {
    type Field = ReportField;
    type Update = ReportUpdate;

    const KIND: RecordKind = RecordKind::Report;

    fn field_of(update: &ReportUpdate) -> ReportField {
        match update {
            ReportUpdate::Title(_) => ReportField::Title,
            ReportUpdate::ReportType(_) => ReportField::ReportType,
            ReportUpdate::EventDate(_) => ReportField::EventDate,
            ReportUpdate::Location(_) => ReportField::Location,
            ReportUpdate::Coordinates(_) => ReportField::Coordinates,
            ReportUpdate::Content(_) => ReportField::Content,
            ReportUpdate::Summary(_) => ReportField::Summary,
            ReportUpdate::SummaryLength(_) => ReportField::SummaryLength,
            ReportUpdate::Participants(_) => ReportField::Participants,
            ReportUpdate::Attachments(_) => ReportField::Attachments,
            ReportUpdate::Tags(_) => ReportField::Tags,
        }
    }

    fn apply(&mut self, update: ReportUpdate) {
        match update {
            ReportUpdate::Title(v) => self.title = v,
            ReportUpdate::ReportType(v) => self.report_type = v,
            ReportUpdate::EventDate(v) => self.event_date = v,
            ReportUpdate::Location(v) => self.location = v,
            ReportUpdate::Coordinates(v) => {
                self.latitude = v.map(|(lat, _)| lat);
                self.longitude = v.map(|(_, lng)| lng);
            }
            ReportUpdate::Content(v) => self.content = v,
            ReportUpdate::Summary(v) => self.summary = v,
            ReportUpdate::SummaryLength(v) => self.summary_length = v.min(SUMMARY_LENGTH_MAX),
            ReportUpdate::Participants(op) => self.participants = op.apply_to(&self.participants),
            ReportUpdate::Attachments(op) => self.attachments = op.apply_to(&self.attachments),
            ReportUpdate::Tags(op) => self.tags = op.apply_to(&self.tags),
        }
    }

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step::new("basic", "Basic information", check_basic),
            Step::new("detail", "Details", check_detail),
            Step::new("participants", "Participants", check_participants),
            Step::new("attachments", "Attachments", check_attachments),
            Step::optional("review", "Review"),
        ]
    }

    fn configure(&mut self, settings: &WizardSettings) {
        self.summary_length = settings.summary_length.min(SUMMARY_LENGTH_MAX);
    }

    fn reassign_ids(&mut self) {
        collection::reassign_ids(&mut self.participants);
        collection::reassign_ids(&mut self.attachments);
    }

    fn derived_rule() -> Option<DerivedRule<Self>> {
        Some(DerivedRule {
            sources: &[ReportField::Content, ReportField::SummaryLength],
            target: ReportField::Summary,
            compute: compute_summary,
            read: read_summary,
            write: write_summary,
        })
    }

    fn to_transport(&self, options: &TransportOptions) -> Result<TransportPayload> {
        let mut p = TransportPayload::new();
        p.insert_text("title", self.title.trim());
        p.insert_text("report_type", self.report_type.to_string());
        p.insert_opt_text(
            "event_date",
            self.event_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .as_deref(),
        );
        p.insert_text("location", self.location.trim());
        p.insert_opt_float("latitude", self.latitude);
        p.insert_opt_float("longitude", self.longitude);
        p.insert_text("content", self.content.as_str());
        p.insert_text("summary", self.summary.as_str());
        p.insert_int("summary_length", self.summary_length as i64);
        p.insert_text("participants", encode_records(&self.participants)?);
        p.insert_text("attachments", encode_records(&self.attachments)?);
        p.insert_text("tags", join_tags(&self.tags, &options.tag_delimiter));
        Ok(p)
    }

    fn from_transport(payload: &TransportPayload, options: &TransportOptions) -> Hydrated<Self> {
        let mut r = PayloadReader::new(payload);
        let state = ReportForm {
            title: payload.text_or_default("title"),
            report_type: payload
                .text("report_type")
                .and_then(|s| ReportType::from_str(s.trim()).ok())
                .unwrap_or_default(),
            event_date: payload.text("event_date").and_then(|s| parse_date(&s)),
            location: payload.text_or_default("location"),
            latitude: payload.float("latitude"),
            longitude: payload.float("longitude"),
            content: payload.text_or_default("content"),
            summary: payload.text_or_default("summary"),
            summary_length: payload
                .int("summary_length")
                .and_then(|v| usize::try_from(v).ok())
                .map_or(DEFAULT_SUMMARY_LENGTH, |v| v.min(SUMMARY_LENGTH_MAX)),
            participants: r.records("participants"),
            attachments: r.records("attachments"),
            tags: r.tags("tags", &options.tag_delimiter),
        };
        Hydrated {
            state,
            warnings: r.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::media::{MediaEdit, MediaKind};
    use crate::form::{FormContainer, SummaryPolicy};
    use crate::wizard::{StepController, WizardError};

    const BODY: &str = "<p>Bakti sosial alumni di desa binaan berjalan lancar dengan 40 relawan.</p>";

    fn filled() -> FormContainer<ReportForm> {
        let mut form = FormContainer::new(SummaryPolicy::AlwaysOverwrite);
        form.update(ReportUpdate::Title("Bakti Sosial".into()));
        form.update(ReportUpdate::EventDate(NaiveDate::from_ymd_opt(2024, 3, 9)));
        form.update(ReportUpdate::Content(BODY.into()));
        form.update(ReportUpdate::Location("Desa Sukamaju".into()));
        form
    }

    #[test]
    fn event_date_is_required() {
        let mut form = FormContainer::<ReportForm>::new(SummaryPolicy::AlwaysOverwrite);
        let mut steps = StepController::new(ReportForm::steps()).unwrap();
        form.update(ReportUpdate::Title("Rapat Pengurus".into()));
        let WizardError::Blocked(v) = steps.next(form.state()).unwrap_err() else {
            panic!("expected a validation failure");
        };
        assert_eq!(v.field, "event_date");
        assert_eq!(steps.current(), 0);
    }

    #[test]
    fn location_is_bounded() {
        let mut form = filled();
        let steps = StepController::new(ReportForm::steps()).unwrap();
        assert!(steps.validate(1, form.state()).is_ok());
        form.update(ReportUpdate::Location("x".repeat(LOCATION_MAX + 1)));
        let WizardError::Blocked(v) = steps.validate(1, form.state()).unwrap_err() else {
            panic!("expected a validation failure");
        };
        assert_eq!(v.field, "location");
    }

    #[test]
    fn participants_need_names() {
        let mut form = filled();
        let steps = StepController::new(ReportForm::steps()).unwrap();
        form.update(ReportUpdate::Participants(
            CollectionOp::<Participant>::add_blank(ParticipantRole::Speaker),
        ));
        let WizardError::Blocked(v) = steps.validate(2, form.state()).unwrap_err() else {
            panic!("expected a validation failure");
        };
        assert_eq!(v.field, "participants");
        assert!(v.message.starts_with("item 1:"));

        let id = form.state().participants[0].id.clone();
        form.update(ReportUpdate::Participants(CollectionOp::Update(
            id,
            ParticipantEdit::Name("Dewi Lestari".into()),
        )));
        assert!(steps.validate(2, form.state()).is_ok());
    }

    #[test]
    fn full_wizard_reaches_review() {
        let mut form = filled();
        form.update(ReportUpdate::Attachments(
            CollectionOp::<MediaAttachment>::add_blank(MediaKind::Document),
        ));
        let id = form.state().attachments[0].id.clone();
        form.update(ReportUpdate::Attachments(CollectionOp::Update(
            id,
            MediaEdit::Url("/uploads/notulen.pdf".into()),
        )));

        let mut steps = StepController::new(ReportForm::steps()).unwrap();
        while !steps.is_last() {
            steps.next(form.state()).unwrap();
        }
        assert_eq!(steps.current_step().id, "review");
        assert!(steps.validate_all(form.state()).is_ok());
    }

    #[test]
    fn summary_is_derived_from_content() {
        let form = filled();
        assert!(form.state().summary.starts_with("Bakti sosial alumni"));
        assert!(!form.state().summary.contains('<'));
    }

    #[test]
    fn transport_round_trip_keeps_typed_fields() {
        let mut form = filled();
        form.update(ReportUpdate::ReportType(ReportType::Meeting));
        form.update(ReportUpdate::Coordinates(Some((-6.2, 106.8))));
        form.update(ReportUpdate::Participants(CollectionOp::Add(Participant {
            id: ClientId::generate(),
            name: "Budi".into(),
            role: ParticipantRole::Organizer,
            contact: "0812".into(),
        })));

        let options = TransportOptions::default();
        let payload = form.state().to_transport(&options).unwrap();
        assert_eq!(payload.text("report_type").as_deref(), Some("meeting"));
        assert_eq!(payload.float("latitude"), Some(-6.2));
        let participants = payload.text("participants").unwrap();
        assert!(participants.contains("\"organizer\""));
        assert!(!participants.contains("\"id\""));

        let back = ReportForm::from_transport(&payload, &options).state;
        assert_eq!(back.report_type, ReportType::Meeting);
        assert_eq!(back.event_date, form.state().event_date);
        assert_eq!(back.longitude, Some(106.8));
        assert_eq!(back.participants[0].name, "Budi");
        assert_eq!(back.participants[0].role, ParticipantRole::Organizer);
    }

    #[test]
    fn unknown_report_type_falls_back_to_default() {
        let mut payload = TransportPayload::new();
        payload.insert_text("report_type", "quarterly");
        payload.insert_text("participants", "{broken");
        let hydrated = ReportForm::from_transport(&payload, &TransportOptions::default());
        assert_eq!(hydrated.state.report_type, ReportType::Activity);
        assert!(hydrated.state.participants.is_empty());
        assert_eq!(hydrated.warnings[0].field, "participants");
    }
}
