//! News article (berita) wizard.

use super::media::{CategorySelection, MediaAttachment};
use crate::config::{DEFAULT_SUMMARY_LENGTH, WizardSettings};
use crate::error::Result;
use crate::form::derived::{self, ELLIPSIS};
use crate::form::transport::{encode_records, join_tags};
use crate::form::{
    CollectionOp, DerivedRule, FormSchema, Hydrated, PayloadReader, RecordKind, TagOp,
    TransportOptions, TransportPayload, collection,
};
use crate::wizard::validate::{
    FieldIssue, each_record, max_chars, min_chars, require_non_empty, require_text,
};
use crate::wizard::Step;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TITLE_MAX: usize = 200;
pub const SUMMARY_MAX: usize = 500;
pub const CONTENT_MIN: usize = 50;
pub const CAPTION_MAX: usize = 300;
/// Longest summary length that still fits `SUMMARY_MAX` with the ellipsis.
pub const SUMMARY_LENGTH_MAX: usize = SUMMARY_MAX - ELLIPSIS.len();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsForm {
    pub title: String,
    pub summary: String,
    /// Rich text (HTML) body
    pub content: String,
    pub summary_length: usize,
    pub categories: Vec<CategorySelection>,
    pub tags: Vec<String>,
    pub media: Vec<MediaAttachment>,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub publish_date: Option<NaiveDate>,
}

impl Default for NewsForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            content: String::new(),
            summary_length: DEFAULT_SUMMARY_LENGTH,
            categories: Vec::new(),
            tags: Vec::new(),
            media: Vec::new(),
            cover_image: None,
            featured: false,
            publish_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsField {
    Title,
    Summary,
    Content,
    SummaryLength,
    Categories,
    Tags,
    Media,
    CoverImage,
    Featured,
    PublishDate,
}

#[derive(Debug, Clone)]
pub enum NewsUpdate {
    Title(String),
    Summary(String),
    Content(String),
    SummaryLength(usize),
    Categories(CollectionOp<CategorySelection>),
    Tags(TagOp),
    Media(CollectionOp<MediaAttachment>),
    CoverImage(Option<String>),
    Featured(bool),
    PublishDate(Option<NaiveDate>),
}

fn check_basic(f: &NewsForm) -> std::result::Result<(), FieldIssue> {
    require_text("title", "Title", &f.title)?;
    max_chars("title", "Title", &f.title, TITLE_MAX)?;
    max_chars("summary", "Summary", &f.summary, SUMMARY_MAX)
}

fn check_content(f: &NewsForm) -> std::result::Result<(), FieldIssue> {
    let plain = derived::strip_markup(&f.content);
    require_text("content", "Content", &plain)?;
    min_chars("content", "Content", &plain, CONTENT_MIN)?;
    require_non_empty("categories", "category", &f.categories)
}

fn check_media(f: &NewsForm) -> std::result::Result<(), FieldIssue> {
    each_record(&f.media, |m| {
        require_text("media", "Media URL", &m.url)?;
        max_chars("media", "Caption", &m.caption, CAPTION_MAX)
    })
}

fn compute_summary(f: &NewsForm) -> String {
    derived::summarize(&f.content, f.summary_length)
}

fn read_summary(f: &NewsForm) -> &str {
    &f.summary
}

fn write_summary(f: &mut NewsForm, value: String) {
    f.summary = value;
}

impl FormSchema for NewsForm {
    type Field = NewsField;
    type Update = NewsUpdate;

    const KIND: RecordKind = RecordKind::News;

    fn field_of(update: &NewsUpdate) -> NewsField {
        match update {
            NewsUpdate::Title(_) => NewsField::Title,
            NewsUpdate::Summary(_) => NewsField::Summary,
            NewsUpdate::Content(_) => NewsField::Content,
            NewsUpdate::SummaryLength(_) => NewsField::SummaryLength,
            NewsUpdate::Categories(_) => NewsField::Categories,
            NewsUpdate::Tags(_) => NewsField::Tags,
            NewsUpdate::Media(_) => NewsField::Media,
            NewsUpdate::CoverImage(_) => NewsField::CoverImage,
            NewsUpdate::Featured(_) => NewsField::Featured,
            NewsUpdate::PublishDate(_) => NewsField::PublishDate,
        }
    }

    fn apply(&mut self, update: NewsUpdate) {
        match update {
            NewsUpdate::Title(v) => self.title = v,
            NewsUpdate::Summary(v) => self.summary = v,
            NewsUpdate::Content(v) => self.content = v,
            NewsUpdate::SummaryLength(v) => self.summary_length = v.min(SUMMARY_LENGTH_MAX),
            NewsUpdate::Categories(op) => self.categories = op.apply_to(&self.categories),
            NewsUpdate::Tags(op) => self.tags = op.apply_to(&self.tags),
            NewsUpdate::Media(op) => self.media = op.apply_to(&self.media),
            NewsUpdate::CoverImage(v) => self.cover_image = v,
            NewsUpdate::Featured(v) => self.featured = v,
            NewsUpdate::PublishDate(v) => self.publish_date = v,
        }
    }

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step::new("basic", "Basic information", check_basic),
            Step::new("content", "Content", check_content),
            Step::new("media", "Media", check_media),
            Step::optional("review", "Review"),
        ]
    }

    fn configure(&mut self, settings: &WizardSettings) {
        self.summary_length = settings.summary_length.min(SUMMARY_LENGTH_MAX);
    }

    fn reassign_ids(&mut self) {
        collection::reassign_ids(&mut self.categories);
        collection::reassign_ids(&mut self.media);
    }

    fn derived_rule() -> Option<DerivedRule<Self>> {
        Some(DerivedRule {
            sources: &[NewsField::Content, NewsField::SummaryLength],
            target: NewsField::Summary,
            compute: compute_summary,
            read: read_summary,
            write: write_summary,
        })
    }

    fn to_transport(&self, options: &TransportOptions) -> Result<TransportPayload> {
        let mut p = TransportPayload::new();
        p.insert_text("title", self.title.trim());
        p.insert_text("summary", self.summary.as_str());
        p.insert_text("content", self.content.as_str());
        p.insert_int("summary_length", self.summary_length as i64);
        p.insert_text("categories", encode_records(&self.categories)?);
        p.insert_text("tags", join_tags(&self.tags, &options.tag_delimiter));
        p.insert_text("media", encode_records(&self.media)?);
        p.insert_opt_text("cover_image", self.cover_image.as_deref());
        p.insert_bool("featured", self.featured);
        p.insert_opt_text(
            "publish_date",
            self.publish_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .as_deref(),
        );
        Ok(p)
    }

    fn from_transport(payload: &TransportPayload, options: &TransportOptions) -> Hydrated<Self> {
        let mut r = PayloadReader::new(payload);
        let state = NewsForm {
            title: payload.text_or_default("title"),
            summary: payload.text_or_default("summary"),
            content: payload.text_or_default("content"),
            summary_length: payload
                .int("summary_length")
                .and_then(|v| usize::try_from(v).ok())
                .map_or(DEFAULT_SUMMARY_LENGTH, |v| v.min(SUMMARY_LENGTH_MAX)),
            categories: r.records("categories"),
            tags: r.tags("tags", &options.tag_delimiter),
            media: r.records("media"),
            cover_image: payload.text("cover_image").filter(|s| !s.is_empty()),
            featured: payload.bool("featured").unwrap_or(false),
            publish_date: payload
                .text("publish_date")
                .and_then(|s| parse_date(&s)),
        };
        Hydrated {
            state,
            warnings: r.finish(),
        }
    }
}

/// Accepts `YYYY-MM-DD` with an optional time suffix.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}
