//! Content wizards.
//!
//! One closed schema per record type:
//!
//! - `news`: berita, 4 steps
//! - `report`: laporan, 5 steps
//! - `biography`: biografi, 5 steps
//! - `media`: sub-records shared between wizards
//! - `repository`: media upload and URL traits

pub mod biography;
pub mod media;
pub mod news;
pub mod report;
mod repository;

pub use biography::{
    BiographyField, BiographyForm, BiographyUpdate, EmploymentType, WorkExperience,
    WorkExperienceEdit,
};
pub use media::{CategorySelection, MediaAttachment, MediaEdit, MediaKind};
pub use news::{NewsField, NewsForm, NewsUpdate};
pub use report::{
    Participant, ParticipantEdit, ParticipantRole, ReportField, ReportForm, ReportType,
    ReportUpdate,
};
pub use repository::{BaseUrlBuilder, MediaRepository, MediaUrlBuilder};
