mod client;
mod draft;
mod fields;
mod milestone;
mod project;

pub use client::{Client, ClientDraft, CLIENT_FIELDS, DEFAULT_CLIENT_STATUS};
pub use draft::{timestamp_now, DraftError};
pub use fields::{Lookup, Tags};
pub use milestone::{Milestone, MilestoneDraft, MILESTONE_FIELDS};
pub use project::{Project, ProjectDraft, DEFAULT_PROJECT_STATUS, PROJECT_FIELDS};
