//! Data models for emotion-tracker entities.
//!
//! This module contains all the data structures exchanged with the API:
//!
//! - `Mood`, `EmotionType`, `Emotion`: emotion catalog and submissions
//! - `EmotionOverview`: personal daily/weekly/monthly summary
//! - `Role`, `Collaborator`, `CollaboratorSummary`: people and their roles
//! - `OrgUnitKind`, `UnitOverview`: organizational roll-ups
//! - `Page`, `PageRequest`: offset/limit pagination

pub mod collaborator;
pub mod emotion;
pub mod organization;
pub mod page;

pub use collaborator::{Collaborator, CollaboratorSummary, Role};
pub use emotion::{Emotion, EmotionOverview, EmotionType, Mood, MoodSummary, SubmitEmotion};
pub use organization::{MoodStatus, OrgUnitKind, PeriodAverage, PeriodAverages, UnitOverview};
pub use page::{total_pages, Page, PageRequest};
