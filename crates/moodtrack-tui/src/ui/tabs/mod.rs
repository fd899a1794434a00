//! Tab-specific content rendering.

pub mod history;
pub mod team;
pub mod today;
pub mod units;
