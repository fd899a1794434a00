//! Utility functions for formatting dates, degrees and text.

pub mod format;

pub use format::{
    format_average, format_date, format_degree, format_percent, relative_period, truncate,
};
