//! Utility functions for the feewatch dashboard core.
//!
//! - [`format`] - Currency string formatting for the snapshot table

mod format;

pub use format::{format_usd, PLACEHOLDER};
