//! Utility functions for string and value formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_daily_rate, format_date, format_datetime, format_optional, format_price, truncate_string};
