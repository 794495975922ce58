//! Utility modules.

pub mod time;

pub use time::{format_wikibase_time, parse_wikibase_time, TimeParseError, WikibaseTimestamp};
