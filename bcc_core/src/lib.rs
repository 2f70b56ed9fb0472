//! This crate turns a waste collection calendar feed into a lookup by date.
//!
//! The feed is any iCalendar document whose events carry a start date and a summary,
//! e.g. a council's bin collection feed.

pub mod collection;
pub mod error;
pub mod feed;

pub use collection::{BinCollection, DateKey, SENTINEL};
pub use error::{FeedError, FeedResult};
pub use feed::{CalendarParser, FeedEvent, IcalParser};
