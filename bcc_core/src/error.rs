//! Errors raised while fetching or parsing a calendar feed.

use thiserror::Error;

/// Everything that can go wrong while loading a feed.
///
/// A lookup miss is not an error, see [`crate::collection::SENTINEL`].
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("feed could not be parsed: {0}")]
    Parse(#[from] ical::parser::ParserError),

    #[error("feed contains no calendar")]
    NoCalendar,

    #[error("event #{index} has no {property} property")]
    MissingProperty { property: &'static str, index: usize },

    #[error("invalid start date: {0:?}")]
    InvalidDate(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
