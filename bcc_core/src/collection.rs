//! This index maps collection dates to the summaries of that day's collections.

use std::{borrow::Borrow, collections::HashMap, fmt};

use chrono::NaiveDate;
use tracing::info;

use crate::{
    error::FeedResult,
    feed::{self, CalendarParser, FeedEvent, IcalParser},
};

/// Returned by every lookup which does not hit a collection date.
pub static SENTINEL: &str = "No collection on that date.";

static SEPARATOR: &str = ". ";
static FORMAT: &str = "%Y-%m-%d";

/// A date in its canonical `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(String);

impl DateKey {
    /// Format a key from its parts, zero padded to a four digit year and two digit month and day.
    ///
    /// The parts are not checked to be a valid calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self(format!("{year:04}-{month:02}-{day:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(FORMAT).to_string())
    }
}

impl Borrow<str> for DateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summaries keyed by date, built in one go from a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CollectionIndex(HashMap<DateKey, String>);

impl CollectionIndex {
    /// Fold events into the index in feed order.
    ///
    /// Summaries of the same date are joined with `". "`, duplicates are kept.
    fn build(events: impl IntoIterator<Item = FeedEvent>) -> Self {
        let mut index: HashMap<DateKey, String> = HashMap::new();
        for event in events {
            index
                .entry(DateKey::from(event.start_date))
                .and_modify(|summary| {
                    summary.push_str(SEPARATOR);
                    summary.push_str(&event.summary);
                })
                .or_insert(event.summary);
        }
        Self(index)
    }

    fn get(&self, date: &str) -> Option<&str> {
        self.0.get(date).map(String::as_str)
    }
}

/// The bin collection calendar of the most recently loaded feed.
#[derive(Debug, Clone, Default)]
pub struct BinCollection<P: CalendarParser = IcalParser> {
    parser: P,
    index: CollectionIndex,
}

impl BinCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CalendarParser> BinCollection<P> {
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            index: CollectionIndex::default(),
        }
    }

    /// Download the feed and replace the whole index with it.
    ///
    /// On failure the previous index is kept.
    pub fn download(&mut self, url: &str) -> FeedResult<()> {
        let bytes = feed::fetch(url)?;
        self.load_bytes(&bytes)
    }

    /// Parse a raw feed and replace the whole index with it.
    ///
    /// On failure the previous index is kept.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> FeedResult<()> {
        let events = self.parser.parse(feed::decode(bytes)?)?;
        self.load(events);
        Ok(())
    }

    /// Replace the whole index with the given events.
    pub fn load(&mut self, events: impl IntoIterator<Item = FeedEvent>) {
        let events: Vec<FeedEvent> = events.into_iter().collect();
        let event_count = events.len();
        self.index = CollectionIndex::build(events);
        info!(
            events = event_count,
            dates = self.len(),
            "replaced collection index"
        );
    }

    /// Get the summary for a date given as `YYYY-MM-DD`.
    ///
    /// Anything else, including malformed dates, gets the [`SENTINEL`].
    pub fn summary(&self, date: &str) -> &str {
        self.index.get(date).unwrap_or(SENTINEL)
    }

    /// Get the summary for a date given as year, month and day.
    pub fn summary_for_ymd(&self, year: i32, month: u32, day: u32) -> &str {
        self.summary(DateKey::from_ymd(year, month, day).as_str())
    }

    /// The number of distinct collection dates.
    pub fn len(&self) -> usize {
        self.index.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.0.is_empty()
    }
}
