//! This loader fetches a calendar feed and parses it into collection events.

use std::io::{BufReader, Cursor};

use chrono::NaiveDate;
use ical::parser::ical::component::IcalEvent;
use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{FeedError, FeedResult};

static PROPERTY_START: &str = "DTSTART";
static PROPERTY_SUMMARY: &str = "SUMMARY";

/// A single event of the feed, reduced to what the collection index needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub start_date: NaiveDate,
    pub summary: String,
}

impl FeedEvent {
    pub fn new(start_date: NaiveDate, summary: impl Into<String>) -> Self {
        Self {
            start_date,
            summary: summary.into(),
        }
    }
}

/// Anything which can turn calendar text into events, in feed order.
pub trait CalendarParser {
    fn parse(&self, ics: &str) -> FeedResult<Vec<FeedEvent>>;
}

/// The default parser, backed by the `ical` crate.
///
/// Only `VEVENT` components are read, time zone definitions and other components are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcalParser;

trait GetIcalProperty {
    fn get_ical_property_value(&self, name: &str) -> Option<&String>;
}

impl GetIcalProperty for IcalEvent {
    fn get_ical_property_value(&self, name: &str) -> Option<&String> {
        self.properties
            .iter()
            .find(|property| property.name.eq_ignore_ascii_case(name))
            .and_then(|property| property.value.as_ref())
    }
}

impl CalendarParser for IcalParser {
    fn parse(&self, ics: &str) -> FeedResult<Vec<FeedEvent>> {
        let parser = ical::IcalParser::new(BufReader::new(Cursor::new(ics)));
        let date_regex = Regex::new(
            r"(?x)
                ^
                (?P<year>\d{4})
                (?P<month>\d{2})
                (?P<day>\d{2})
                (?:T|$) # a date-time continues with the time, a date ends here
            ",
        )
        .expect("date pattern is valid");
        let date_from_captures = |captures: Captures| -> Option<NaiveDate> {
            NaiveDate::from_ymd_opt(
                captures["year"].parse().ok()?,
                captures["month"].parse().ok()?,
                captures["day"].parse().ok()?,
            )
        };
        let mut calendar_found = false;
        let mut feed_events: Vec<FeedEvent> = vec![];
        for ical_calendar_result in parser {
            let ical_calendar = ical_calendar_result?;
            calendar_found = true;
            for ical_event in ical_calendar.events {
                let index = feed_events.len();
                let dt_start = ical_event
                    .get_ical_property_value(PROPERTY_START)
                    .ok_or(FeedError::MissingProperty {
                        property: PROPERTY_START,
                        index,
                    })?;
                let summary = ical_event
                    .get_ical_property_value(PROPERTY_SUMMARY)
                    .ok_or(FeedError::MissingProperty {
                        property: PROPERTY_SUMMARY,
                        index,
                    })?;
                let start_date = date_regex
                    .captures(dt_start.trim())
                    .and_then(date_from_captures)
                    .ok_or_else(|| FeedError::InvalidDate(dt_start.clone()))?;
                feed_events.push(FeedEvent::new(start_date, unescape_text(summary)));
            }
        }
        if !calendar_found {
            return Err(FeedError::NoCalendar);
        }
        debug!(events = feed_events.len(), "parsed calendar feed");
        Ok(feed_events)
    }
}

/// Undo the escaping of an iCalendar `TEXT` value.
///
/// Unknown escape sequences are kept as they are.
fn unescape_text(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => unescaped.push('\n'),
            Some(escaped @ ('\\' | ',' | ';')) => unescaped.push(escaped),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Decode the raw feed as UTF-8 text.
pub fn decode(bytes: &[u8]) -> FeedResult<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Download the raw feed.
///
/// This blocks until the whole body has been read.
pub fn fetch(url: &str) -> FeedResult<Vec<u8>> {
    debug!(url, "fetching calendar feed");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;
    debug!(url, bytes = bytes.len(), "fetched calendar feed");
    Ok(bytes.to_vec())
}
