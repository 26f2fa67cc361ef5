//! Decodes raw `.ics` bytes into remote feed entries.
//!
//! Field values are kept in the feed's raw text form; date interpretation
//! happens during reconciliation, which is where a bad value has to abort
//! the whole cycle.

use icalendar::parser::{read_calendar, unfold, Component};
use thiserror::Error;

/// Wire date layout used by DTSTART/DTEND in the feed: compact `YYYYMMDD`.
pub const FEED_DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Error)]
#[error("invalid calendar document: {0}")]
pub struct ParseError(String);

/// One VEVENT from the remote feed, all fields verbatim.
/// `dtstart`/`dtend` are in the feed's compact `YYYYMMDD` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub uid: String,
    pub summary: String,
    pub dtstart: String,
    pub dtend: String,
}

#[derive(Debug)]
pub struct ParseOutcome {
    /// Entries in document order.
    pub entries: Vec<ParsedEntry>,
    /// VEVENTs dropped because a required field was missing. A degraded
    /// entry never aborts the batch.
    pub skipped: usize,
}

pub fn parse_feed(bytes: &[u8]) -> Result<ParseOutcome, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError(e.to_string()))?;
    let unfolded = unfold(text);
    let calendar = read_calendar(&unfolded).map_err(|e| ParseError(e.to_string()))?;

    let mut entries = Vec::new();
    let mut skipped = 0;

    for component in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        match entry_from_component(component) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    Ok(ParseOutcome { entries, skipped })
}

fn entry_from_component(vevent: &Component) -> Option<ParsedEntry> {
    Some(ParsedEntry {
        uid: vevent.find_prop("UID")?.val.to_string(),
        summary: vevent.find_prop("SUMMARY")?.val.to_string(),
        dtstart: vevent.find_prop("DTSTART")?.val.to_string(),
        dtend: vevent.find_prop("DTEND")?.val.to_string(),
    })
}
