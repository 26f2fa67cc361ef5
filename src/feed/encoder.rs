//! Regenerates a `.ics` document from stored rows, round-tripping the four
//! persisted fields. DTSTART/DTEND come back out as `VALUE=DATE` properties
//! in the same compact form the remote feed uses.

use chrono::NaiveDate;
use icalendar::{Calendar, Component, Event, Property, ValueType};

use crate::feed::parser::FEED_DATE_FORMAT;
use crate::store::EventRecord;

pub fn encode_calendar(records: &[EventRecord]) -> String {
    let mut calendar = Calendar::new();

    for record in records {
        let mut event = Event::new();
        event.uid(&record.uid);
        event.summary(&record.summary);
        add_date_property(&mut event, "DTSTART", record.start);
        add_date_property(&mut event, "DTEND", record.end);
        calendar.push(event.done());
    }

    calendar.done().to_string()
}

fn add_date_property(event: &mut Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format(FEED_DATE_FORMAT).to_string());
    prop.append_parameter(ValueType::Date);
    event.append_property(prop);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parser;
    use pretty_assertions::assert_eq;

    fn record(uid: &str, summary: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> EventRecord {
        EventRecord {
            uid: uid.to_string(),
            summary: summary.to_string(),
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_dates_carry_value_date_parameter() {
        let ics = encode_calendar(&[record(
            "1001@example.com",
            "Reserved",
            (2024, 1, 1),
            (2024, 1, 3),
        )]);

        assert!(ics.contains("DTSTART;VALUE=DATE:20240101"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND;VALUE=DATE:20240103"), "ICS:\n{}", ics);
        assert!(ics.contains("UID:1001@example.com"), "ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Reserved"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_encode_then_parse_round_trips_all_fields() {
        let records = vec![
            record("1001@example.com", "Reserved", (2024, 1, 1), (2024, 1, 3)),
            record("1002@example.com", "Not available", (2024, 2, 10), (2024, 2, 14)),
            record("1003@example.com", "Reserved", (2024, 12, 30), (2025, 1, 2)),
        ];

        let ics = encode_calendar(&records);
        let outcome = parser::parse_feed(ics.as_bytes()).unwrap();
        assert_eq!(outcome.skipped, 0);

        let mut recovered: Vec<EventRecord> = outcome
            .entries
            .iter()
            .map(|e| EventRecord {
                uid: e.uid.clone(),
                summary: e.summary.clone(),
                start: NaiveDate::parse_from_str(&e.dtstart, FEED_DATE_FORMAT).unwrap(),
                end: NaiveDate::parse_from_str(&e.dtend, FEED_DATE_FORMAT).unwrap(),
            })
            .collect();
        recovered.sort_by(|a, b| a.uid.cmp(&b.uid));

        assert_eq!(recovered, records);
    }

    #[test]
    fn test_empty_store_is_a_valid_empty_calendar() {
        let ics = encode_calendar(&[]);
        let outcome = parser::parse_feed(ics.as_bytes()).unwrap();
        assert!(outcome.entries.is_empty());
    }
}
