use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PressespiegelError;

/// Format of dates in settings and stored articles, e.g. `20.10.2020`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

lazy_static! {

    /// A trailing utc offset behind a time of day, `+0100`, `+01:00` or `Z`.
    pub(crate) static ref RE_UTC_OFFSET: Regex = Regex::new(r"(?i)(\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)\s*(?:z|[+-]\d{2}:?\d{2})$").unwrap();

}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d.%m.%Y, %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", DATE_FORMAT, "%Y/%m/%d", "%d/%m/%Y"];

/// Parse a `dd.mm.YYYY` settings date, at midnight.
pub fn parse_setting_date(s: &str) -> Result<NaiveDateTime, PressespiegelError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| PressespiegelError::UnparsableDate {
            input: s.to_string(),
        })
}

/// Parse an article's publication or modification date.
///
/// The wall clock time of the outlet is kept, utc offsets are dropped. Known
/// ISO and German formats are tried first, then fuzzy parsing with
/// `dtparse`.
pub fn parse_publication_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.naive_local());
    }

    let local = RE_UTC_OFFSET.replace(s, "$1");
    for format in DATE_TIME_FORMATS.iter() {
        if let Ok(date) = NaiveDateTime::parse_from_str(&local, format) {
            return Some(date);
        }
    }
    for format in DATE_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(&local, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    fuzzy_dtparse(&local)
}

fn fuzzy_dtparse(s: &str) -> Option<NaiveDateTime> {
    let mut tzinfod = HashMap::new();
    tzinfod.insert("CET".to_string(), 3600);
    tzinfod.insert("CEST".to_string(), 7200);
    let parser = dtparse::Parser::default();
    parser
        .parse(
            s,
            Some(true), /* German dates put the day first */
            None,
            true, /* turns on fuzzy mode */
            true, /* gives us the tokens that weren't recognized */
            None,
            true,
            &tzinfod,
        )
        .map(|(date, _, _)| date)
        .ok()
}

/// The publication window relevant articles have to fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Parse the range from two `dd.mm.YYYY` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self, PressespiegelError> {
        let range = DateRange::new(parse_setting_date(start)?, parse_setting_date(end)?);
        if range.start > range.end {
            return Err(PressespiegelError::configuration(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(range)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether `date` lies before the start or after the end of the range.
    ///
    /// Both bounds are midnight, so articles published later on the end date
    /// are out of date.
    pub fn is_out_of_date(&self, date: &NaiveDateTime) -> bool {
        *date < self.start || *date > self.end
    }
}

/// (De)serialize dates as `dd.mm.YYYY`.
pub mod german_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module, for optional dates stored as `null`.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{self, Deserialize, Deserializer, Serializer};

        use super::super::DATE_FORMAT;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
