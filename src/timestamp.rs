//! UTC timestamps for posts.
//!
//! A post's creation time decides where it lands in the output tree
//! (`YYYY/MM/DD/`) and both creation and modification times can be shown in
//! the page through byline tokens. All times are UTC.
//!
//! Two fixed formats cover the date and the time of day:
//!
//! ```text
//! %Y,%m,%d  → "2024,03,05"   (path components)
//! %I,%M,%p  → "09,07,PM"     (12-hour clock)
//! ```
//!
//! The byline shown to readers is `DD-MM-YYYY at hh:mm AM/PM`, e.g.
//! `05-03-2024 at 09:07 PM`.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::time::SystemTime;

const DATE_FORMAT: &str = "%Y,%m,%d";
const TIME_FORMAT: &str = "%I,%M,%p";
const BYLINE_FORMAT: &str = "%d-%m-%Y at %I:%M %p";

/// A point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

/// Calendar day used as the archive key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    /// Zero-padded `(YYYY, MM, DD)` strings, used as directory names.
    pub fn components(&self) -> [String; 3] {
        [
            format!("{:04}", self.year),
            format!("{:02}", self.month),
            format!("{:02}", self.day),
        ]
    }
}

impl Timestamp {
    /// Build from calendar fields. Returns `None` for an impossible date or time.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .map(Self)
    }

    /// `[YYYY, MM, DD]` rendered with the fixed date format.
    pub fn date_fields(&self) -> Vec<String> {
        split_fields(&self.0.format(DATE_FORMAT).to_string())
    }

    /// `[hh, mm, AM|PM]` rendered with the fixed 12-hour time format.
    pub fn time_fields(&self) -> Vec<String> {
        split_fields(&self.0.format(TIME_FORMAT).to_string())
    }

    pub fn date_key(&self) -> DateKey {
        DateKey {
            year: self.0.year(),
            month: self.0.month(),
            day: self.0.day(),
        }
    }

    /// Human-readable `DD-MM-YYYY at hh:mm AM/PM`.
    pub fn byline(&self) -> String {
        self.0.format(BYLINE_FORMAT).to_string()
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self(DateTime::<Utc>::from(time))
    }
}

fn split_fields(s: &str) -> Vec<String> {
    s.split(',').map(str::to_string).collect()
}
