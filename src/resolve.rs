//! Date/time resolution.
//!
//! The [`DateResolver`] trait is the seam to whatever turns natural-language
//! context into an absolute timestamp. The built-in [`ChronoResolver`] is a
//! best-guess scanner over the whole input text: weekday names (plural
//! included), "today"/"tomorrow", month + day, bare ordinals, and clock
//! times. It always resolves relative to an explicit reference instant, so
//! runs are reproducible; [`ChronoResolver::default`] pins the reference to
//! the current local time.
//!
//! Output format is `%m/%d/%y %H:%M`. Phrases with no clock time resolve at
//! [`DEFAULT_HOUR`]:00.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Hour of day used when a phrase carries no clock time.
pub const DEFAULT_HOUR: u32 = 9;

const STAMP_FORMAT: &str = "%m/%d/%y %H:%M";

/// Trait for date/time resolution services.
pub trait DateResolver: Send + Sync {
    /// Resolve a best-guess timestamp from the entire input text.
    fn resolve(&self, context: &str) -> Result<String>;

    /// Resolve the next occurrence of a fixed calendar date (month, day).
    fn resolve_month_day(&self, month: u32, day: u32) -> Result<String>;
}

/// The built-in chrono-based resolver.
#[derive(Debug, Clone, Copy)]
pub struct ChronoResolver {
    reference: NaiveDateTime,
}

impl Default for ChronoResolver {
    fn default() -> Self {
        Self {
            reference: Local::now().naive_local(),
        }
    }
}

static CLOCK_AMPM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*([ap]m)\b").unwrap());
static CLOCK_24: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());
static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)s?\b").unwrap()
});
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?\b",
    )
    .unwrap()
});
static BARE_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

const ORDINAL_WORDS: &[(&str, u32)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
];

impl ChronoResolver {
    /// Create a resolver pinned to an explicit reference instant.
    #[must_use]
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self { reference }
    }

    /// The reference instant resolutions are relative to.
    #[must_use]
    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    fn scan_time(lower: &str) -> Option<NaiveTime> {
        if let Some(caps) = CLOCK_AMPM.captures(lower) {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let hour = match (&caps[3], hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                ("pm", h) => h + 12,
                _ => hour,
            };
            return NaiveTime::from_hms_opt(hour, minute, 0);
        }
        if let Some(caps) = CLOCK_24.captures(lower) {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps[2].parse().ok()?;
            return NaiveTime::from_hms_opt(hour, minute, 0);
        }
        let word_time = [
            ("midnight", 0),
            ("noon", 12),
            ("morning", 9),
            ("afternoon", 15),
            ("evening", 19),
            ("tonight", 20),
            ("night", 21),
        ]
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|(_, h)| *h)?;
        NaiveTime::from_hms_opt(word_time, 0, 0)
    }

    fn scan_date(&self, lower: &str) -> Option<NaiveDate> {
        let today = self.reference.date();
        if lower.contains("today") || lower.contains("tonight") {
            return Some(today);
        }
        if lower.contains("tomorrow") {
            return Some(today + Duration::days(1));
        }
        if let Some(caps) = MONTH_DAY.captures(lower) {
            let month = month_number(&caps[1]);
            let day: u32 = caps[2].parse().ok()?;
            let date = NaiveDate::from_ymd_opt(today.year(), month, day)
                .or_else(|| NaiveDate::from_ymd_opt(today.year() + 1, month, day))?;
            return Some(if date < today {
                NaiveDate::from_ymd_opt(today.year() + 1, month, day)?
            } else {
                date
            });
        }
        if let Some(caps) = WEEKDAY.captures(lower) {
            let target = weekday_of(&caps[1]);
            let ahead = days_until(today.weekday(), target);
            return Some(today + Duration::days(i64::from(ahead)));
        }
        if lower.contains("weekend") {
            let ahead = days_until(today.weekday(), Weekday::Sat);
            return Some(today + Duration::days(i64::from(ahead)));
        }
        if let Some(day) = BARE_ORDINAL
            .captures(lower)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .or_else(|| {
                ORDINAL_WORDS
                    .iter()
                    .find(|(w, _)| lower.split_whitespace().any(|t| t.trim_matches(|c: char| !c.is_alphanumeric()) == *w))
                    .map(|(_, d)| *d)
            })
        {
            let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), day);
            return match this_month {
                Some(date) if date >= today => Some(date),
                _ => {
                    let (year, month) = if today.month() == 12 {
                        (today.year() + 1, 1)
                    } else {
                        (today.year(), today.month() + 1)
                    };
                    NaiveDate::from_ymd_opt(year, month, day)
                }
            };
        }
        None
    }
}

impl DateResolver for ChronoResolver {
    fn resolve(&self, context: &str) -> Result<String> {
        let lower = context.to_lowercase();
        let time = Self::scan_time(&lower);
        let date = self.scan_date(&lower);
        // No cues at all still yields the reference date; the caller only
        // asks when the annotator saw something temporal.
        let date = date.unwrap_or_else(|| self.reference.date());
        let time =
            time.unwrap_or_else(|| NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).expect("valid"));
        Ok(NaiveDateTime::new(date, time).format(STAMP_FORMAT).to_string())
    }

    fn resolve_month_day(&self, month: u32, day: u32) -> Result<String> {
        let today = self.reference.date();
        let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)
            .filter(|d| *d >= today)
            .or_else(|| NaiveDate::from_ymd_opt(today.year() + 1, month, day))
            .ok_or_else(|| Error::resolution(format!("invalid calendar date {month}-{day}")))?;
        let time = NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).expect("valid");
        Ok(NaiveDateTime::new(candidate, time)
            .format(STAMP_FORMAT)
            .to_string())
    }
}

fn month_number(name: &str) -> u32 {
    match name {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        _ => 12,
    }
}

fn weekday_of(name: &str) -> Weekday {
    match name {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Days ahead to the next occurrence of `target`, strictly in the future.
fn days_until(from: Weekday, target: Weekday) -> u32 {
    let diff = (7 + target.num_days_from_monday() - from.num_days_from_monday()) % 7;
    if diff == 0 {
        7
    } else {
        diff
    }
}

/// Static holiday name → calendar date table.
///
/// Names are matched case-insensitively. Only fixed-date holidays carry a
/// date; movable feasts (Easter, Thanksgiving, ...) can still be tagged by
/// the gazetteer but resolve only if the operator configures a date.
#[derive(Debug, Clone)]
pub struct HolidayTable {
    dates: BTreeMap<String, (u32, u32)>,
}

impl Default for HolidayTable {
    fn default() -> Self {
        let mut dates = BTreeMap::new();
        for (name, month, day) in [
            ("Christmas", 12, 25),
            ("Valentine's Day", 2, 14),
            ("Halloween", 10, 31),
            ("New Year's Eve", 12, 31),
            ("New Year's Day", 1, 1),
            ("Saint Patrick's Day", 3, 17),
        ] {
            dates.insert(name.to_lowercase(), (month, day));
        }
        Self { dates }
    }
}

impl HolidayTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dates: BTreeMap::new(),
        }
    }

    /// Build from (name, "MM-DD") pairs; entries with no date are skipped.
    #[must_use]
    pub fn from_config(holidays: &BTreeMap<String, Option<String>>) -> Self {
        let mut table = Self::new();
        for (name, date) in holidays {
            if let Some(date) = date {
                if let Some((month, day)) = parse_month_day(date) {
                    table.insert(name, month, day);
                } else {
                    log::warn!("ignoring malformed holiday date {date:?} for {name:?}");
                }
            }
        }
        table
    }

    /// Insert one holiday.
    pub fn insert(&mut self, name: &str, month: u32, day: u32) {
        self.dates.insert(name.to_lowercase(), (month, day));
    }

    /// Look up a holiday's (month, day) by name, case-insensitively.
    #[must_use]
    pub fn date_of(&self, name: &str) -> Option<(u32, u32)> {
        self.dates.get(&name.to_lowercase()).copied()
    }

    /// Number of dated holidays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if no holiday carries a date.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

fn parse_month_day(s: &str) -> Option<(u32, u32)> {
    let (m, d) = s.split_once('-')?;
    let month: u32 = m.trim().parse().ok()?;
    let day: u32 = d.trim().parse().ok()?;
    if (1..=12).contains(&month) && (1..=31).contains(&day) {
        Some((month, day))
    } else {
        None
    }
}
