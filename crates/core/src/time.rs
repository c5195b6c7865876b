use chrono::{DateTime, TimeZone};
use std::fmt;

const STAMP_FORMAT: &str = "%b %d, %Y, %I:%M %p";

// Payload timestamp, e.g. "Feb 05, 2026, 03:04 PM". Callers pass local time.
pub fn human_stamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    t.format(STAMP_FORMAT).to_string()
}
