use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

/// Format used both for store keys and for command line dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
	NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).with_context(|| format!("invalid date: {}", s))
}

pub fn parse_or_today(s: Option<&str>) -> Result<NaiveDate> {
	match s {
		Some(v) => parse_date(v),
		None => Ok(today()),
	}
}

pub fn today() -> NaiveDate {
	Local::now().date_naive()
}

/// ISO-8601 key under which tasks for `date` are stored.
pub fn date_key(date: NaiveDate) -> String {
	date.format(DATE_FORMAT).to_string()
}
