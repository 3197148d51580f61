/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

//! Dates arrive from the spreadsheet in whatever shape the cell happened to
//! hold. Everything downstream works on one of two canonical forms: the
//! sortable `YYYY-MM-DD`, which orders correctly under plain string
//! comparison, and the display form `DD/MM/YYYY`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Shown in place of a date that is missing altogether.
pub const EMPTY_DISPLAY: &str = "--/--/----";

const SORTABLE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

const DATE_FORMATS: [&str; 4] =
	["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 5] = [
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M:%S%.f",
	"%d/%m/%Y %H:%M:%S",
	"%d/%m/%Y %H:%M",
];

struct Shapes {
	display: Regex,
	sortable_prefix: Regex,
}

fn shapes() -> &'static Shapes {
	static SHAPES: OnceLock<Shapes> = OnceLock::new();
	SHAPES.get_or_init(|| Shapes {
		display: Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap(),
		sortable_prefix: Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").unwrap(),
	})
}

/// Converts a raw cell value into `YYYY-MM-DD`. Blank input yields an empty
/// string; input that cannot be read as a date is handed back unchanged so
/// that sorting degrades rather than fails.
pub fn normalize_to_sortable(raw: &str) -> String {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return String::new();
	}

	match parse(trimmed) {
		Some(date) => date.format(SORTABLE_FORMAT).to_string(),
		None => raw.to_string(),
	}
}

/// Renders a (normally already sortable) date as `DD/MM/YYYY`.
pub fn format_for_display(value: &str) -> String {
	let value = value.trim();
	if value.is_empty() {
		return EMPTY_DISPLAY.to_string();
	}

	let shapes = shapes();
	if shapes.display.is_match(value) {
		return value.to_string();
	}

	if let Some(caps) = shapes.sortable_prefix.captures(value) {
		return format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]);
	}

	if let Some(date) = parse(value) {
		return date.format(DISPLAY_FORMAT).to_string();
	}

	// last resort for long or malformed cells: keep only the first token
	match value.split(' ').next() {
		Some(head) if !head.is_empty() => head.to_string(),
		_ => EMPTY_DISPLAY.to_string(),
	}
}

/// Milliseconds since the epoch at midnight UTC of the given date, or 0 if
/// the value is not a recognizable date.
pub fn timestamp(value: &str) -> i64 {
	parse(value.trim())
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.map(|dt| dt.and_utc().timestamp_millis())
		.unwrap_or(0)
}

/// Today's local date in sortable form, used to stamp management dates.
pub fn today_sortable() -> String {
	Local::now().date_naive().format(SORTABLE_FORMAT).to_string()
}

fn parse(value: &str) -> Option<NaiveDate> {
	if value.is_empty() {
		return None;
	}

	// spreadsheet exports sometimes hand over raw epoch seconds or millis
	if value.chars().all(|c| c.is_ascii_digit()) {
		let epoch = value.parse::<i64>().ok();
		let dt = match value.len() {
			10 => epoch.and_then(|secs| DateTime::from_timestamp(secs, 0)),
			13 => epoch.and_then(DateTime::from_timestamp_millis),
			_ => None,
		};
		if let Some(dt) = dt {
			return Some(dt.date_naive());
		}
	}

	if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
		return Some(dt.with_timezone(&Utc).date_naive());
	}

	if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
		return Some(dt.with_timezone(&Utc).date_naive());
	}

	for format in DATETIME_FORMATS {
		if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
			return Some(dt.date());
		}
	}

	DATE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}
