/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
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
use anyhow::{bail, Error};
use std::fmt;

/// Where a budget stands in the sales pipeline. These four values are the
/// only vocabulary the dashboard core ever works with; any other label the
/// store might use is translated at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
	InProgress,
	Managing,
	Converted,
	Cancelled,
}

impl Status {
	/// Canonical order, used for summary cards and chart series.
	pub const ALL: [Status; 4] = [
		Status::InProgress,
		Status::Managing,
		Status::Converted,
		Status::Cancelled,
	];

	pub fn label(&self) -> &'static str {
		match self {
			Status::InProgress => "En curso",
			Status::Managing => "Gestionando",
			Status::Converted => "Transformado",
			Status::Cancelled => "Anulado",
		}
	}

	/// Whether the budget has reached an end state, after which a missing
	/// management date is no longer pending.
	pub fn is_closed(&self) -> bool {
		matches!(self, Status::Converted | Status::Cancelled)
	}

	/// Accepts either the Spanish label or the English variant name, in any
	/// case, with `-`, `_` or spaces between words.
	pub fn from_str(s: &str) -> Result<Self, Error> {
		let key: String = s
			.trim()
			.to_lowercase()
			.chars()
			.filter(|c| !matches!(c, ' ' | '-' | '_'))
			.collect();

		match key.as_str() {
			"encurso" | "inprogress" => Ok(Status::InProgress),
			"gestionando" | "managing" => Ok(Status::Managing),
			"transformado" | "converted" => Ok(Status::Converted),
			"anulado" | "cancelled" | "canceled" => Ok(Status::Cancelled),
			_ => bail!("unknown status: {}", s),
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.label())
	}
}

/// One budget ("presupuesto") row as held in the store.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetRecord {
	/// Act of sale reference; unique within a loaded collection
	pub id: String,
	pub multi_act: String,
	pub client: String,
	/// As typed in the sheet, possibly padded or in mixed case
	pub seller: String,
	/// Section from the sheet, used when the seller is not in the directory
	pub section_raw: String,
	pub created_date: String,
	pub available_on: String,
	pub kind: String,
	pub status: Status,
	/// Empty until a status change has been saved
	pub managed_date: String,
	pub total: f64,
	pub notes: String,
	pub pro_status: Option<String>,
	pub is_pro: bool,
}

impl BudgetRecord {
	/// A record with the given reference and everything else blank.
	pub fn new(id: &str) -> Self {
		Self {
			id: id.to_string(),
			multi_act: String::new(),
			client: String::new(),
			seller: String::new(),
			section_raw: String::new(),
			created_date: String::new(),
			available_on: String::new(),
			kind: String::new(),
			status: Status::InProgress,
			managed_date: String::new(),
			total: 0.0,
			notes: String::new(),
			pro_status: None,
			is_pro: false,
		}
	}
}

/// The status, notes and management date of one record, as entered by the
/// user. `managed_date` is stamped once, when the edit is confirmed.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetUpdate {
	pub id: String,
	pub status: Status,
	pub notes: String,
	pub managed_date: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_from_label() {
		assert_eq!(Status::from_str("En curso").unwrap(), Status::InProgress);
		assert_eq!(
			Status::from_str("TRANSFORMADO").unwrap(),
			Status::Converted
		);
		assert_eq!(Status::from_str("anulado").unwrap(), Status::Cancelled);
	}

	#[test]
	fn test_status_from_variant_name() {
		assert_eq!(
			Status::from_str("in-progress").unwrap(),
			Status::InProgress
		);
		assert_eq!(Status::from_str("Managing").unwrap(), Status::Managing);
		assert_eq!(Status::from_str("canceled").unwrap(), Status::Cancelled);
	}

	#[test]
	fn test_status_unknown() {
		assert!(Status::from_str("Pendiente").is_err());
		assert!(Status::from_str("").is_err());
	}

	#[test]
	fn test_status_round_trips_label() {
		for status in Status::ALL {
			assert_eq!(Status::from_str(status.label()).unwrap(), status);
		}
	}
}
