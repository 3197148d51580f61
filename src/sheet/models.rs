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
use crate::budget::record::{BudgetRecord, BudgetUpdate, Status};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

// ------------------------
// -- STATUS VOCABULARY --
// ------------------------

/// Labels the sheet may hold besides the canonical ones, lowercased.
/// "Pendiente" is what older versions of the dashboard wrote for a budget
/// still in progress. Never written back.
const LEGACY_LABELS: [(&str, Status); 1] = [("pendiente", Status::InProgress)];

/// Reads a status cell. Blank cells are budgets nobody has touched yet, so
/// they count as in progress, as does anything unrecognized.
pub fn status_from_sheet(label: &str) -> Status {
	let key = label.trim().to_lowercase();
	if key.is_empty() {
		return Status::InProgress;
	}

	let canonical = Status::ALL
		.iter()
		.find(|s| s.label().to_lowercase() == key)
		.copied();
	let legacy = || {
		LEGACY_LABELS
			.iter()
			.find(|(l, _)| *l == key)
			.map(|(_, status)| *status)
	};

	canonical.or_else(legacy).unwrap_or_else(|| {
		debug!("unknown status label {:?}, reading as in progress", label);
		Status::InProgress
	})
}

/// The sheet stores the canonical Spanish label.
pub fn status_to_sheet(status: Status) -> &'static str {
	status.label()
}

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct CacheBuster {
	pub t: i64,
}

/// Body of the update request. The endpoint reads it as plain text and
/// parses the JSON itself.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
	pub id: String,
	pub status: String,
	pub notes: String,
	pub fecha_gestion: String,
}

impl From<&BudgetUpdate> for UpdatePayload {
	fn from(update: &BudgetUpdate) -> Self {
		Self {
			id: update.id.clone(),
			status: status_to_sheet(update.status).to_string(),
			notes: update.notes.clone(),
			fecha_gestion: update.managed_date.clone(),
		}
	}
}

// ---------------
// -- RECEIVING --
// ---------------

/// One row of the budgets sheet as the endpoint serves it. Cells may come
/// through as strings, numbers or nulls depending on how they were typed,
/// so every field is read leniently. Also the on-disk format of exports.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SheetBudget {
	#[serde(default, deserialize_with = "text")]
	pub id: String,
	#[serde(default, deserialize_with = "text")]
	pub multi_acto: String,
	#[serde(default, deserialize_with = "text")]
	pub cliente: String,
	#[serde(default, deserialize_with = "text")]
	pub vendedor: String,
	#[serde(default, deserialize_with = "text")]
	pub seccion: String,
	#[serde(default, deserialize_with = "text")]
	pub fecha_creacion: String,
	#[serde(default, deserialize_with = "text")]
	pub dispo_el: String,
	#[serde(default, deserialize_with = "text")]
	pub tipo: String,
	#[serde(default, deserialize_with = "text")]
	pub estado: String,
	#[serde(default, deserialize_with = "text")]
	pub fecha_gestion: String,
	#[serde(default, deserialize_with = "amount")]
	pub total: f64,
	#[serde(default, deserialize_with = "text")]
	pub notas: String,

	/// "PRO" or "PRO Cartera" for the professional customer segment
	#[serde(
		default,
		deserialize_with = "optional_text",
		skip_serializing_if = "Option::is_none"
	)]
	pub pro_status: Option<String>,

	#[serde(
		default,
		deserialize_with = "flag",
		skip_serializing_if = "Option::is_none"
	)]
	pub is_pro: Option<bool>,
}

impl SheetBudget {
	pub fn into_record(self) -> BudgetRecord {
		let pro_status = self
			.pro_status
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty());
		let is_pro = self.is_pro.unwrap_or(false)
			|| pro_status
				.as_ref()
				.is_some_and(|s| s.to_uppercase().starts_with("PRO"));

		BudgetRecord {
			id: self.id.trim().to_string(),
			multi_act: self.multi_acto,
			client: self.cliente,
			seller: self.vendedor,
			section_raw: self.seccion,
			created_date: self.fecha_creacion,
			available_on: self.dispo_el,
			kind: self.tipo,
			status: status_from_sheet(&self.estado),
			managed_date: self.fecha_gestion,
			total: self.total,
			notes: self.notas,
			pro_status,
			is_pro,
		}
	}

}

/// Reference of a row as stored, whatever type the cell holds.
pub fn row_id(row: &Value) -> Option<String> {
	match row.get("id")? {
		Value::Null => None,
		Value::String(s) => Some(s.trim().to_string()),
		other => Some(other.to_string()),
	}
}

/// Writes an update into a stored row the same way the endpoint would. Only
/// the edited cells change; columns this crate does not model and cells in
/// their original formatting are left as they were.
pub fn patch_row(row: &mut Value, update: &BudgetUpdate) {
	if let Some(cells) = row.as_object_mut() {
		let payload = UpdatePayload::from(update);
		cells.insert("estado".to_string(), Value::String(payload.status));
		cells.insert("notas".to_string(), Value::String(payload.notes));
		cells.insert(
			"fechaGestion".to_string(),
			Value::String(payload.fecha_gestion),
		);
	}
}

/// Converts fetched rows into records. Rows without a reference cannot be
/// edited or told apart, so they are dropped, as are repeats of a reference
/// already seen.
pub fn records_from_rows(rows: Vec<SheetBudget>) -> Vec<BudgetRecord> {
	let mut seen = HashSet::new();
	let mut records = Vec::with_capacity(rows.len());

	for row in rows {
		let record = row.into_record();
		if record.id.is_empty() {
			warn!("skipping budget row without a reference");
			continue;
		}
		if !seen.insert(record.id.clone()) {
			warn!("skipping repeated budget reference {}", record.id);
			continue;
		}
		records.push(record);
	}

	records
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => String::new(),
		Value::String(s) => s,
		other => other.to_string(),
	})
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => None,
		Value::String(s) => Some(s),
		other => Some(other.to_string()),
	})
}

/// Totals may arrive as numbers, as plain numeric strings, or formatted the
/// Spanish way ("1.234,56 €"). Anything unreadable counts as zero.
fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	let parsed = match Value::deserialize(deserializer)? {
		Value::Number(num) => num.as_f64(),
		Value::String(s) => parse_amount(&s),
		_ => None,
	};

	Ok(parsed.filter(|v| v.is_finite()).unwrap_or(0.0))
}

fn parse_amount(s: &str) -> Option<f64> {
	let cleaned: String = s
		.chars()
		.filter(|c| !c.is_whitespace() && *c != '€')
		.collect();

	if cleaned.contains(',') {
		cleaned.replace('.', "").replace(',', ".").parse().ok()
	} else {
		cleaned.parse().ok()
	}
}

fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Bool(b) => Some(b),
		Value::Number(num) => Some(num.as_f64().is_some_and(|n| n != 0.0)),
		Value::String(s) => Some(matches!(
			s.trim().to_lowercase().as_str(),
			"true" | "1" | "si" | "sí" | "x"
		)),
		_ => None,
	})
}
