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
use crate::budget::record::{BudgetRecord, BudgetUpdate};

/// Returns a copy of the collection with the update applied to the record
/// carrying its id. Every other record is left exactly as it was; an id
/// that matches nothing leaves the whole collection unchanged.
pub fn apply_update(
	records: &[BudgetRecord],
	update: &BudgetUpdate,
) -> Vec<BudgetRecord> {
	records
		.iter()
		.map(|r| {
			if r.id != update.id {
				return r.clone();
			}

			BudgetRecord {
				status: update.status,
				notes: update.notes.clone(),
				managed_date: update.managed_date.clone(),
				..r.clone()
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::budget::record::Status;

	fn collection() -> Vec<BudgetRecord> {
		let mut first = BudgetRecord::new("513497");
		first.client = "Reformas Safor SL".to_string();
		first.total = 2450.0;
		first.notes = "Llamar el lunes".to_string();

		let mut second = BudgetRecord::new("513544");
		second.client = "Ana Pons".to_string();
		second.status = Status::Managing;
		second.managed_date = "2024-11-20".to_string();

		vec![first, second]
	}

	#[test]
	fn test_only_target_changes() {
		let before = collection();
		let update = BudgetUpdate {
			id: "513497".to_string(),
			status: Status::Converted,
			notes: "Firmado".to_string(),
			managed_date: "2024-12-03".to_string(),
		};
		let after = apply_update(&before, &update);

		assert_eq!(after.len(), 2);
		assert_eq!(after[0].status, Status::Converted);
		assert_eq!(after[0].notes, "Firmado");
		assert_eq!(after[0].managed_date, "2024-12-03");
		assert_eq!(after[0].client, before[0].client);
		assert_eq!(after[0].total, before[0].total);
		assert_eq!(after[1], before[1]);
	}

	#[test]
	fn test_unknown_id_is_a_no_op() {
		let before = collection();
		let update = BudgetUpdate {
			id: "000000".to_string(),
			status: Status::Cancelled,
			notes: String::new(),
			managed_date: "2024-12-03".to_string(),
		};
		assert_eq!(apply_update(&before, &update), before);
	}
}
