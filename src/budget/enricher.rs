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
use crate::budget::directory::SellerDirectory;
use crate::budget::record::BudgetRecord;
use crate::util::date::normalize_to_sortable;

/// Section reported for a budget whose seller is unknown and whose sheet row
/// carries no section either.
pub const UNKNOWN_SECTION: &str = "Sin sección";

/// A budget together with the fields the dashboard derives for it. Borrows
/// the underlying record; the pipeline never modifies it.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedRecord<'a> {
	pub record: &'a BudgetRecord,
	/// Directory section, else the sheet's section, else UNKNOWN_SECTION
	pub section: String,
	/// Directory type, or empty if the seller is not in the directory
	pub seller_type: String,
	/// Creation date in sortable form
	pub created: String,
	/// Management date in sortable form
	pub managed: String,
}

pub fn enrich<'a>(
	record: &'a BudgetRecord,
	directory: &SellerDirectory,
) -> EnrichedRecord<'a> {
	let entry = directory.lookup(&record.seller);

	let section = match entry {
		Some(entry) => entry.section.clone(),
		None if !record.section_raw.trim().is_empty() => {
			record.section_raw.clone()
		},
		None => UNKNOWN_SECTION.to_string(),
	};

	EnrichedRecord {
		record,
		section,
		seller_type: entry.map(|e| e.typ.clone()).unwrap_or_default(),
		created: normalize_to_sortable(&record.created_date),
		managed: normalize_to_sortable(&record.managed_date),
	}
}

pub fn enrich_all<'a>(
	records: &'a [BudgetRecord],
	directory: &SellerDirectory,
) -> Vec<EnrichedRecord<'a>> {
	records.iter().map(|r| enrich(r, directory)).collect()
}
