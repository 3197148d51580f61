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

//! Totals behind the summary cards and charts. Every function here works
//! over exactly the records it is handed (normally the filtered view) and
//! never filters on its own.

use crate::budget::enricher::EnrichedRecord;
use crate::budget::record::Status;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, PartialEq)]
pub struct StatusTotal {
	pub status: Status,
	pub amount: f64,
	pub count: usize,
	/// Share of the amount across all statuses, 0-100
	pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionTotal {
	pub section: String,
	pub per_status_amount: BTreeMap<Status, f64>,
	pub total_amount: f64,
	/// Share of the section's own total, 0-100
	pub per_status_percentage: BTreeMap<Status, f64>,
}

/// Per-status amounts for a single seller, as stacked in the seller chart.
#[derive(Clone, Debug, PartialEq)]
pub struct SellerTotal {
	pub seller: String,
	pub per_status_amount: BTreeMap<Status, f64>,
	pub total_amount: f64,
}

pub fn grand_total(records: &[EnrichedRecord]) -> f64 {
	records.iter().map(|r| r.record.total).sum()
}

/// One entry per status, in canonical order, including statuses with no
/// records at all.
pub fn by_status(records: &[EnrichedRecord]) -> Vec<StatusTotal> {
	let total = grand_total(records);

	Status::ALL
		.iter()
		.map(|&status| {
			let (amount, count) = records
				.iter()
				.filter(|r| r.record.status == status)
				.fold((0.0, 0), |(amount, count), r| {
					(amount + r.record.total, count + 1)
				});

			StatusTotal {
				status,
				amount,
				count,
				percentage: percentage(amount, total),
			}
		})
		.collect()
}

/// One entry per section present in the records, largest total first.
pub fn by_section(records: &[EnrichedRecord]) -> Vec<SectionTotal> {
	group_by_status(records, |r| r.section.clone())
		.into_iter()
		.map(|(section, per_status_amount, total_amount)| {
			let per_status_percentage = per_status_amount
				.iter()
				.map(|(&status, &amount)| {
					(status, percentage(amount, total_amount))
				})
				.collect();

			SectionTotal {
				section,
				per_status_amount,
				total_amount,
				per_status_percentage,
			}
		})
		.collect()
}

/// One entry per seller present in the records, largest total first.
pub fn by_seller(records: &[EnrichedRecord]) -> Vec<SellerTotal> {
	group_by_status(records, |r| r.record.seller.trim().to_string())
		.into_iter()
		.map(|(seller, per_status_amount, total_amount)| SellerTotal {
			seller,
			per_status_amount,
			total_amount,
		})
		.collect()
}

/// Groups the records by the given key, summing amounts per status. Groups
/// come back ordered by descending total; equal totals keep the order in
/// which their group first appeared.
fn group_by_status<F>(
	records: &[EnrichedRecord],
	key: F,
) -> Vec<(String, BTreeMap<Status, f64>, f64)>
where
	F: Fn(&EnrichedRecord) -> String,
{
	let mut positions: HashMap<String, usize> = HashMap::new();
	let mut groups: Vec<(String, BTreeMap<Status, f64>, f64)> = Vec::new();

	for r in records {
		let name = key(r);
		let idx = *positions.entry(name.clone()).or_insert_with(|| {
			let empty = Status::ALL.iter().map(|&s| (s, 0.0)).collect();
			groups.push((name, empty, 0.0));
			groups.len() - 1
		});

		let (_, per_status, total) = &mut groups[idx];
		*per_status.entry(r.record.status).or_insert(0.0) += r.record.total;
		*total += r.record.total;
	}

	groups.sort_by(|a, b| b.2.total_cmp(&a.2));
	groups
}

fn percentage(amount: f64, total: f64) -> f64 {
	if total == 0.0 {
		0.0
	} else {
		amount / total * 100.0
	}
}
