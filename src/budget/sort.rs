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
use crate::budget::enricher::EnrichedRecord;
use crate::util::date::timestamp;
use anyhow::{bail, Error};
use std::cmp::Ordering;

/// Columns the budget table can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
	Id,
	Client,
	Seller,
	Section,
	SellerType,
	Created,
	Managed,
	Status,
	Total,
}

impl SortKey {
	pub fn from_str(s: &str) -> Result<Self, Error> {
		match s.trim().to_lowercase().as_str() {
			"id" | "ref" => Ok(SortKey::Id),
			"client" => Ok(SortKey::Client),
			"seller" => Ok(SortKey::Seller),
			"section" => Ok(SortKey::Section),
			"type" => Ok(SortKey::SellerType),
			"created" => Ok(SortKey::Created),
			"managed" => Ok(SortKey::Managed),
			"status" => Ok(SortKey::Status),
			"total" => Ok(SortKey::Total),
			_ => bail!("unknown sort key: {}", s),
		}
	}

	/// Text of the given record under this key; only meaningful for the
	/// keys compared as text.
	fn text<'r>(&self, r: &'r EnrichedRecord) -> &'r str {
		match self {
			SortKey::Id => &r.record.id,
			SortKey::Client => &r.record.client,
			SortKey::Seller => &r.record.seller,
			SortKey::Section => &r.section,
			SortKey::SellerType => &r.seller_type,
			SortKey::Managed => &r.managed,
			SortKey::Status => r.record.status.label(),
			SortKey::Created => &r.created,
			SortKey::Total => "",
		}
	}

	pub fn compare(&self, a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
		match self {
			// unparsable dates count as the epoch, so they sort first
			SortKey::Created => {
				timestamp(&a.created).cmp(&timestamp(&b.created))
			},
			SortKey::Total => a.record.total.total_cmp(&b.record.total),
			_ => self
				.text(a)
				.to_lowercase()
				.cmp(&self.text(b).to_lowercase()),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	Asc,
	Desc,
}

impl Direction {
	pub fn flip(self) -> Self {
		match self {
			Direction::Asc => Direction::Desc,
			Direction::Desc => Direction::Asc,
		}
	}
}

/// Returns the records ordered by the given key. The sort is stable, so
/// records that compare equal keep their relative order.
pub fn sort<'a>(
	mut records: Vec<EnrichedRecord<'a>>,
	key: SortKey,
	direction: Direction,
) -> Vec<EnrichedRecord<'a>> {
	records.sort_by(|a, b| {
		let cmp = key.compare(a, b);
		match direction {
			Direction::Asc => cmp,
			Direction::Desc => cmp.reverse(),
		}
	});
	records
}

/// The ordering currently applied to the table, driven by column header
/// requests: asking for the current column again flips the direction,
/// while switching to another column always starts out descending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
	pub key: SortKey,
	pub direction: Direction,
}

impl Default for SortState {
	fn default() -> Self {
		Self {
			key: SortKey::Created,
			direction: Direction::Desc,
		}
	}
}

impl SortState {
	pub fn request(&mut self, key: SortKey) {
		if self.key == key {
			self.direction = self.direction.flip();
		} else {
			self.key = key;
			self.direction = Direction::Desc;
		}
	}

	pub fn apply<'a>(
		&self,
		records: Vec<EnrichedRecord<'a>>,
	) -> Vec<EnrichedRecord<'a>> {
		sort(records, self.key, self.direction)
	}
}
