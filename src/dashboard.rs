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
use crate::budget::aggregate::{
	by_section, by_seller, by_status, grand_total, SectionTotal, SellerTotal,
	StatusTotal,
};
use crate::budget::directory::SellerDirectory;
use crate::budget::edit::apply_update;
use crate::budget::enricher::{enrich, enrich_all, EnrichedRecord};
use crate::budget::filter::{available_sections, filter, Criteria};
use crate::budget::record::{BudgetRecord, BudgetUpdate, Status};
use crate::budget::sort::SortState;
use crate::sheet::store::{sample_budgets, BudgetStore};
use crate::util::date::today_sortable;
use anyhow::{bail, Error};
use tracing::warn;

/// Where the records currently on screen came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
	/// Nothing loaded yet
	Empty,
	Store,
	/// The store failed and the bundled sample data stands in
	Sample,
}

/// Result of saving an edit. The local change is kept either way; an
/// unconfirmed edit simply has not reached the store, and the next refresh
/// will show whatever the store holds.
#[derive(Debug, PartialEq)]
pub enum EditOutcome {
	Confirmed,
	Unconfirmed(String),
}

/// Summary cards and chart series for one filtered view.
pub struct Summary {
	pub count: usize,
	pub total_amount: f64,
	pub by_status: Vec<StatusTotal>,
	pub by_section: Vec<SectionTotal>,
	pub by_seller: Vec<SellerTotal>,
}

/// Owns the session: the budgets loaded from the store and the seller
/// directory used to classify them. All views are derived on demand from
/// these two by the pure functions in `budget`.
pub struct Dashboard<S: BudgetStore> {
	store: S,
	directory: SellerDirectory,
	records: Vec<BudgetRecord>,
	source: Source,
}

impl<S: BudgetStore> Dashboard<S> {
	pub fn new(store: S, directory: SellerDirectory) -> Self {
		Self {
			store,
			directory,
			records: Vec::new(),
			source: Source::Empty,
		}
	}

	/// Replaces the loaded budgets with a fresh copy from the store. A
	/// failing store is not an error for the user: the sample data is shown
	/// instead and the failure goes to the log.
	pub fn refresh(&mut self) -> Source {
		match self.store.fetch_budgets() {
			Ok(records) => {
				self.records = records;
				self.source = Source::Store;
			},
			Err(e) => {
				warn!("failed to fetch budgets, showing sample data: {:#}", e);
				self.records = sample_budgets();
				self.source = Source::Sample;
			},
		}
		self.source
	}

	pub fn records(&self) -> &[BudgetRecord] {
		&self.records
	}

	pub fn find(&self, id: &str) -> Option<EnrichedRecord<'_>> {
		self.records
			.iter()
			.find(|r| r.id == id)
			.map(|r| enrich(r, &self.directory))
	}

	/// Table rows for the given criteria and ordering.
	pub fn view(
		&self,
		criteria: &Criteria,
		sort: &SortState,
	) -> Vec<EnrichedRecord<'_>> {
		sort.apply(self.filtered(criteria))
	}

	/// Totals over the same records the table would show.
	pub fn summary(&self, criteria: &Criteria) -> Summary {
		let records = self.filtered(criteria);

		Summary {
			count: records.len(),
			total_amount: grand_total(&records),
			by_status: by_status(&records),
			by_section: by_section(&records),
			by_seller: by_seller(&records),
		}
	}

	pub fn sections(&self) -> Vec<String> {
		available_sections(
			&enrich_all(&self.records, &self.directory),
			&self.directory,
		)
	}

	/// Records the user's edit as of today.
	pub fn save(
		&mut self,
		id: &str,
		status: Status,
		notes: &str,
	) -> Result<EditOutcome, Error> {
		self.save_update(BudgetUpdate {
			id: id.to_string(),
			status,
			notes: notes.to_string(),
			managed_date: today_sortable(),
		})
	}

	/// Applies the edit locally, then forwards it to the store. The local
	/// change is never rolled back. Sample records are not the store's, so
	/// edits to them are refused.
	pub fn save_update(
		&mut self,
		update: BudgetUpdate,
	) -> Result<EditOutcome, Error> {
		if self.source == Source::Sample {
			bail!("budgets could not be loaded, refusing to edit sample data");
		}
		if !self.records.iter().any(|r| r.id == update.id) {
			bail!("no budget with reference {}", update.id);
		}

		self.records = apply_update(&self.records, &update);

		match self.store.update_budget(&update) {
			Ok(()) => Ok(EditOutcome::Confirmed),
			Err(e) => {
				warn!("failed to save budget {}: {:#}", update.id, e);
				Ok(EditOutcome::Unconfirmed(e.to_string()))
			},
		}
	}

	fn filtered(&self, criteria: &Criteria) -> Vec<EnrichedRecord<'_>> {
		filter(enrich_all(&self.records, &self.directory), criteria)
	}
}
