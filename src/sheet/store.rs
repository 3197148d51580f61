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
use crate::config::config_file::Sheet;
use crate::sheet::http::Client;
use crate::sheet::models::{
	patch_row, records_from_rows, row_id, CacheBuster, SheetBudget,
	UpdatePayload,
};
use anyhow::{anyhow, bail, Error};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const SAMPLE_BUDGETS: &str = include_str!("../../data/sample_budgets.json");

/// Wherever budgets are kept. Fetching always returns the complete
/// collection; updates touch a single record.
pub trait BudgetStore {
	fn fetch_budgets(&self) -> Result<Vec<BudgetRecord>, Error>;

	fn update_budget(&self, update: &BudgetUpdate) -> Result<(), Error>;
}

/// The spreadsheet behind its script endpoint. Both operations go to the
/// same URL: GET reads every row, POST writes one.
pub struct SheetStore {
	http: Option<Client>,
}

impl SheetStore {
	pub fn new(config: Sheet) -> Self {
		SheetStore {
			http: config.url.as_deref().map(Client::new),
		}
	}

	fn http(&self) -> Result<&Client, Error> {
		self.http
			.as_ref()
			.ok_or_else(|| anyhow!("no sheet url in config"))
	}
}

impl BudgetStore for SheetStore {
	fn fetch_budgets(&self) -> Result<Vec<BudgetRecord>, Error> {
		// the endpoint sits behind caches that ignore request headers
		let rows: Vec<SheetBudget> = self.http()?.get(Some(CacheBuster {
			t: Utc::now().timestamp_millis(),
		}))?;

		Ok(records_from_rows(rows))
	}

	/// The endpoint's reply carries no useful information, so once the
	/// request is out the update counts as delivered.
	fn update_budget(&self, update: &BudgetUpdate) -> Result<(), Error> {
		let status = self.http()?.post_text(&UpdatePayload::from(update))?;
		if !status.is_success() {
			warn!("update of {} answered with status {}", update.id, status);
		}
		Ok(())
	}
}

/// A local JSON export of the sheet, in the same row format the endpoint
/// serves. Updates are written back into the file, touching only the
/// edited cells of the matching row.
pub struct FileStore {
	path: PathBuf,
}

impl FileStore {
	pub fn new(path: &str) -> Self {
		FileStore {
			path: PathBuf::from(path),
		}
	}

	fn read_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
		let content = fs::read_to_string(&self.path).map_err(|e| {
			anyhow!("failed to read {}: {}", self.path.display(), e)
		})?;
		serde_json::from_str(&content).map_err(|e| {
			anyhow!("failed to parse {}: {}", self.path.display(), e)
		})
	}
}

impl BudgetStore for FileStore {
	fn fetch_budgets(&self) -> Result<Vec<BudgetRecord>, Error> {
		Ok(records_from_rows(self.read_rows::<SheetBudget>()?))
	}

	fn update_budget(&self, update: &BudgetUpdate) -> Result<(), Error> {
		let mut rows = self.read_rows::<Value>()?;

		let Some(row) = rows
			.iter_mut()
			.find(|r| row_id(r).as_deref() == Some(update.id.as_str()))
		else {
			bail!("{} has no budget {}", self.path.display(), update.id);
		};
		patch_row(row, update);

		let mut content = serde_json::to_string_pretty(&rows)?;
		content.push('\n');
		fs::write(&self.path, content)?;
		Ok(())
	}
}

/// The small fixed dataset shown when the store cannot be reached.
pub fn sample_budgets() -> Vec<BudgetRecord> {
	match serde_json::from_str::<Vec<SheetBudget>>(SAMPLE_BUDGETS) {
		Ok(rows) => records_from_rows(rows),
		Err(e) => {
			warn!("bundled sample budgets are unreadable: {}", e);
			Vec::new()
		},
	}
}
