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
use anyhow::{anyhow, Error};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

const BUILTIN_DIRECTORY: &str = include_str!("../../data/sellers.toml");

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SellerEntry {
	#[serde(rename = "type")]
	pub typ: String,
	pub section: String,
}

#[derive(Deserialize)]
struct DirectoryFile {
	#[serde(default)]
	sections: Vec<String>,
	#[serde(default)]
	sellers: BTreeMap<String, SellerEntry>,
}

/// Static table from seller name to seller type and section, loaded once at
/// start-up. Built from the bundled table unless the config points at
/// another file.
///
/// A seller being absent is the normal case for new or temporary staff, so
/// lookups return an Option and callers supply their own fallback.
pub struct SellerDirectory {
	sellers: HashMap<String, SellerEntry>, // normalized name -> entry
	sections: Vec<String>,
}

impl SellerDirectory {
	pub fn builtin() -> Result<Self, Error> {
		SellerDirectory::from_toml(BUILTIN_DIRECTORY)
			.map_err(|e| anyhow!("bundled seller directory: {}", e))
	}

	pub fn load(path: &Path) -> Result<Self, Error> {
		let content = fs::read_to_string(path).map_err(|e| {
			anyhow!("failed to read {}: {}", path.display(), e)
		})?;
		SellerDirectory::from_toml(&content)
	}

	pub fn from_toml(content: &str) -> Result<Self, Error> {
		let file: DirectoryFile = toml::from_str(content)
			.map_err(|e| anyhow!("failed to parse seller directory: {}", e))?;

		let sellers = file
			.sellers
			.into_iter()
			.map(|(name, entry)| (normalize(&name), entry))
			.collect();

		Ok(Self {
			sellers,
			sections: file.sections,
		})
	}

	pub fn lookup(&self, seller: &str) -> Option<&SellerEntry> {
		self.sellers.get(&normalize(seller))
	}

	/// Sections that should always be offered for filtering, even when no
	/// loaded budget currently falls into them.
	pub fn official_sections(&self) -> &[String] {
		&self.sections
	}

	pub fn len(&self) -> usize {
		self.sellers.len()
	}
}

fn normalize(name: &str) -> String {
	name.trim().to_uppercase()
}
