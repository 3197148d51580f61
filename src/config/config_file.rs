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
use anyhow::{anyhow, Error};
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::fs::File;
use std::path::PathBuf;

/// Totals below this many euros are flagged in the budget table.
pub const LOW_TOTAL: f64 = 600.0;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub sheet: Option<Sheet>,
	pub directory: Option<Directory>,
	pub display: Option<Display>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sheet {
	/// Script endpoint serving the budgets sheet
	pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Directory {
	/// Seller directory to use instead of the bundled one
	pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Display {
	pub low_total: Option<f64>,
}

impl Config {
	/// Loads the config from the given path, or the default path if none.
	/// A missing file at the default path is created empty; a missing
	/// custom file is an error.
	pub fn load(custom_config_path: Option<&String>) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => home_dir()
				.ok_or_else(|| anyhow!("unable to determine home directory"))?
				.join(".config/presupuestos/config.toml"),
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read {}: {}", config_path.display(), e)
		})?;
		Config::parse(&content)
	}

	pub fn parse(content: &str) -> Result<Config, Error> {
		toml::from_str(content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))
	}

	pub fn low_total(&self) -> f64 {
		self.display
			.as_ref()
			.and_then(|d| d.low_total)
			.unwrap_or(LOW_TOTAL)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config() {
		let config = Config::parse("").unwrap();
		assert!(config.sheet.is_none());
		assert_eq!(config.low_total(), LOW_TOTAL);
	}

	#[test]
	fn test_full_config() {
		let config = Config::parse(
			r#"
			[sheet]
			url = "https://example.com/exec"

			[directory]
			path = "/etc/presupuestos/sellers.toml"

			[display]
			low_total = 450.0
			"#,
		)
		.unwrap();
		assert_eq!(
			config.sheet.unwrap().url.as_deref(),
			Some("https://example.com/exec")
		);
		assert_eq!(
			config.directory.unwrap().path.as_deref(),
			Some("/etc/presupuestos/sellers.toml")
		);
		assert_eq!(config.display.unwrap().low_total, Some(450.0));
	}

	#[test]
	fn test_bad_config() {
		assert!(Config::parse("[sheet]\nurl = 3").is_err());
	}

	#[test]
	fn test_missing_custom_file() {
		let path = "/nonexistent/presupuestos/config.toml".to_string();
		assert!(Config::load(Some(&path)).is_err());
	}
}
