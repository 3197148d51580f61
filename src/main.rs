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
use crate::budget::filter::Criteria;
use crate::budget::record::Status;
use crate::budget::sort::{Direction, SortKey, SortState};
use crate::config::config_file::Config;
use crate::dashboard::{Dashboard, EditOutcome, Source};
use crate::reports::budget_reporter::BudgetReporter;
use crate::reports::summary_reporter::SummaryReporter;
use crate::sheet::store::{BudgetStore, FileStore, SheetStore};
use anyhow::{anyhow, bail, Error};
use clap::{Parser, ValueEnum};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod budget;
mod config;
mod dashboard;
mod reports;
mod sheet;
mod util;

#[derive(Parser)]
#[command(
	name = "presupuestos",
	version = "0.3",
	about = "Sales budget tracking dashboard"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The budget reference for the Show and Update commands
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Read budgets from this JSON export instead of the sheet
	#[arg(short, long)]
	file: Option<String>,

	/// Custom config file location
	/// (default: ~/.config/presupuestos/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Free-text search over reference and client
	#[arg(short, long)]
	search: Option<String>,

	/// Only budgets in this section
	#[arg(long)]
	section: Option<String>,

	/// Only budgets in this status (e.g. "En curso", "Transformado")
	#[arg(long)]
	status: Option<String>,

	/// Only budgets from this seller
	#[arg(long)]
	seller: Option<String>,

	/// Only budgets from this seller type (VP, VE, PRO)
	#[arg(short = 't', long)]
	seller_type: Option<String>,

	/// Ignore budgets created before this date (YYYY-MM-DD)
	#[arg(short = 'b', long = "from")]
	from: Option<String>,

	/// Ignore budgets created after this date (YYYY-MM-DD)
	#[arg(short = 'e', long = "to")]
	to: Option<String>,

	/// Only budgets managed on or after this date (YYYY-MM-DD)
	#[arg(long)]
	since: Option<String>,

	/// Column to order the list by
	#[arg(long)]
	sort: Option<String>,

	/// Order ascending instead of descending
	#[arg(long)]
	asc: bool,

	/// New status for the Update command
	#[arg(long)]
	set_status: Option<String>,

	/// New notes for the Update command (default: keep the current notes)
	#[arg(long)]
	notes: Option<String>,
}

impl Cli {
	fn criteria(&self) -> Result<Criteria, Error> {
		Ok(Criteria {
			search: self.search.clone(),
			section: self.section.clone(),
			status: self.status.as_deref().map(Status::from_str).transpose()?,
			seller: self.seller.clone(),
			seller_type: self.seller_type.clone(),
			date_from: self.from.clone(),
			date_since: self.since.clone(),
			date_to: self.to.clone(),
		})
	}

	fn sort_state(&self) -> Result<SortState, Error> {
		let mut state = SortState::default();
		if let Some(key) = &self.sort {
			state.key = SortKey::from_str(key)?;
		}
		if self.asc {
			state.direction = Direction::Asc;
		}
		Ok(state)
	}

	fn reference(&self) -> Result<&str, Error> {
		self.term
			.as_deref()
			.ok_or_else(|| anyhow!("No budget reference specified"))
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	List,     // filtered, sorted budget table
	Summary,  // status cards and section distribution
	Sellers,  // per-seller totals
	Sections, // every section available for filtering

	Show,   // one budget in full
	Update, // change a budget's status and notes
}

fn main() -> Result<(), Error> {
	// stdout is reserved for reports
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	let args = Cli::parse();
	let mut config = Config::load(args.config.as_ref())?;

	let directory_path =
		config.directory.as_ref().and_then(|d| d.path.as_ref());
	let directory = match directory_path {
		Some(path) => SellerDirectory::load(Path::new(path))?,
		None => SellerDirectory::builtin()?,
	};
	debug!("seller directory holds {} sellers", directory.len());

	let low_total = config.low_total();

	match &args.file {
		Some(file) => run(
			&args,
			low_total,
			Dashboard::new(FileStore::new(file), directory),
		),
		None => {
			let sheet = config.sheet.take().unwrap_or_default();
			run(
				&args,
				low_total,
				Dashboard::new(SheetStore::new(sheet), directory),
			)
		},
	}
}

fn run<S: BudgetStore>(
	args: &Cli,
	low_total: f64,
	mut dashboard: Dashboard<S>,
) -> Result<(), Error> {
	let criteria = args.criteria()?;
	let sort = args.sort_state()?;

	if dashboard.refresh() == Source::Sample {
		eprintln!("Budgets unavailable, showing sample data");
	}
	debug!("{} budgets loaded", dashboard.records().len());

	match args.command {
		Directive::List => {
			let rows = dashboard.view(&criteria, &sort);
			BudgetReporter::new(rows, low_total).print_list();
		},
		Directive::Summary => {
			SummaryReporter::new(dashboard.summary(&criteria)).print_summary()
		},
		Directive::Sellers => {
			SummaryReporter::new(dashboard.summary(&criteria)).print_sellers()
		},
		Directive::Sections => {
			SummaryReporter::print_sections(&dashboard.sections())
		},
		Directive::Show => {
			let id = args.reference()?;
			match dashboard.find(id) {
				Some(record) => BudgetReporter::print_detail(&record),
				None => bail!("No budget with reference {}", id),
			}
		},
		Directive::Update => update(args, &mut dashboard)?,
	}

	Ok(())
}

fn update<S: BudgetStore>(
	args: &Cli,
	dashboard: &mut Dashboard<S>,
) -> Result<(), Error> {
	let id = args.reference()?;
	let Some(status) = &args.set_status else {
		bail!("No status specified (use --set-status)");
	};
	let status = Status::from_str(status)?;

	let notes = match &args.notes {
		Some(notes) => notes.clone(),
		None => match dashboard.find(id) {
			Some(current) => current.record.notes.clone(),
			None => bail!("No budget with reference {}", id),
		},
	};

	let outcome = dashboard.save(id, status, &notes)?;
	println!("{}", outcome_message(id, &outcome));

	Ok(())
}

fn outcome_message(id: &str, outcome: &EditOutcome) -> String {
	match outcome {
		EditOutcome::Confirmed => format!("Saved {}", id),
		EditOutcome::Unconfirmed(reason) => format!(
			"Update of {} was not confirmed by the store: {}",
			id, reason
		),
	}
}
