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
use crate::budget::record::Status;
use crate::dashboard::Summary;
use crate::reports::table::Table;
use crate::util::amount::Euros;
use std::collections::BTreeMap;

pub struct SummaryReporter {
	summary: Summary,
}

impl SummaryReporter {
	pub fn new(summary: Summary) -> Self {
		Self { summary }
	}

	/// One card per status with its amount and share of the total, then the
	/// per-section distribution.
	pub fn print_summary(&self) {
		if self.summary.count == 0 {
			println!("No budgets match");
			return;
		}
		self.status_table().print();
		self.section_table().print();
	}

	/// Stacked per-status amounts for each seller.
	pub fn print_sellers(&self) {
		if self.summary.count == 0 {
			println!("No budgets match");
			return;
		}
		self.seller_table().print();
	}

	fn status_table(&self) -> Table {
		let mut table = Table::new(4);
		table.right_align(vec![1, 2, 3]);

		table.add_header(vec!["Estado", "Nº", "Importe", "%"]);
		table.add_separator();

		for total in &self.summary.by_status {
			table.add_row(vec![
				total.status.label(),
				&total.count.to_string(),
				&Euros(total.amount).to_string(),
				&percent(total.percentage),
			]);
		}

		table.add_partial_separator(vec![1, 2]);
		table.add_row(vec![
			"Total",
			&self.summary.count.to_string(),
			&Euros(self.summary.total_amount).to_string(),
			"",
		]);

		table
	}

	fn section_table(&self) -> Table {
		let mut table = Table::new(2 + Status::ALL.len());
		table.right_align((1..2 + Status::ALL.len()).collect());

		let mut header = vec!["Sección", "Importe"];
		header.extend(Status::ALL.iter().map(|s| s.label()));
		table.add_header(header);
		table.add_separator();

		for section in &self.summary.by_section {
			let mut cells = vec![
				section.section.clone(),
				Euros(section.total_amount).to_string(),
			];
			cells.extend(status_cells(&section.per_status_percentage, percent));
			table.add_row(cells.iter().map(String::as_str).collect());
		}

		table
	}

	fn seller_table(&self) -> Table {
		let mut table = Table::new(2 + Status::ALL.len());
		table.right_align((1..2 + Status::ALL.len()).collect());

		let mut header = vec!["Vendedor"];
		header.extend(Status::ALL.iter().map(|s| s.label()));
		header.push("Total");
		table.add_header(header);
		table.add_separator();

		for seller in &self.summary.by_seller {
			let mut cells = vec![seller.seller.clone()];
			cells.extend(status_cells(&seller.per_status_amount, |amount| {
				Euros(amount).compact()
			}));
			cells.push(Euros(seller.total_amount).compact());
			table.add_row(cells.iter().map(String::as_str).collect());
		}

		table
	}

	/// Every section a budget can be filed under, one per line.
	pub fn print_sections(sections: &[String]) {
		for section in sections {
			println!("{}", section);
		}
	}
}

/// One cell per status in canonical order; missing statuses count as zero.
fn status_cells(
	values: &BTreeMap<Status, f64>,
	render: impl Fn(f64) -> String,
) -> Vec<String> {
	Status::ALL
		.iter()
		.map(|s| render(values.get(s).copied().unwrap_or(0.0)))
		.collect()
}

fn percent(value: f64) -> String {
	format!("{:.1}%", value)
}
