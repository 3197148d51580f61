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
use crate::budget::aggregate::grand_total;
use crate::budget::enricher::EnrichedRecord;
use crate::reports::table::Table;
use crate::util::amount::Euros;
use crate::util::date::format_for_display;

/// Shown in the management column while a budget is still open.
const NOT_MANAGED: &str = "Pendiente";
/// Shown in the management column for closed budgets never stamped.
const NO_DATE: &str = "--";
/// Marks totals below the configured threshold.
const LOW_FLAG: &str = "!";

pub struct BudgetReporter<'a> {
	records: Vec<EnrichedRecord<'a>>,
	low_total: f64,
}

impl<'a> BudgetReporter<'a> {
	/// Takes the records already filtered and sorted.
	pub fn new(records: Vec<EnrichedRecord<'a>>, low_total: f64) -> Self {
		Self { records, low_total }
	}

	pub fn print_list(&self) {
		if self.records.is_empty() {
			println!("No budgets match");
			return;
		}
		self.list_table().print();
	}

	fn list_table(&self) -> Table {
		let mut table = Table::new(10);
		table.right_align(vec![8]);

		table.add_header(vec![
			"Ref", "Cliente", "Vendedor", "Sección", "Tipo", "Creado",
			"Gestión", "Estado", "Total", "",
		]);
		table.add_separator();

		for r in &self.records {
			table.add_row(vec![
				&r.record.id,
				&r.record.client,
				&r.record.seller,
				&r.section,
				&r.seller_type,
				&format_for_display(&r.created),
				&managed_display(r),
				r.record.status.label(),
				&Euros(r.record.total).to_string(),
				if r.record.total < self.low_total {
					LOW_FLAG
				} else {
					""
				},
			]);
		}

		table.add_partial_separator(vec![8]);
		table.add_row(vec![
			&format!("{} presupuestos", self.records.len()),
			"",
			"",
			"",
			"",
			"",
			"",
			"",
			&Euros(grand_total(&self.records)).to_string(),
			"",
		]);

		table
	}

	/// Every field of one budget, one per line.
	pub fn print_detail(record: &EnrichedRecord) {
		print!("{}", BudgetReporter::detail(record));
	}

	fn detail(r: &EnrichedRecord) -> String {
		let mut table = Table::new(2);

		let created = format_for_display(&r.created);
		let available = format_for_display(&r.record.available_on);
		let managed = managed_display(r);
		let total = Euros(r.record.total).to_string();

		table.add_row(vec!["Ref", &r.record.id]);
		if !r.record.multi_act.is_empty() {
			table.add_row(vec!["Multiacto", &r.record.multi_act]);
		}
		table.add_row(vec!["Cliente", &r.record.client]);
		table.add_row(vec!["Vendedor", &r.record.seller]);
		table.add_row(vec!["Sección", &r.section]);
		table.add_row(vec!["Tipo vendedor", &r.seller_type]);
		if let Some(pro_status) = &r.record.pro_status {
			table.add_row(vec!["Cliente PRO", pro_status]);
		}
		table.add_row(vec!["Tipo", &r.record.kind]);
		table.add_row(vec!["Creado", &created]);
		table.add_row(vec!["Disponible", &available]);
		table.add_row(vec!["Estado", r.record.status.label()]);
		table.add_row(vec!["Gestión", &managed]);
		table.add_row(vec!["Total", &total]);
		table.add_row(vec!["Notas", &r.record.notes]);

		table.render()
	}
}

fn managed_display(r: &EnrichedRecord) -> String {
	if !r.managed.is_empty() {
		format_for_display(&r.managed)
	} else if r.record.status.is_closed() {
		NO_DATE.to_string()
	} else {
		NOT_MANAGED.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::budget::directory::SellerDirectory;
	use crate::budget::enricher::enrich_all;
	use crate::budget::record::{BudgetRecord, Status};

	fn records() -> Vec<BudgetRecord> {
		let mut open = BudgetRecord::new("513497");
		open.client = "Reformas Safor SL".to_string();
		open.seller = "TODOLI MIGUEL".to_string();
		open.created_date = "2024-11-02".to_string();
		open.total = 2450.5;

		let mut cancelled = BudgetRecord::new("513720");
		cancelled.client = "Mar Climent".to_string();
		cancelled.seller = "GRAU ANDREA".to_string();
		cancelled.status = Status::Cancelled;
		cancelled.total = 540.0;

		let mut managed = BudgetRecord::new("513544");
		managed.status = Status::Managing;
		managed.managed_date = "2024-11-12".to_string();
		managed.pro_status = Some("PRO Cartera".to_string());
		managed.total = 8120.0;

		vec![open, cancelled, managed]
	}

	#[test]
	fn test_managed_display() {
		let records = records();
		let directory = SellerDirectory::builtin().unwrap();
		let enriched = enrich_all(&records, &directory);
		assert_eq!(managed_display(&enriched[0]), "Pendiente");
		assert_eq!(managed_display(&enriched[1]), "--");
		assert_eq!(managed_display(&enriched[2]), "12/11/2024");
	}

	#[test]
	fn test_list_flags_low_totals() {
		let records = records();
		let directory = SellerDirectory::builtin().unwrap();
		let reporter =
			BudgetReporter::new(enrich_all(&records, &directory), 600.0);
		let rendered = reporter.list_table().render();
		let lines: Vec<&str> = rendered.lines().collect();

		assert!(lines[2].starts_with("513497"));
		assert!(lines[2].contains("02/11/2024"));
		assert!(lines[2].ends_with("2.450,5 €"));
		assert!(lines[3].contains("Anulado"));
		assert!(lines[3].ends_with("540 €   !"));
		assert!(lines[6].starts_with("3 presupuestos"));
		assert!(lines[6].ends_with("11.110,5 €"));
	}

	#[test]
	fn test_detail() {
		let records = records();
		let directory = SellerDirectory::builtin().unwrap();
		let enriched = enrich_all(&records, &directory);

		let detail = BudgetReporter::detail(&enriched[2]);
		assert!(detail.contains("Cliente PRO     PRO Cartera"));
		assert!(detail.contains("Gestión         12/11/2024"));
		assert!(detail.contains("Total           8120 €"));
		assert!(!detail.contains("Multiacto"));
	}
}
