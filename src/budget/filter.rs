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
use crate::budget::enricher::EnrichedRecord;
use crate::budget::record::Status;
use crate::util::date::normalize_to_sortable;
use std::collections::BTreeSet;

/// Seller type value that selects the PRO customer segment rather than the
/// directory classification.
pub const PRO_SEGMENT: &str = "PRO";

/// What the user has asked to see. Every field is independent; a field left
/// as None (or set to an empty string) does not constrain anything.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
	/// Matched against the reference or the client name
	pub search: Option<String>,
	pub section: Option<String>,
	pub status: Option<Status>,
	pub seller: Option<String>,
	pub seller_type: Option<String>,
	/// Earliest creation date, inclusive
	pub date_from: Option<String>,
	/// Earliest management date, inclusive
	pub date_since: Option<String>,
	/// Latest creation date, inclusive
	pub date_to: Option<String>,
}

impl Criteria {
	/// Translates the criteria into the individual filters to run. Date
	/// bounds are normalized here so that any accepted date shape works.
	pub fn filters(&self) -> Vec<RecordFilter> {
		let mut filters = Vec::new();

		if let Some(search) = present(&self.search) {
			filters.push(RecordFilter::Search(search.to_lowercase()));
		}
		// compared verbatim: the raw cells may carry padding
		if let Some(section) = exact(&self.section) {
			filters.push(RecordFilter::Section(section.to_string()));
		}
		if let Some(status) = self.status {
			filters.push(RecordFilter::Status(status));
		}
		if let Some(seller) = exact(&self.seller) {
			filters.push(RecordFilter::Seller(seller.to_string()));
		}
		if let Some(typ) = present(&self.seller_type) {
			filters.push(RecordFilter::SellerType(typ.to_string()));
		}
		if let Some(from) = present(&self.date_from) {
			filters
				.push(RecordFilter::CreatedFrom(normalize_to_sortable(from)));
		}
		if let Some(to) = present(&self.date_to) {
			filters.push(RecordFilter::CreatedTo(normalize_to_sortable(to)));
		}
		if let Some(since) = present(&self.date_since) {
			filters
				.push(RecordFilter::ManagedSince(normalize_to_sortable(since)));
		}

		filters
	}
}

fn present(field: &Option<String>) -> Option<&str> {
	field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn exact(field: &Option<String>) -> Option<&str> {
	field.as_deref().filter(|s| !s.trim().is_empty())
}

/// A single predicate over enriched records.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordFilter {
	/// Lowercased needle
	Search(String),
	Section(String),
	Status(Status),
	Seller(String),
	SellerType(String),
	CreatedFrom(String),
	CreatedTo(String),
	ManagedSince(String),
}

impl RecordFilter {
	pub fn matches(&self, r: &EnrichedRecord) -> bool {
		match self {
			RecordFilter::Search(needle) => {
				r.record.id.to_lowercase().contains(needle)
					|| r.record.client.to_lowercase().contains(needle)
			},
			RecordFilter::Section(section) => &r.section == section,
			RecordFilter::Status(status) => &r.record.status == status,
			RecordFilter::Seller(seller) => &r.record.seller == seller,
			RecordFilter::SellerType(typ) if typ == PRO_SEGMENT => {
				r.record.is_pro
			},
			RecordFilter::SellerType(typ) => &r.seller_type == typ,
			// sortable dates are zero-padded, so string order is date order
			RecordFilter::CreatedFrom(from) => &r.created >= from,
			RecordFilter::CreatedTo(to) => &r.created <= to,
			RecordFilter::ManagedSince(since) => {
				!r.managed.is_empty() && &r.managed >= since
			},
		}
	}
}

/// Keeps the records matching every criterion. Input order is preserved,
/// though callers should sort explicitly rather than rely on it.
pub fn filter<'a>(
	records: impl IntoIterator<Item = EnrichedRecord<'a>>,
	criteria: &Criteria,
) -> Vec<EnrichedRecord<'a>> {
	let mut records_iter: Box<dyn Iterator<Item = EnrichedRecord<'a>> + 'a> =
		Box::new(records.into_iter().collect::<Vec<_>>().into_iter());

	for f in criteria.filters() {
		records_iter = Box::new(records_iter.filter(move |r| f.matches(r)));
	}

	records_iter.collect()
}

/// Sections to offer for filtering: the directory's official sections plus
/// whatever sections the loaded budgets actually fall into, sorted.
pub fn available_sections(
	records: &[EnrichedRecord],
	directory: &SellerDirectory,
) -> Vec<String> {
	let mut sections: BTreeSet<String> =
		directory.official_sections().iter().cloned().collect();
	sections.extend(records.iter().map(|r| r.section.clone()));
	sections.into_iter().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::budget::enricher::enrich_all;
	use crate::budget::record::BudgetRecord;

	fn fixtures() -> Vec<BudgetRecord> {
		let rows = [
			("513497", "Reformas Safor SL", "TODOLI MIGUEL", "2024-11-02"),
			("513544", "Ana Pons", "CASTELLO RAFAEL", "2024-11-15"),
			("513601", "Construcciones Ribera", "YOLANDA DIAZ", "20/11/2024"),
			("513720", "Pons Hermanos", "SIN DIRECTORIO", "2024-12-01"),
			("513805", "Mar Climent", "CASTELLO RAFAEL", ""),
		];

		rows.iter()
			.enumerate()
			.map(|(i, (id, client, seller, created))| {
				let mut r = BudgetRecord::new(id);
				r.client = client.to_string();
				r.seller = seller.to_string();
				r.section_raw = "Materiales".to_string();
				r.created_date = created.to_string();
				r.total = 100.0 * (i + 1) as f64;
				r.status = Status::ALL[i % 4];
				r.is_pro = i == 0 || i == 3;
				r
			})
			.collect()
	}

	fn ids(records: &[EnrichedRecord]) -> Vec<String> {
		records.iter().map(|r| r.record.id.clone()).collect()
	}

	#[test]
	fn test_empty_criteria_keeps_everything() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let enriched = enrich_all(&records, &directory);
		assert_eq!(filter(enriched, &Criteria::default()).len(), 5);

		let blank = Criteria {
			search: Some("  ".to_string()),
			section: Some(String::new()),
			..Default::default()
		};
		assert!(blank.filters().is_empty());
	}

	#[test]
	fn test_search_matches_id_or_client() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			search: Some("PONS".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		assert_eq!(ids(&out), vec!["513544", "513720"]);

		let criteria = Criteria {
			search: Some("5136".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		assert_eq!(ids(&out), vec!["513601"]);
	}

	#[test]
	fn test_section_uses_effective_section() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			section: Some("Materiales".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		// only the seller missing from the directory keeps the sheet section
		assert_eq!(ids(&out), vec!["513720"]);
	}

	#[test]
	fn test_status_and_seller() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			status: Some(Status::Managing),
			seller: Some("CASTELLO RAFAEL".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		assert_eq!(ids(&out), vec!["513544"]);
	}

	#[test]
	fn test_padded_values_match_verbatim() {
		let directory = SellerDirectory::builtin().unwrap();
		let mut records = fixtures();
		records[3].seller = "sin directorio ".to_string();
		records[3].section_raw = "Decoración ".to_string();
		let enriched = enrich_all(&records, &directory);

		let offered = available_sections(&enriched, &directory);
		assert!(offered.contains(&"Decoración ".to_string()));

		let criteria = Criteria {
			section: Some("Decoración ".to_string()),
			seller: Some("sin directorio ".to_string()),
			..Default::default()
		};
		let out = filter(enriched.clone(), &criteria);
		assert_eq!(ids(&out), vec!["513720"]);

		let trimmed = Criteria {
			seller: Some("sin directorio".to_string()),
			..Default::default()
		};
		assert!(filter(enriched, &trimmed).is_empty());
	}

	#[test]
	fn test_pro_segment_ignores_directory_type() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			seller_type: Some(PRO_SEGMENT.to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		let expected: Vec<String> = records
			.iter()
			.filter(|r| r.is_pro)
			.map(|r| r.id.clone())
			.collect();
		assert_eq!(ids(&out), expected);
	}

	#[test]
	fn test_other_seller_types_use_directory() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			seller_type: Some("VE".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		assert_eq!(ids(&out), vec!["513601"]);
	}

	#[test]
	fn test_creation_date_range() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			date_from: Some("2024-11-10".to_string()),
			date_to: Some("30/11/2024".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		assert_eq!(ids(&out), vec!["513544", "513601"]);
	}

	#[test]
	fn test_management_date_since() {
		let directory = SellerDirectory::builtin().unwrap();
		let mut records = fixtures();
		records[1].managed_date = "2024-12-02".to_string();
		records[2].managed_date = "2024-11-20".to_string();
		let criteria = Criteria {
			date_since: Some("2024-12-01".to_string()),
			..Default::default()
		};
		let out = filter(enrich_all(&records, &directory), &criteria);
		assert_eq!(ids(&out), vec!["513544"]);
	}

	#[test]
	fn test_combined_criteria_intersect() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let a = Criteria {
			search: Some("pons".to_string()),
			..Default::default()
		};
		let b = Criteria {
			seller_type: Some(PRO_SEGMENT.to_string()),
			..Default::default()
		};
		let both = Criteria {
			search: a.search.clone(),
			seller_type: b.seller_type.clone(),
			..Default::default()
		};

		let only_a = ids(&filter(enrich_all(&records, &directory), &a));
		let only_b = ids(&filter(enrich_all(&records, &directory), &b));
		let together = ids(&filter(enrich_all(&records, &directory), &both));

		let intersection: Vec<String> =
			only_a.into_iter().filter(|id| only_b.contains(id)).collect();
		assert_eq!(together, intersection);
		assert_eq!(together, vec!["513720"]);
	}

	#[test]
	fn test_filter_is_idempotent() {
		let directory = SellerDirectory::builtin().unwrap();
		let records = fixtures();
		let criteria = Criteria {
			date_from: Some("2024-11-01".to_string()),
			search: Some("51".to_string()),
			..Default::default()
		};
		let once = filter(enrich_all(&records, &directory), &criteria);
		let twice = filter(once.clone(), &criteria);
		assert_eq!(once, twice);
	}

	#[test]
	fn test_available_sections() {
		let directory = SellerDirectory::builtin().unwrap();
		let mut records = fixtures();
		records[3].section_raw = "Decoración".to_string();
		let sections =
			available_sections(&enrich_all(&records, &directory), &directory);
		assert_eq!(sections.len(), 12);
		assert!(sections.contains(&"Decoración".to_string()));
		assert!(sections.windows(2).all(|w| w[0] < w[1]));
	}
}
