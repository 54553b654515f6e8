use std::collections::HashSet;

use time::{Duration, OffsetDateTime, macros::datetime};

use folio_domain::{Kind, PublicationType, TextField};
use folio_service::{
	Error, MemoryRecord, MemoryStore, SearchParams, SearchQuery, SearchResponse,
	search::{self, Extra},
};

const MAX_WINDOW: u32 = 1_000;

fn at(offset_minutes: i64) -> OffsetDateTime {
	datetime!(2024-01-01 00:00 UTC) + Duration::minutes(offset_minutes)
}

fn params(pairs: &[(&str, &str)]) -> SearchParams {
	let mut params = SearchParams::default();

	for (key, value) in pairs {
		let value = Some(value.to_string());

		match *key {
			"q" => params.q = value,
			"kind" => params.kind = value,
			"type" => params.publication_type = value,
			"year" => params.year = value,
			"tag" => params.tag = value,
			"page" => params.page = value,
			"pageSize" => params.page_size = value,
			"sort" => params.sort = value,
			other => panic!("Unknown parameter {other}."),
		}
	}

	params
}

async fn search(store: &MemoryStore, pairs: &[(&str, &str)]) -> SearchResponse {
	let query = SearchQuery::from_params(&params(pairs), MAX_WINDOW).expect("Expected valid query.");

	search::run(store, &query).await.expect("Search failed.")
}

fn mixed_store() -> MemoryStore {
	MemoryStore::new(vec![
		MemoryRecord::new(Kind::Article, "Graph Kernels", Some(2022), at(1))
			.with_text(TextField::Journal, "Journal of Machine Learning")
			.with_tags(&["ml", "graphs"]),
		MemoryRecord::new(Kind::Article, "Quantum Error Correction", Some(2021), at(2))
			.with_text(TextField::Abstract, "Surface codes for learning devices.")
			.with_tags(&["physics"]),
		MemoryRecord::new(Kind::Publication, "Learning Systems", Some(2024), at(3))
			.with_publication_type(PublicationType::Book)
			.with_tags(&["ml"]),
		MemoryRecord::new(Kind::Publication, "Conference Notes", Some(2020), at(4))
			.with_publication_type(PublicationType::Conference),
		MemoryRecord::new(Kind::Grant, "Fusion Research Award", Some(2023), at(5)).with_amount(250_000),
		MemoryRecord::new(Kind::Patent, "Optical Sensor", None, at(6))
			.with_text(TextField::Country, "DE")
			.with_text(TextField::PatentNo, "DE-1234"),
		MemoryRecord::new(Kind::Certification, "Cloud Architect", Some(2019), at(7))
			.with_text(TextField::Issuer, "Cloud Institute"),
		MemoryRecord::new(Kind::Article, "Unreleased Draft", Some(2025), at(8)).unpublished(),
	])
}

#[tokio::test]
async fn unfiltered_search_merges_every_kind_newest_first() {
	let store = mixed_store();
	let response = search(&store, &[]).await;
	let titles = response.data.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();

	assert_eq!(
		titles,
		vec![
			"Cloud Architect",
			"Optical Sensor",
			"Fusion Research Award",
			"Conference Notes",
			"Learning Systems",
			"Quantum Error Correction",
			"Graph Kernels",
		]
	);
	assert_eq!(response.meta.total, 7);
	assert_eq!(response.meta.pages, 1);
	assert_eq!(response.meta.page_size, 20);
}

#[tokio::test]
async fn term_matches_any_text_field_of_each_kind() {
	let store = mixed_store();
	let response = search(&store, &[("q", "LEARNING"), ("sort", "title")]).await;
	let titles = response.data.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();

	assert_eq!(titles, vec!["Graph Kernels", "Learning Systems", "Quantum Error Correction"]);
	assert_eq!(response.meta.total, 3);
}

#[tokio::test]
async fn descending_year_orders_across_kinds() {
	let store = mixed_store();
	let response = search(&store, &[("q", "learning"), ("sort", "-year")]).await;
	let years = response.data.iter().map(|item| item.year).collect::<Vec<_>>();

	assert_eq!(years, vec![Some(2024), Some(2022), Some(2021)]);
}

#[tokio::test]
async fn missing_years_sort_below_dated_records() {
	let store = mixed_store();
	let ascending = search(&store, &[("sort", "year")]).await;
	let descending = search(&store, &[("sort", "-year")]).await;

	assert_eq!(ascending.data.first().map(|item| item.title.as_str()), Some("Optical Sensor"));
	assert_eq!(descending.data.last().map(|item| item.title.as_str()), Some("Optical Sensor"));
}

#[tokio::test]
async fn kind_restricts_both_data_and_total() {
	let store = mixed_store();
	let response = search(&store, &[("kind", "publication")]).await;

	assert!(response.data.iter().all(|item| item.kind == Kind::Publication));
	assert_eq!(response.meta.total, 2);
	assert!(store.fetches().iter().all(|(kind, _)| *kind == Kind::Publication));
}

#[tokio::test]
async fn tag_and_type_are_ignored_by_kinds_without_them() {
	let store = mixed_store();
	let tagged = search(&store, &[("tag", "ml")]).await;
	let tagged_titles = tagged.data.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();

	assert_eq!(tagged.meta.total, 5);
	assert!(!tagged_titles.contains(&"Quantum Error Correction"));
	assert!(!tagged_titles.contains(&"Conference Notes"));
	assert!(tagged_titles.contains(&"Optical Sensor"));

	let typed = search(&store, &[("kind", "publication"), ("type", "Conference")]).await;

	assert_eq!(typed.data.iter().map(|item| item.title.as_str()).collect::<Vec<_>>(), vec![
		"Conference Notes"
	]);
	assert!(matches!(
		&typed.data[0].extra,
		Extra::Publication { publication_type: Some(publication_type), .. }
			if publication_type == "Conference"
	));
}

#[tokio::test]
async fn year_filter_applies_to_every_kind() {
	let store = mixed_store();
	let response = search(&store, &[("year", "2023")]).await;

	assert_eq!(response.meta.total, 1);
	assert_eq!(response.data[0].kind, Kind::Grant);
	assert_eq!(response.data[0].extra, Extra::Grant { amount: Some(250_000) });
}

#[tokio::test]
async fn no_match_still_reports_one_page() {
	let store = mixed_store();
	let response = search(&store, &[("q", "no such words anywhere")]).await;

	assert!(response.data.is_empty());
	assert_eq!(response.meta.total, 0);
	assert_eq!(response.meta.pages, 1);
}

#[tokio::test]
async fn unpublished_records_never_appear() {
	let store = mixed_store();
	let response = search(&store, &[("q", "draft")]).await;

	assert_eq!(response.meta.total, 0);
}

fn crowded_store() -> MemoryStore {
	let mut records = Vec::new();

	for i in 0..12 {
		let kind = Kind::ALL[i % Kind::ALL.len()];

		records.push(MemoryRecord::new(kind, &format!("Record {i:02}"), Some(2000 + i as i32), at(i as i64)));
	}

	MemoryStore::new(records)
}

#[tokio::test]
async fn consecutive_pages_are_disjoint_and_complete() {
	let store = crowded_store();
	let mut seen = HashSet::new();
	let mut ordered = Vec::new();

	for page in ["1", "2", "3"] {
		let response = search(&store, &[("page", page), ("pageSize", "5"), ("sort", "title")]).await;

		assert_eq!(response.meta.total, 12);
		assert_eq!(response.meta.pages, 3);

		for item in response.data {
			assert!(seen.insert(item.id), "{} appeared on two pages.", item.title);

			ordered.push(item.title);
		}
	}

	let expected = (0..12).map(|i| format!("Record {i:02}")).collect::<Vec<_>>();

	assert_eq!(ordered, expected);
}

#[tokio::test]
async fn page_two_matches_the_unpaged_ordering() {
	let store = crowded_store();
	let full = search(&store, &[("pageSize", "50"), ("sort", "-createdAt")]).await;
	let second = search(&store, &[("page", "2"), ("pageSize", "5"), ("sort", "-createdAt")]).await;

	assert_eq!(second.data, full.data[5..10].to_vec());
}

#[tokio::test]
async fn every_kind_fetches_up_to_the_end_of_the_page() {
	let store = crowded_store();
	let response = search(&store, &[("page", "2"), ("pageSize", "5")]).await;
	let fetches = store.fetches();

	assert_eq!(response.data.len(), 5);
	assert_eq!(fetches.len(), Kind::ALL.len());
	assert!(fetches.iter().all(|(_, limit)| *limit == 10));
}

#[tokio::test]
async fn data_length_is_bounded_by_what_remains() {
	let store = crowded_store();
	let last = search(&store, &[("page", "3"), ("pageSize", "5")]).await;
	let beyond = search(&store, &[("page", "4"), ("pageSize", "5")]).await;

	assert_eq!(last.data.len(), 2);
	assert!(beyond.data.is_empty());
	assert_eq!(beyond.meta.total, 12);
}

fn same_kind_store(kind: Kind, prefix: &str, count: usize) -> Vec<MemoryRecord> {
	(0..count)
		.map(|i| {
			MemoryRecord::new(kind, &format!("{prefix}{i:03}"), Some(2000 + i as i32), at(i as i64))
		})
		.collect()
}

#[tokio::test]
async fn a_kind_larger_than_the_window_still_pages_exactly() {
	let store = MemoryStore::new(same_kind_store(Kind::Grant, "G", 12));
	let page = search(&store, &[("page", "2"), ("pageSize", "5")]).await;
	let titles = page.data.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();

	assert_eq!(titles, vec!["G006", "G005", "G004", "G003", "G002"]);
	assert_eq!(
		(page.meta.page, page.meta.page_size, page.meta.total, page.meta.pages),
		(2, 5, 12, 3)
	);
	assert!(store.fetches().contains(&(Kind::Grant, 10)));
	assert!(store.fetches().iter().all(|(_, limit)| *limit == 10));

	let full = search(&store, &[("pageSize", "50")]).await;

	assert_eq!(full.data.len(), 12);
	assert_eq!(page.data, full.data[5..10].to_vec());
}

#[tokio::test]
async fn deep_pages_over_a_dominant_kind_follow_the_merged_order() {
	let mut records = same_kind_store(Kind::Article, "A", 400);

	records.extend(same_kind_store(Kind::Grant, "G", 5));

	let store = MemoryStore::new(records);
	let mut merged = Vec::new();

	for page in 1..=9 {
		let page = page.to_string();
		let response =
			search(&store, &[("page", page.as_str()), ("pageSize", "50"), ("sort", "title")]).await;

		assert_eq!(response.meta.total, 405);
		assert_eq!(response.meta.pages, 9);

		merged.extend(response.data);
	}

	let expected = (0..400)
		.map(|i| format!("A{i:03}"))
		.chain((0..5).map(|i| format!("G{i:03}")))
		.collect::<Vec<_>>();

	assert_eq!(merged.iter().map(|item| item.title.clone()).collect::<Vec<_>>(), expected);

	let sixth = search(&store, &[("page", "6"), ("pageSize", "50"), ("sort", "title")]).await;

	assert_eq!(sixth.data.len(), 50);
	assert_eq!(sixth.data, merged[250..300].to_vec());
	assert_eq!(sixth.data.first().map(|item| item.title.as_str()), Some("A250"));
	assert_eq!(sixth.data.last().map(|item| item.title.as_str()), Some("A299"));
	assert!(store.fetches().iter().rev().take(Kind::ALL.len()).all(|(_, limit)| *limit == 300));
	assert!(store.fetches().contains(&(Kind::Article, 300)));
}

#[tokio::test]
async fn one_failing_kind_fails_the_search() {
	let store = mixed_store().failing_on(Kind::Patent);
	let query = SearchQuery::from_params(&params(&[]), MAX_WINDOW).expect("Expected valid query.");
	let err = search::run(&store, &query).await.expect_err("Expected store failure.");

	assert!(matches!(err, Error::Storage { .. }));
}

#[tokio::test]
async fn failing_kind_outside_the_filter_is_not_touched() {
	let store = mixed_store().failing_on(Kind::Patent);
	let response = search(&store, &[("kind", "article")]).await;

	assert_eq!(response.meta.total, 2);
}
