//! Range limit, sort and multi-index E2E tests.

use pretty_assertions::assert_eq;

use e2e_tests::{cat_books, Book, IndexOptions, TestHarness};
use search_types::{Hit, SearchRequest};

fn year(hit: &Hit) -> u64 {
    hit.field("year").unwrap().parse().unwrap()
}

#[test]
fn test_range_limit_restricts_hits_and_counts() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(40, 10), IndexOptions::default());
    let service = harness.service(&["books"]);

    let result = service
        .search(
            &SearchRequest::new("cat")
                .with_range("year", "1995", "1999")
                .with_page_size(0),
        )
        .unwrap();

    // Years cycle every 20 books, so 5 years x 2 cycles.
    assert_eq!(result.total_hits, 10);
    assert_eq!(result.hits.len(), 10);
    assert!(result.hits.iter().all(|hit| (1995..=1999).contains(&year(hit))));
}

#[test]
fn test_range_limit_on_keyword_field() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(20, 0), IndexOptions::default());
    let service = harness.service(&["books"]);

    let result = service
        .search(&SearchRequest::new("cat").with_range("category", "poetry", "poetry"))
        .unwrap();
    assert_eq!(result.total_hits, 10);
    assert!(result
        .hits
        .iter()
        .all(|hit| hit.field("category") == Some("poetry")));
}

#[test]
fn test_paged_range_limit() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(60, 0), IndexOptions::default());
    let service = harness.service(&["books"]);

    let result = service
        .search(
            &SearchRequest::new("cat")
                .with_range("year", "2000", "2009")
                .with_page(2)
                .with_page_size(10),
        )
        .unwrap();
    assert_eq!(result.total_hits, 30);
    assert_eq!(result.pager.unwrap().total_pages, 3);
    assert_eq!(result.hits.len(), 10);
    assert_eq!(result.hits[0].position, 11);
}

#[test]
fn test_multi_key_sort() {
    let harness = TestHarness::new();
    harness.build_index(
        "books",
        &cat_books(30, 0),
        IndexOptions {
            shuffle_seed: Some(7),
            ..Default::default()
        },
    );
    let service = harness.service(&["books"]);

    let result = service
        .search(
            &SearchRequest::new("cat")
                .with_order_by("year desc title asc")
                .with_page_size(0),
        )
        .unwrap();

    let keys: Vec<(u64, String)> = result
        .hits
        .iter()
        .map(|hit| (year(hit), hit.field("title").unwrap().to_string()))
        .collect();
    let mut expected = keys.clone();
    expected.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    assert_eq!(keys, expected);
    assert_eq!(keys[0], (2009, "cat tale 019".to_string()));
}

#[test]
fn test_sort_applies_before_paging() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(25, 0), IndexOptions::default());
    let service = harness.service(&["books"]);

    let page_one = service
        .search(
            &SearchRequest::new("cat")
                .with_order_by("title asc")
                .with_page_size(10),
        )
        .unwrap();
    let page_three = service
        .search(
            &SearchRequest::new("cat")
                .with_order_by("title asc")
                .with_page(3)
                .with_page_size(10),
        )
        .unwrap();

    assert_eq!(page_one.hits[0].field("title"), Some("cat tale 001"));
    assert_eq!(page_three.hits[0].field("title"), Some("cat tale 021"));
    assert_eq!(page_three.hits[4].field("title"), Some("cat tale 025"));
}

#[test]
fn test_rank_ascending() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(12, 0), IndexOptions::default());
    let service = harness.service(&["books"]);

    let result = service
        .search(&SearchRequest::new("cat").with_order_by("rank asc"))
        .unwrap();
    assert!(result.hits.windows(2).all(|w| w[0].score <= w[1].score));
    assert_eq!(result.hits[0].field("title"), Some("cat tale 001"));
}

#[test]
fn test_multiple_indexes_merge_into_one_ranking() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(8, 3), IndexOptions::default());
    harness.build_index(
        "notes",
        &[
            Book::new("note one", "cat cat cat cat", "memo", 2015),
            Book::new("note two", "nothing relevant here", "memo", 2016),
        ],
        IndexOptions::default(),
    );
    let service = harness.service(&["books", "notes"]);

    let result = service
        .search(&SearchRequest::new("cat").with_page_size(0))
        .unwrap();

    assert_eq!(result.total_hits, 9);
    assert!(result.hits.windows(2).all(|w| w[0].score >= w[1].score));
    let from_notes: Vec<&Hit> = result
        .hits
        .iter()
        .filter(|hit| hit.index == harness.index_name("notes"))
        .collect();
    assert_eq!(from_notes.len(), 1);
    assert_eq!(from_notes[0].field("title"), Some("note one"));

    // Parsed terms are reported for the primary index.
    assert_eq!(result.parsed_terms, vec!["cat".to_string()]);
}

#[test]
fn test_multi_index_sort_by_year() {
    let harness = TestHarness::new();
    harness.build_index("books", &cat_books(5, 0), IndexOptions::default());
    harness.build_index(
        "notes",
        &[Book::new("late note", "a cat", "memo", 2030)],
        IndexOptions::default(),
    );
    let service = harness.service(&["books", "notes"]);

    let result = service
        .search(&SearchRequest::new("cat").with_order_by("year desc"))
        .unwrap();
    assert_eq!(result.hits[0].field("title"), Some("late note"));
    assert_eq!(result.hits[0].index, harness.index_name("notes"));
    assert_eq!(result.hits.len(), 6);
}
