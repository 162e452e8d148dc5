use booklog_core::{recommendation_candidates, select_recommendation, Book};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

fn book(name: &str, year: Option<i32>, rating: Option<i32>) -> Book {
    Book {
        id: Uuid::new_v4(),
        name: name.to_string(),
        authors: "someone".to_string(),
        year,
        rating,
        isbn: None,
    }
}

#[test]
fn empty_list_has_no_recommendation() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(select_recommendation(&[], 2024, &mut rng).is_none());
}

#[test]
fn books_older_than_three_years_are_excluded() {
    let books = vec![
        book("old", Some(2019), Some(10)),
        book("undated", None, Some(10)),
    ];
    let mut rng = StdRng::seed_from_u64(7);
    assert!(select_recommendation(&books, 2024, &mut rng).is_none());
}

#[test]
fn window_includes_exactly_three_years_back() {
    let books = vec![book("edge", Some(2021), Some(1)), book("out", Some(2020), Some(10))];
    let mut rng = StdRng::seed_from_u64(7);
    let picked = select_recommendation(&books, 2024, &mut rng).unwrap();
    assert_eq!(picked.name, "edge");
}

#[test]
fn pick_is_one_of_the_tied_top_rated_books() {
    let books = vec![
        book("A", Some(2023), Some(9)),
        book("B", Some(2022), Some(9)),
        book("C", Some(2024), Some(4)),
    ];

    let mut seen = HashSet::new();
    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = select_recommendation(&books, 2024, &mut rng).unwrap();
        assert!(picked.name == "A" || picked.name == "B");
        seen.insert(picked.name.clone());
    }
    assert_eq!(seen.len(), 2, "both tied books should come up over 64 seeds");
}

#[test]
fn same_seed_reproduces_the_pick() {
    let books: Vec<Book> = (0..10)
        .map(|i| book(&format!("b{i}"), Some(2023), Some(10)))
        .collect();

    let first = select_recommendation(&books, 2024, &mut StdRng::seed_from_u64(42)).unwrap();
    let second = select_recommendation(&books, 2024, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(first.id, second.id);
}

#[test]
fn unrated_recent_books_count_as_zero() {
    let books = vec![book("unrated", Some(2024), None), book("zero", Some(2023), Some(0))];
    let candidates = recommendation_candidates(&books, 2024);
    assert_eq!(
        candidates.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        vec!["unrated", "zero"]
    );
}

#[test]
fn candidates_keep_only_the_maximum() {
    let books = vec![
        book("low", Some(2024), Some(3)),
        book("high", Some(2023), Some(8)),
        book("ancient-high", Some(1990), Some(10)),
    ];
    let candidates = recommendation_candidates(&books, 2024);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name, "high");
}
