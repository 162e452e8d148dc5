//! Recommendation of one recent, top-rated book.
//!
//! # Invariants
//! - Only books published at most `RECOMMENDATION_WINDOW_YEARS` before the
//!   current year are candidates; books without a year never are.
//! - The pick is always one of the books sharing the highest rating.
//! - Randomness comes from the caller, so a seeded generator reproduces picks.

use crate::model::book::Book;
use rand::seq::SliceRandom;
use rand::Rng;

/// Maximum age, in years, of a recommendable book.
pub const RECOMMENDATION_WINDOW_YEARS: i32 = 3;

/// Returns whether `book` falls inside the recency window.
pub fn is_recent(book: &Book, current_year: i32) -> bool {
    book.year
        .and_then(|year| current_year.checked_sub(year))
        .is_some_and(|age| age <= RECOMMENDATION_WINDOW_YEARS)
}

/// Returns every recent book tied at the highest rating, in input order.
pub fn recommendation_candidates(books: &[Book], current_year: i32) -> Vec<&Book> {
    let recent: Vec<&Book> = books
        .iter()
        .filter(|book| is_recent(book, current_year))
        .collect();
    let Some(best) = recent.iter().map(|book| book.effective_rating()).max() else {
        return Vec::new();
    };

    recent
        .into_iter()
        .filter(|book| book.effective_rating() == best)
        .collect()
}

/// Picks one book uniformly from the top-rated recent candidates.
///
/// Returns `None` when no book is recent enough.
pub fn select_recommendation<'a, R: Rng + ?Sized>(
    books: &'a [Book],
    current_year: i32,
    rng: &mut R,
) -> Option<&'a Book> {
    recommendation_candidates(books, current_year)
        .choose(rng)
        .copied()
}
