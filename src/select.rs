//! Balanced article selection.
//!
//! The page shows a small number of articles, and the feeds skew heavily
//! toward a couple of categories. [`select_balanced`] first guarantees one
//! slot to each of the [`PRIMARY_CATEGORIES`] that is present in the pool,
//! then fills the remaining slots by preferring under-represented categories
//! and, among those, the newest articles.

use crate::models::{Article, Category};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::debug;

/// Categories guaranteed a representative, in the order they are picked.
pub const PRIMARY_CATEGORIES: [Category; 5] = [
    Category::RightsPolitics,
    Category::Entertainment,
    Category::Health,
    Category::Community,
    Category::LgbtqNews,
];

/// Pick at most `count` articles from `pool`, maximizing category diversity.
///
/// Deterministic for a given pool order; the pool itself is left untouched.
///
/// # Arguments
///
/// * `pool` - Eligible articles, newest first
/// * `count` - Number of articles wanted
///
/// # Returns
///
/// `min(count, pool.len())` distinct articles, primary categories first.
pub fn select_balanced(pool: &[Article], count: usize) -> Vec<Article> {
    let mut selected: Vec<Article> = Vec::with_capacity(count.min(pool.len()));
    let mut remaining: Vec<&Article> = pool.iter().collect();

    for category in PRIMARY_CATEGORIES {
        if selected.len() >= count {
            break;
        }
        if let Some(i) = remaining
            .iter()
            .position(|a| a.category_or_default() == category)
        {
            selected.push(remaining.remove(i).clone());
        }
    }

    while selected.len() < count && !remaining.is_empty() {
        let counts = selected.iter().counts_by(|a| a.category_or_default());
        let in_result = |a: &Article| counts.get(&a.category_or_default()).copied().unwrap_or(0);

        // Stable: equal keys keep the order left by the previous round.
        remaining.sort_by(|a, b| {
            in_result(*a)
                .cmp(&in_result(*b))
                .then_with(|| b.published_time().cmp(&a.published_time()))
        });
        selected.push(remaining.remove(0).clone());
    }

    debug!(
        pool = pool.len(),
        requested = count,
        selected = selected.len(),
        "Balanced selection"
    );
    selected
}

/// Select the grid, then the carousel from the articles the grid did not take.
///
/// The carousel excludes grid articles by title, so the two never share a story.
pub fn select_sections(
    pool: &[Article],
    grid_size: usize,
    carousel_size: usize,
) -> (Vec<Article>, Vec<Article>) {
    let grid = select_balanced(pool, grid_size);
    let taken: HashSet<&str> = grid.iter().map(|a| a.title.as_str()).collect();
    let rest: Vec<Article> = pool
        .iter()
        .filter(|a| !taken.contains(a.title.as_str()))
        .cloned()
        .collect();
    let carousel = select_balanced(&rest, carousel_size);
    (grid, carousel)
}
