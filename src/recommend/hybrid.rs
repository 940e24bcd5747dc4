//! Weighted rank blending of the content-based and collaborative lists.

use std::collections::HashMap;

use crate::models::Product;

pub const CONTENT_WEIGHT: f64 = 0.6;
pub const COLLABORATIVE_WEIGHT: f64 = 0.4;

/// Blended score of an item's two ranks, lower is better
pub fn hybrid_score(content_rank: usize, collaborative_rank: usize) -> f64 {
    CONTENT_WEIGHT * content_rank as f64 + COLLABORATIVE_WEIGHT * collaborative_rank as f64
}

/// Fields two lists must agree on to be the same item
#[derive(Debug, PartialEq, Eq, Hash)]
struct Identity<'a> {
    prod_id: &'a str,
    name: &'a str,
    brand: &'a str,
    image_url: &'a str,
    rating: u64,
}

impl<'a> From<&'a Product> for Identity<'a> {
    fn from(p: &'a Product) -> Self {
        Self {
            prod_id: &p.prod_id,
            name: &p.name,
            brand: &p.brand,
            image_url: &p.image_url,
            rating: p.rating.to_bits(),
        }
    }
}

struct Entry<'a> {
    product: &'a Product,
    content_rank: Option<usize>,
    collaborative_rank: Option<usize>,
}

/// Outer-joins two ranked lists and orders them by [`hybrid_score`]
///
/// An item missing from one list takes rank `top_n + 1` there, saturating at
/// `usize::MAX`. Ties keep first-appearance order, content list first.
pub fn blend<'a>(
    content: &[&'a Product],
    collaborative: &[&'a Product],
    top_n: usize,
) -> Vec<&'a Product> {
    let mut entries: Vec<Entry<'a>> = Vec::with_capacity(content.len() + collaborative.len());
    let mut positions: HashMap<Identity<'a>, usize> = HashMap::new();

    for (rank, &product) in content.iter().enumerate() {
        let pos = *positions.entry(Identity::from(product)).or_insert_with(|| {
            entries.push(Entry {
                product,
                content_rank: None,
                collaborative_rank: None,
            });
            entries.len() - 1
        });
        entries[pos].content_rank.get_or_insert(rank + 1);
    }

    for (rank, &product) in collaborative.iter().enumerate() {
        let pos = *positions.entry(Identity::from(product)).or_insert_with(|| {
            entries.push(Entry {
                product,
                content_rank: None,
                collaborative_rank: None,
            });
            entries.len() - 1
        });
        entries[pos].collaborative_rank.get_or_insert(rank + 1);
    }

    let missing = top_n.saturating_add(1);
    let mut scored: Vec<(f64, &'a Product)> = entries
        .into_iter()
        .map(|e| {
            let score = hybrid_score(
                e.content_rank.unwrap_or(missing),
                e.collaborative_rank.unwrap_or(missing),
            );
            (score, e.product)
        })
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    scored.into_iter().take(top_n).map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            prod_id: id.to_string(),
            name: format!("Item {}", id),
            brand: "Acme".to_string(),
            tags: String::new(),
            description: String::new(),
            image_url: String::new(),
            rating: 4.0,
            review_count: 1,
        }
    }

    fn ids(list: &[&Product]) -> Vec<String> {
        list.iter().map(|p| p.prod_id.clone()).collect()
    }

    #[test]
    fn test_score_weights() {
        assert!((hybrid_score(1, 1) - 1.0).abs() < 1e-12);
        assert!((hybrid_score(2, 11) - 5.6).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_monotone_in_both_ranks() {
        for c in 1..12 {
            for k in 1..12 {
                assert!(hybrid_score(c, k) <= hybrid_score(c + 1, k));
                assert!(hybrid_score(c, k) <= hybrid_score(c, k + 1));
            }
        }
    }

    #[test]
    fn test_item_in_both_lists_beats_single_list_leaders() {
        let (a, b, c) = (product("a"), product("b"), product("c"));
        // a leads content only, b leads collaborative only, c is first in both
        let blended = blend(&[&c, &a], &[&c, &b], 2);
        assert_eq!(ids(&blended), vec!["c", "a"]);
    }

    #[test]
    fn test_missing_rank_defaults_to_worst() {
        let (a, b) = (product("a"), product("b"));
        // a: 0.6*1 + 0.4*3 = 1.8, b: 0.6*3 + 0.4*1 = 2.2
        let blended = blend(&[&a], &[&b], 2);
        assert_eq!(ids(&blended), vec!["a", "b"]);
    }

    #[test]
    fn test_result_is_truncated_and_deduplicated() {
        let items: Vec<Product> = ["a", "b", "c", "d"].iter().map(|id| product(id)).collect();
        let content: Vec<&Product> = items.iter().collect();
        let collaborative: Vec<&Product> = items.iter().rev().collect();
        let blended = blend(&content, &collaborative, 3);
        assert_eq!(blended.len(), 3);
        let mut unique = ids(&blended);
        unique.dedup();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_unbounded_top_n_keeps_missing_ranks_last() {
        let (a, b, c) = (product("a"), product("b"), product("c"));
        // a is in both lists, b and c each miss one
        let blended = blend(&[&b, &a], &[&a, &c], usize::MAX);
        assert_eq!(ids(&blended), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(blend(&[], &[], 5).is_empty());
    }
}
