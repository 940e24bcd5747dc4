//! User-by-product rating matrix.
//!
//! Rows are users sorted by id, columns products sorted by id. A cell is the
//! mean of the user's ratings for the product, or absent when the user never
//! rated it. Rows are stored sparsely; absent cells count as zero in
//! similarity arithmetic.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    similarity::{cosine_with_norms, norm, SparseVector},
    RecommendError,
};
use crate::models::RatingObservation;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    users: Vec<i64>,
    products: Vec<String>,
    rows: Vec<SparseVector>,
    norms: Vec<f64>,
}

impl RatingMatrix {
    /// Pivots observations into the matrix, averaging repeated ratings
    pub fn build(observations: &[RatingObservation]) -> Self {
        let products: Vec<String> = observations
            .iter()
            .map(|o| o.prod_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut sums: BTreeMap<i64, BTreeMap<usize, (f64, usize)>> = BTreeMap::new();
        for obs in observations {
            // Every observed product is a column, so the search always hits
            let Ok(col) = products.binary_search_by(|p| p.as_str().cmp(&obs.prod_id)) else {
                continue;
            };
            let cell = sums
                .entry(obs.user_id)
                .or_default()
                .entry(col)
                .or_insert((0.0, 0));
            cell.0 += obs.rating;
            cell.1 += 1;
        }

        let mut users = Vec::with_capacity(sums.len());
        let mut rows = Vec::with_capacity(sums.len());
        for (user, cells) in sums {
            users.push(user);
            rows.push(
                cells
                    .into_iter()
                    .map(|(col, (sum, count))| (col, sum / count as f64))
                    .collect::<SparseVector>(),
            );
        }
        let norms = rows.iter().map(|row| norm(row)).collect();

        Self {
            users,
            products,
            rows,
            norms,
        }
    }

    /// User ids in row order
    pub fn users(&self) -> &[i64] {
        &self.users
    }

    /// Product ids in column order
    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// Row of `user_id`
    pub fn user_index(&self, user_id: i64) -> Result<usize, RecommendError> {
        self.users
            .binary_search(&user_id)
            .map_err(|_| RecommendError::UserNotFound(user_id))
    }

    /// Rated cells of row `user` as `(column, mean rating)`, in column order
    pub fn row(&self, user: usize) -> &[(usize, f64)] {
        &self.rows[user]
    }

    pub fn rating(&self, user: usize, product: usize) -> Option<f64> {
        let row = &self.rows[user];
        row.binary_search_by_key(&product, |&(col, _)| col)
            .ok()
            .map(|pos| row[pos].1)
    }

    pub fn has_rated(&self, user: usize, product: usize) -> bool {
        self.rating(user, product).is_some()
    }

    /// Cosine similarity of row `user` to every row, itself included
    pub fn user_similarities(&self, user: usize) -> Vec<f64> {
        let target = &self.rows[user];
        let target_norm = self.norms[user];
        self.rows
            .iter()
            .zip(&self.norms)
            .map(|(row, &row_norm)| cosine_with_norms(target, target_norm, row, row_norm))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(user_id: i64, prod_id: &str, rating: f64) -> RatingObservation {
        RatingObservation {
            user_id,
            prod_id: prod_id.to_string(),
            rating,
        }
    }

    fn sample() -> Vec<RatingObservation> {
        vec![
            obs(30, "p2", 4.0),
            obs(10, "p1", 5.0),
            obs(10, "p1", 3.0),
            obs(20, "p3", 2.0),
            obs(10, "p3", 0.0),
        ]
    }

    #[test]
    fn test_rows_and_columns_are_sorted() {
        let matrix = RatingMatrix::build(&sample());
        assert_eq!(matrix.users(), &[10, 20, 30]);
        assert_eq!(matrix.products(), &["p1", "p2", "p3"]);
    }

    #[test]
    fn test_repeated_ratings_are_averaged() {
        let matrix = RatingMatrix::build(&sample());
        assert_eq!(matrix.rating(0, 0), Some(4.0));
    }

    #[test]
    fn test_zero_rating_is_distinct_from_unrated() {
        let matrix = RatingMatrix::build(&sample());
        assert_eq!(matrix.rating(0, 2), Some(0.0));
        assert!(matrix.has_rated(0, 2));
        assert!(!matrix.has_rated(0, 1));
        assert_eq!(matrix.rating(1, 0), None);
    }

    #[test]
    fn test_build_is_deterministic_regardless_of_input_order() {
        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(RatingMatrix::build(&sample()), RatingMatrix::build(&sample()));
        let a = RatingMatrix::build(&sample());
        let b = RatingMatrix::build(&reversed);
        assert_eq!(a.users(), b.users());
        assert_eq!(a.products(), b.products());
        assert_eq!(a.row(0), b.row(0));
    }

    #[test]
    fn test_unknown_user_is_an_error() {
        let matrix = RatingMatrix::build(&sample());
        assert!(matches!(
            matrix.user_index(999),
            Err(RecommendError::UserNotFound(999))
        ));
        assert_eq!(matrix.user_index(20).unwrap(), 1);
    }

    #[test]
    fn test_user_similarities() {
        let matrix = RatingMatrix::build(&[
            obs(1, "a", 5.0),
            obs(1, "b", 5.0),
            obs(2, "a", 1.0),
            obs(2, "b", 1.0),
            obs(3, "c", 4.0),
        ]);
        let sims = matrix.user_similarities(0);
        assert!((sims[0] - 1.0).abs() < 1e-12);
        assert!((sims[1] - 1.0).abs() < 1e-12);
        assert_eq!(sims[2], 0.0);
    }
}
