//! Sparse vector arithmetic shared by the text and user similarity engines.

use std::cmp::Ordering;

/// Sparse vector as `(dimension, weight)` pairs sorted by dimension
pub type SparseVector = Vec<(usize, f64)>;

/// Dot product of two sparse vectors sorted by dimension
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

pub fn norm(v: &[(usize, f64)]) -> f64 {
    v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
}

/// Cosine similarity; a zero vector is similar to nothing, itself included
pub fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    cosine_with_norms(a, norm(a), b, norm(b))
}

pub fn cosine_with_norms(a: &[(usize, f64)], norm_a: f64, b: &[(usize, f64)], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    sparse_dot(a, b) / (norm_a * norm_b)
}

/// Scales `v` to unit length in place, leaving a zero vector untouched
pub fn normalize(v: &mut [(usize, f64)]) {
    let n = norm(v);
    if n > 0.0 {
        for (_, w) in v.iter_mut() {
            *w /= n;
        }
    }
}

/// Indices of `scores` from highest to lowest, skipping `exclude`
///
/// The sort is stable, so equal scores keep index order.
pub fn rank_descending(scores: &[f64], exclude: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).filter(|&i| i != exclude).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_dot_only_counts_shared_dimensions() {
        let a = vec![(0, 1.0), (2, 2.0), (5, 3.0)];
        let b = vec![(2, 4.0), (3, 1.0), (5, 1.0)];
        assert_eq!(sparse_dot(&a, &b), 11.0);
    }

    #[test]
    fn test_cosine_of_parallel_vectors_is_one() {
        let a = vec![(1, 1.0), (4, 2.0)];
        let b = vec![(1, 2.0), (4, 4.0)];
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_of_disjoint_vectors_is_zero() {
        assert_eq!(cosine(&[(0, 1.0)], &[(1, 1.0)]), 0.0);
    }

    #[test]
    fn test_zero_vector_has_zero_similarity() {
        assert_eq!(cosine(&[], &[(0, 1.0)]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }

    #[test]
    fn test_normalize_gives_unit_length() {
        let mut v = vec![(0, 3.0), (1, 4.0)];
        normalize(&mut v);
        assert!((norm(&v) - 1.0).abs() < 1e-12);
        let mut zero: Vec<(usize, f64)> = vec![];
        normalize(&mut zero);
        assert!(zero.is_empty());
    }

    #[test]
    fn test_rank_descending_is_stable_and_excludes() {
        let scores = [0.5, 0.9, 0.5, 1.0, 0.9];
        assert_eq!(rank_descending(&scores, 3), vec![1, 4, 0, 2]);
        assert_eq!(rank_descending(&scores, 0), vec![3, 1, 4, 2]);
    }
}
