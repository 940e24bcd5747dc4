//! Recommendation core: content-based, collaborative and hybrid ranking over
//! an immutable catalog snapshot.

use std::collections::HashSet;

use thiserror::Error;

use crate::{catalog::Catalog, models::Product};

pub mod hybrid;
pub mod matrix;
pub mod similarity;
pub mod tfidf;

pub use matrix::RatingMatrix;
pub use tfidf::TfIdfIndex;

use similarity::rank_descending;

#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    #[error("Item '{0}' not found in the dataset")]
    ItemNotFound(String),

    #[error("User {0} has no ratings")]
    UserNotFound(i64),
}

/// Which product field a query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Name,
    Description,
}

/// The three lists produced for a hybrid request
#[derive(Debug, Default)]
pub struct HybridResult<'a> {
    pub content_based: Vec<&'a Product>,
    pub collaborative: Vec<&'a Product>,
    pub hybrid: Vec<&'a Product>,
}

/// Catalog plus every structure derived from it, built once and shared read-only
pub struct Snapshot {
    catalog: Catalog,
    text_index: TfIdfIndex,
    ratings: RatingMatrix,
}

impl Snapshot {
    pub fn build(catalog: Catalog) -> Self {
        let text_index = TfIdfIndex::fit(catalog.products().iter().map(|p| p.tags.as_str()));
        let ratings = RatingMatrix::build(catalog.observations());

        tracing::info!(
            products = catalog.len(),
            vocabulary = text_index.vocabulary_len(),
            users = ratings.users().len(),
            rated_products = ratings.products().len(),
            "Built recommendation snapshot"
        );

        Self {
            catalog,
            text_index,
            ratings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn text_index(&self) -> &TfIdfIndex {
        &self.text_index
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    /// Content fingerprint of the catalog this snapshot was built from
    pub fn fingerprint(&self) -> &str {
        self.catalog.fingerprint()
    }

    /// Catalog index of the first product matching `query`
    pub fn resolve(&self, query: &str, field: QueryField) -> Result<usize, RecommendError> {
        let found = match field {
            QueryField::Name => self.catalog.find_by_name(query),
            QueryField::Description => self.catalog.find_by_description(query),
        };
        found.ok_or_else(|| RecommendError::ItemNotFound(query.to_string()))
    }

    /// Products most similar by tags to the one matching `query`
    pub fn similar_to_query(
        &self,
        query: &str,
        field: QueryField,
        top_n: usize,
    ) -> Result<Vec<&Product>, RecommendError> {
        let index = self.resolve(query, field)?;
        Ok(self.similar_to(index, top_n))
    }

    /// The `top_n` products most similar by tags to catalog row `index`
    ///
    /// Rows sharing the query's ProdID are skipped and each ProdID appears once.
    pub fn similar_to(&self, index: usize, top_n: usize) -> Vec<&Product> {
        let products = self.catalog.products();
        let Some(query) = products.get(index) else {
            return Vec::new();
        };

        let scores = self.text_index.similarities_to(index);
        let mut seen: HashSet<&str> = HashSet::from([query.prod_id.as_str()]);

        rank_descending(&scores, index)
            .into_iter()
            .map(|i| &products[i])
            .filter(|p| seen.insert(p.prod_id.as_str()))
            .take(top_n)
            .collect()
    }

    /// Products rated by the users most similar to `user_id` that `user_id`
    /// has not rated
    ///
    /// Candidates are gathered in similar-user rank order, column order within
    /// one user, until `top_n` are collected.
    pub fn recommend_for_user(
        &self,
        user_id: i64,
        top_n: usize,
    ) -> Result<Vec<&Product>, RecommendError> {
        let target = self.ratings.user_index(user_id)?;
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let scores = self.ratings.user_similarities(target);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for other in rank_descending(&scores, target) {
            for &(col, _) in self.ratings.row(other) {
                if !self.ratings.has_rated(target, col) && seen.insert(col) {
                    candidates.push(col);
                }
            }
            if candidates.len() >= top_n {
                break;
            }
        }
        candidates.truncate(top_n);

        let product_ids = self.ratings.products();
        Ok(candidates
            .into_iter()
            .filter_map(|col| self.catalog.product_by_id(&product_ids[col]))
            .collect())
    }

    /// Content, collaborative and blended lists for one user
    ///
    /// Without a query, or when it matches nothing, the hybrid list is the
    /// collaborative list.
    pub fn hybrid(
        &self,
        user_id: i64,
        query: Option<&str>,
        top_n: usize,
    ) -> Result<HybridResult<'_>, RecommendError> {
        let collaborative = self.recommend_for_user(user_id, top_n)?;

        let content_based = match query.filter(|q| !q.is_empty()) {
            Some(q) => match self.resolve(q, QueryField::Name) {
                Ok(index) => Some(self.similar_to(index, top_n)),
                Err(_) => {
                    tracing::debug!(query = %q, "Hybrid query matched no product");
                    None
                }
            },
            None => None,
        };

        Ok(match content_based {
            Some(content_based) => HybridResult {
                hybrid: hybrid::blend(&content_based, &collaborative, top_n),
                content_based,
                collaborative,
            },
            None => HybridResult {
                content_based: Vec::new(),
                hybrid: collaborative.clone(),
                collaborative,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOES: &str = "\
ProdID,Name,Brand,Tags,Description,ImageURL,Rating,ReviewCount
1,A,X,red shoe,first,a.png,4,1
2,B,X,red shoe sport,second,b.png,3,1
3,C,Y,blue hat,third,c.png,5,1
";

    const RATINGS: &str = "\
ID,ProdID,Name,Brand,Tags,Description,ImageURL,Rating,ReviewCount
1,p1,Boot,X,leather boot,,p1.png,5,1
1,p2,Sandal,X,summer sandal,,p2.png,4,1
2,p1,Boot,X,leather boot,,p1.png,5,1
2,p2,Sandal,X,summer sandal,,p2.png,4,1
2,p3,Slipper,Y,soft slipper,,p3.png,3,1
2,p4,Clog,Y,wooden clog,,p4.png,2,1
3,p5,Sneaker,Z,leather sneaker,,p5.png,5,1
";

    fn snapshot(csv: &str) -> Snapshot {
        Snapshot::build(Catalog::from_csv_bytes(csv.as_bytes()).unwrap())
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_similar_products_rank_shared_tags_first() {
        let snap = snapshot(SHOES);
        let result = snap.similar_to_query("A", QueryField::Name, 2).unwrap();
        assert_eq!(names(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_query_product_is_never_recommended() {
        let snap = snapshot(SHOES);
        for name in ["A", "B", "C"] {
            let result = snap.similar_to_query(name, QueryField::Name, 10).unwrap();
            assert!(result.iter().all(|p| p.name != name));
            assert!(result.len() <= snap.catalog().len() - 1);
        }
    }

    #[test]
    fn test_result_bounded_by_top_n() {
        let snap = snapshot(SHOES);
        assert_eq!(snap.similar_to_query("A", QueryField::Name, 1).unwrap().len(), 1);
        assert!(snap.similar_to_query("A", QueryField::Name, 0).unwrap().is_empty());
    }

    #[test]
    fn test_description_search() {
        let snap = snapshot(SHOES);
        let result = snap.similar_to_query("SECOND", QueryField::Description, 1).unwrap();
        assert_eq!(names(&result), vec!["A"]);
    }

    #[test]
    fn test_unmatched_query_is_not_found() {
        let snap = snapshot(SHOES);
        assert_eq!(
            snap.similar_to_query("zzz", QueryField::Name, 5).unwrap_err(),
            RecommendError::ItemNotFound("zzz".to_string())
        );
    }

    #[test]
    fn test_collaborative_picks_unrated_items_of_similar_users() {
        let snap = snapshot(RATINGS);
        let result = snap.recommend_for_user(1, 10).unwrap();
        // user 2 mirrors user 1 and adds p3, p4; user 3 then adds p5
        assert_eq!(names(&result), vec!["Slipper", "Clog", "Sneaker"]);
    }

    #[test]
    fn test_collaborative_stops_once_enough_candidates() {
        let snap = snapshot(RATINGS);
        let result = snap.recommend_for_user(1, 2).unwrap();
        assert_eq!(names(&result), vec!["Slipper", "Clog"]);
    }

    #[test]
    fn test_collaborative_unknown_user() {
        let snap = snapshot(RATINGS);
        assert_eq!(
            snap.recommend_for_user(999, 5).unwrap_err(),
            RecommendError::UserNotFound(999)
        );
    }

    #[test]
    fn test_hybrid_without_query_mirrors_collaborative() {
        let snap = snapshot(RATINGS);
        let result = snap.hybrid(1, None, 5).unwrap();
        assert!(result.content_based.is_empty());
        assert_eq!(names(&result.hybrid), names(&result.collaborative));
    }

    #[test]
    fn test_hybrid_with_unmatched_query_mirrors_collaborative() {
        let snap = snapshot(RATINGS);
        let result = snap.hybrid(1, Some("zzz"), 5).unwrap();
        assert!(result.content_based.is_empty());
        assert_eq!(names(&result.hybrid), names(&result.collaborative));
    }

    #[test]
    fn test_hybrid_blends_both_lists() {
        let snap = snapshot(RATINGS);
        let result = snap.hybrid(1, Some("boot"), 2).unwrap();
        // content: Sneaker (shares "leather"), then the first zero-score row
        assert_eq!(result.content_based[0].name, "Sneaker");
        assert_eq!(result.hybrid.len(), 2);
        assert!(result.hybrid.iter().any(|p| p.name == "Sneaker"));
    }

    #[test]
    fn test_hybrid_order_follows_weighted_ranks() {
        let snap = snapshot(RATINGS);
        let result = snap.hybrid(1, Some("boot"), 10).unwrap();
        // zero-score rows keep catalog order behind Sneaker
        assert_eq!(names(&result.content_based), vec!["Sneaker", "Sandal", "Slipper", "Clog"]);
        assert_eq!(names(&result.collaborative), vec!["Slipper", "Clog", "Sneaker"]);
        // Sneaker 0.6*1 + 0.4*3 = 1.8, Slipper 0.6*3 + 0.4*1 = 2.2,
        // Clog 0.6*4 + 0.4*2 = 3.2, Sandal 0.6*2 + 0.4*11 = 5.6
        assert_eq!(names(&result.hybrid), vec!["Sneaker", "Slipper", "Clog", "Sandal"]);
    }

    #[test]
    fn test_hybrid_requires_known_user() {
        let snap = snapshot(RATINGS);
        assert!(snap.hybrid(42, Some("boot"), 3).is_err());
    }
}
