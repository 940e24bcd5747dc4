use std::time::Instant;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{HybridRecommendations, Product, ProductSummary, RecommendedProduct},
    recommend::{QueryField, RecommendError, Snapshot},
};

/// Number of products the collaborative endpoint returns
pub const COLLABORATIVE_TOP_N: usize = 20;

fn to_recommended(products: Vec<&Product>) -> Vec<RecommendedProduct> {
    products.into_iter().map(RecommendedProduct::from).collect()
}

/// Products whose tags resemble those of the product whose name matches `item_name`
pub async fn content_based(
    snapshot: &Snapshot,
    cache: &Cache,
    item_name: Option<&str>,
    top_n: usize,
) -> AppResult<Vec<ProductSummary>> {
    let query = item_name
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Item name is required".to_string()))?;

    let started = Instant::now();
    let key = CacheKey::SimilarByName {
        fingerprint: snapshot.catalog().short_fingerprint().to_string(),
        query: query.to_string(),
        top_n,
    };
    let products: Vec<ProductSummary> = cached!(cache, key, cache.ttl(), async {
        snapshot
            .similar_to_query(query, QueryField::Name, top_n)
            .map(|found| found.into_iter().map(ProductSummary::from).collect::<Vec<_>>())
            .map_err(AppError::from)
    })?;

    tracing::debug!(
        query,
        top_n,
        results = products.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Content-based recommendations"
    );
    Ok(products)
}

/// Like [`content_based`], but the query is matched against descriptions
pub async fn similar_by_description(
    snapshot: &Snapshot,
    cache: &Cache,
    description: Option<&str>,
    top_n: usize,
) -> AppResult<Vec<ProductSummary>> {
    let query = description
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Description is required".to_string()))?;

    let key = CacheKey::SimilarByDescription {
        fingerprint: snapshot.catalog().short_fingerprint().to_string(),
        query: query.to_string(),
        top_n,
    };
    let products: Vec<ProductSummary> = cached!(cache, key, cache.ttl(), async {
        match snapshot.similar_to_query(query, QueryField::Description, top_n) {
            Ok(found) => Ok(found.into_iter().map(ProductSummary::from).collect::<Vec<_>>()),
            Err(RecommendError::ItemNotFound(_)) => {
                Err(AppError::NotFound("No similar products found".to_string()))
            }
            Err(e) => Err(AppError::from(e)),
        }
    })?;

    tracing::debug!(query, top_n, results = products.len(), "Description search");
    Ok(products)
}

/// Products liked by the users whose ratings most resemble `user_id`'s
pub async fn collaborative(
    snapshot: &Snapshot,
    cache: &Cache,
    user_id: Option<i64>,
) -> AppResult<Vec<RecommendedProduct>> {
    let user_id = user_id.ok_or_else(|| AppError::InvalidInput("User ID is required".to_string()))?;

    let started = Instant::now();
    let key = CacheKey::Collaborative {
        fingerprint: snapshot.catalog().short_fingerprint().to_string(),
        user_id,
        top_n: COLLABORATIVE_TOP_N,
    };
    let products: Vec<RecommendedProduct> = cached!(cache, key, cache.ttl(), async {
        snapshot
            .recommend_for_user(user_id, COLLABORATIVE_TOP_N)
            .map(to_recommended)
            .map_err(AppError::from)
    })?;

    tracing::debug!(
        user_id,
        results = products.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Collaborative recommendations"
    );
    Ok(products)
}

/// Content-based, collaborative and blended lists for one user
pub async fn hybrid(
    snapshot: &Snapshot,
    cache: &Cache,
    user_id: Option<i64>,
    item_name: Option<&str>,
    top_n: usize,
) -> AppResult<HybridRecommendations> {
    let user_id = user_id.ok_or_else(|| AppError::InvalidInput("User ID is required".to_string()))?;
    let query = item_name.filter(|q| !q.is_empty());

    let started = Instant::now();
    let key = CacheKey::Hybrid {
        fingerprint: snapshot.catalog().short_fingerprint().to_string(),
        user_id,
        query: query.map(str::to_string),
        top_n,
    };
    let result: HybridRecommendations = cached!(cache, key, cache.ttl(), async {
        snapshot
            .hybrid(user_id, query, top_n)
            .map(|lists| HybridRecommendations {
                content_based: to_recommended(lists.content_based),
                collaborative: to_recommended(lists.collaborative),
                hybrid: to_recommended(lists.hybrid),
            })
            .map_err(AppError::from)
    })?;

    tracing::debug!(
        user_id,
        top_n,
        content = result.content_based.len(),
        collaborative = result.collaborative.len(),
        hybrid = result.hybrid.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Hybrid recommendations"
    );
    Ok(result)
}
