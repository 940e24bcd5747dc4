use serde::{Deserialize, Serialize};

/// A catalog product, one row of the catalog file
///
/// Field names on the wire follow the catalog's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ProdID")]
    pub prod_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "ReviewCount")]
    pub review_count: i64,
}

/// One user's rating of one product
#[derive(Debug, Clone, PartialEq)]
pub struct RatingObservation {
    pub user_id: i64,
    pub prod_id: String,
    pub rating: f64,
}

/// Product view returned by the content-based endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ReviewCount")]
    pub review_count: i64,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            review_count: product.review_count,
            brand: product.brand.clone(),
            image_url: product.image_url.clone(),
            rating: product.rating,
        }
    }
}

/// Product view carrying its identifier, used by every list that can be
/// added to a cart or joined across recommenders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    #[serde(rename = "ProdID")]
    pub prod_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "ReviewCount")]
    pub review_count: i64,
}

impl From<&Product> for RecommendedProduct {
    fn from(product: &Product) -> Self {
        Self {
            prod_id: product.prod_id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            image_url: product.image_url.clone(),
            rating: product.rating,
            review_count: product.review_count,
        }
    }
}

/// A `(Name, ReviewCount, Brand, ImageURL)` group with its mean rating
/// truncated to an integer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedProduct {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ReviewCount")]
    pub review_count: i64,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "Rating")]
    pub rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRating {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "AverageRating")]
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub top_products: Vec<RecommendedProduct>,
    pub top_brands: Vec<BrandRating>,
}

/// The three recommendation lists, always all present
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HybridRecommendations {
    pub content_based: Vec<RecommendedProduct>,
    pub collaborative: Vec<RecommendedProduct>,
    pub hybrid: Vec<RecommendedProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            prod_id: "101".to_string(),
            name: "Trail Runner".to_string(),
            brand: "Acme".to_string(),
            tags: "shoe running".to_string(),
            description: "A light shoe".to_string(),
            image_url: "https://img/1.png".to_string(),
            rating: 4.5,
            review_count: 12,
        }
    }

    #[test]
    fn test_summary_uses_catalog_column_names() {
        let json = serde_json::to_value(ProductSummary::from(&sample())).unwrap();
        assert_eq!(json["Name"], "Trail Runner");
        assert_eq!(json["ReviewCount"], 12);
        assert_eq!(json["ImageURL"], "https://img/1.png");
        assert!(json.get("ProdID").is_none());
    }

    #[test]
    fn test_recommended_product_carries_id() {
        let json = serde_json::to_value(RecommendedProduct::from(&sample())).unwrap();
        assert_eq!(json["ProdID"], "101");
        assert_eq!(json["Rating"], 4.5);
    }

    #[test]
    fn test_hybrid_lists_serialize_even_when_empty() {
        let json = serde_json::to_value(HybridRecommendations::default()).unwrap();
        assert_eq!(json["content_based"], serde_json::json!([]));
        assert_eq!(json["collaborative"], serde_json::json!([]));
        assert_eq!(json["hybrid"], serde_json::json!([]));
    }
}
