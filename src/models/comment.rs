use serde::{Deserialize, Serialize};

use super::de;

/// Body of `POST /addcomment`
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub productname: Option<String>,
    #[serde(rename = "Brand", default)]
    pub brand: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "de::opt_f64")]
    pub rating: Option<f64>,
    #[serde(rename = "ReviewCount", default, deserialize_with = "de::opt_i64")]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated comment ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub user_id: i64,
    pub product_id: String,
    pub username: Option<String>,
    pub comment: String,
    pub productname: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub description: Option<String>,
}

/// Comment count for one product, with the product details of its first comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentedProduct {
    pub product_id: String,
    pub comment_count: i64,
    pub productname: String,
    pub brand: String,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_reads_client_field_names() {
        let request: AddCommentRequest = serde_json::from_value(json!({
            "user_id": 4,
            "product_id": "2b7c",
            "username": "ann",
            "comment": "Great fit",
            "productname": "Trail Runner",
            "Brand": "Acme",
            "Rating": "4.5",
            "ReviewCount": 12
        }))
        .unwrap();
        assert_eq!(request.user_id, Some(4));
        assert_eq!(request.brand.as_deref(), Some("Acme"));
        assert_eq!(request.rating, Some(4.5));
        assert_eq!(request.description, None);
    }
}
