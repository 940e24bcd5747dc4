use serde::{Deserialize, Serialize};

use super::de;

/// Product fields the client sends when adding to a cart
///
/// Unknown fields of the posted product are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Brand", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(
        rename = "ProdID",
        default,
        deserialize_with = "de::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub prod_id: Option<String>,
    #[serde(rename = "ImageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        rename = "Rating",
        default,
        deserialize_with = "de::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(
        rename = "ReviewCount",
        default,
        deserialize_with = "de::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_count: Option<i64>,
}

/// A cart line: the product plus how many of it the user holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: CartProduct,
    pub count: i64,
}

/// What `add_to_cart` did to the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAddOutcome {
    Added,
    Incremented,
}

impl CartAddOutcome {
    pub fn message(self) -> &'static str {
        match self {
            CartAddOutcome::Added => "Product added to cart",
            CartAddOutcome::Incremented => "Product quantity increased",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub product: Option<CartProduct>,
}

/// Body of the per-item cart mutations
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
pub struct CartUpdateResponse {
    pub message: String,
    pub cart: Vec<CartItem>,
}
