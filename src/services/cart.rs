use std::collections::HashSet;

use serde::Serialize;

use crate::{
    catalog::Catalog,
    db::{CartStore, UserStore},
    error::{AppError, AppResult},
    models::{
        AddToCartRequest, CartAddOutcome, CartItem, CartItemRequest, CartUpdateResponse,
        RecommendedProduct,
    },
};

/// Answer of the brand-based recommendation
///
/// An empty or brandless cart is not an error; it answers with a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BrandRecommendations {
    Message { message: String },
    Products(Vec<RecommendedProduct>),
}

async fn ensure_user(users: &dyn UserStore, user_id: i64) -> AppResult<()> {
    match users.find_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}

pub async fn add_to_cart(
    users: &dyn UserStore,
    carts: &dyn CartStore,
    request: AddToCartRequest,
) -> AppResult<CartAddOutcome> {
    let (Some(user_id), Some(product)) = (request.user_id, request.product) else {
        return Err(AppError::InvalidInput("Missing user_id or product".to_string()));
    };
    if product.name.is_empty() {
        return Err(AppError::InvalidInput("Missing user_id or product".to_string()));
    }
    ensure_user(users, user_id).await?;

    let name = product.name.clone();
    let outcome = carts.add_item(user_id, product).await?;
    tracing::info!(user_id, product = %name, ?outcome, "Cart item added");
    Ok(outcome)
}

pub async fn get_cart(
    users: &dyn UserStore,
    carts: &dyn CartStore,
    user_id: Option<i64>,
) -> AppResult<Vec<CartItem>> {
    let user_id = user_id.ok_or_else(|| AppError::InvalidInput("Missing user_id".to_string()))?;
    ensure_user(users, user_id).await?;
    carts.cart(user_id).await
}

/// Which per-item change a cart mutation applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Increase,
    Decrease,
    Remove,
}

impl CartChange {
    fn message(self) -> &'static str {
        match self {
            CartChange::Increase => "Cart updated",
            CartChange::Decrease => "Item quantity updated",
            CartChange::Remove => "Item removed from cart",
        }
    }
}

/// Applies one per-item change and returns the resulting cart
///
/// Naming a product that is not in the cart leaves the cart unchanged.
pub async fn update_cart(
    users: &dyn UserStore,
    carts: &dyn CartStore,
    change: CartChange,
    request: CartItemRequest,
) -> AppResult<CartUpdateResponse> {
    let (Some(user_id), Some(name)) = (request.user_id, request.product_name) else {
        return Err(AppError::InvalidInput("Missing user_id or product_name".to_string()));
    };
    ensure_user(users, user_id).await?;

    match change {
        CartChange::Increase => carts.increment_item(user_id, &name).await?,
        CartChange::Decrease => carts.decrement_item(user_id, &name).await?,
        CartChange::Remove => carts.remove_item(user_id, &name).await?,
    }
    tracing::debug!(user_id, product = %name, ?change, "Cart updated");

    Ok(CartUpdateResponse {
        message: change.message().to_string(),
        cart: carts.cart(user_id).await?,
    })
}

/// Catalog products sharing a brand with anything in the user's cart
pub async fn recommend_by_brand(
    users: &dyn UserStore,
    carts: &dyn CartStore,
    catalog: &Catalog,
    user_id: Option<i64>,
) -> AppResult<BrandRecommendations> {
    let user_id = user_id.ok_or_else(|| AppError::InvalidInput("User ID is required".to_string()))?;
    ensure_user(users, user_id).await?;

    let cart = carts.cart(user_id).await?;
    if cart.is_empty() {
        return Ok(BrandRecommendations::Message {
            message: "No items in cart".to_string(),
        });
    }

    let brands: HashSet<String> = cart
        .into_iter()
        .filter_map(|item| item.product.brand)
        .collect();
    if brands.is_empty() {
        return Ok(BrandRecommendations::Message {
            message: "No brand information available in cart".to_string(),
        });
    }

    let products: Vec<RecommendedProduct> = catalog
        .products_in_brands(&brands)
        .into_iter()
        .map(RecommendedProduct::from)
        .collect();
    if products.is_empty() {
        return Err(AppError::NoMatches(
            "No recommended products found for these brands".to_string(),
        ));
    }

    tracing::debug!(user_id, brands = brands.len(), results = products.len(), "Brand recommendations");
    Ok(BrandRecommendations::Products(products))
}
