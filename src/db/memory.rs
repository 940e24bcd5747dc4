use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{CartStore, CommentStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{CartAddOutcome, CartItem, CartProduct, CommentedProduct, NewComment, NewUser, User},
};

/// In-process store for tests and database-less runs
///
/// Each mutation holds the write lock for its whole duration.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: Vec<User>,
    carts: HashMap<i64, Vec<CartItem>>,
    comments: Vec<NewComment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists!".to_string()));
        }

        let stored = User {
            user_id: inner.users.len() as i64 + 1,
            name: user.name,
            mobile_no: user.mobile_no,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        inner.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.user_id == user_id).cloned())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn add_item(&self, user_id: i64, product: CartProduct) -> AppResult<CartAddOutcome> {
        let mut inner = self.inner.write().await;
        let cart = inner.carts.entry(user_id).or_default();

        if let Some(item) = cart.iter_mut().find(|i| i.product.name == product.name) {
            item.count += 1;
            return Ok(CartAddOutcome::Incremented);
        }

        cart.push(CartItem { product, count: 1 });
        Ok(CartAddOutcome::Added)
    }

    async fn cart(&self, user_id: i64) -> AppResult<Vec<CartItem>> {
        let inner = self.inner.read().await;
        Ok(inner.carts.get(&user_id).cloned().unwrap_or_default())
    }

    async fn increment_item(&self, user_id: i64, name: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(item) = inner
            .carts
            .get_mut(&user_id)
            .and_then(|cart| cart.iter_mut().find(|i| i.product.name == name))
        {
            item.count += 1;
        }
        Ok(())
    }

    async fn decrement_item(&self, user_id: i64, name: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(cart) = inner.carts.get_mut(&user_id) {
            if let Some(pos) = cart.iter().position(|i| i.product.name == name) {
                if cart[pos].count > 1 {
                    cart[pos].count -= 1;
                } else {
                    cart.remove(pos);
                }
            }
        }
        Ok(())
    }

    async fn remove_item(&self, user_id: i64, name: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(cart) = inner.carts.get_mut(&user_id) {
            cart.retain(|i| i.product.name != name);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, comment: NewComment) -> AppResult<()> {
        self.inner.write().await.comments.push(comment);
        Ok(())
    }

    async fn most_commented(&self) -> AppResult<Vec<CommentedProduct>> {
        let inner = self.inner.read().await;

        // First comment of each product supplies the product details
        let mut products: Vec<CommentedProduct> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for comment in &inner.comments {
            match positions.get(comment.product_id.as_str()) {
                Some(&pos) => products[pos].comment_count += 1,
                None => {
                    positions.insert(comment.product_id.as_str(), products.len());
                    products.push(CommentedProduct {
                        product_id: comment.product_id.clone(),
                        comment_count: 1,
                        productname: comment.productname.clone().unwrap_or_default(),
                        brand: comment.brand.clone().unwrap_or_default(),
                        rating: comment.rating,
                        review_count: comment.review_count,
                        description: comment.description.clone(),
                    });
                }
            }
        }

        products.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));
        Ok(products)
    }
}
