//! Storage abstraction for accounts, carts and comments
//!
//! Every cart mutation is a single atomic per-item operation; no
//! implementation reads a whole cart and writes it back.
use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{CartAddOutcome, CartItem, CartProduct, CommentedProduct, NewComment, NewUser, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account, assigning its id
    ///
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Adds one of `product`, matched by name, incrementing an existing line
    async fn add_item(&self, user_id: i64, product: CartProduct) -> AppResult<CartAddOutcome>;

    /// Cart lines in the order they were first added
    async fn cart(&self, user_id: i64) -> AppResult<Vec<CartItem>>;

    /// Increments the line named `name`, no-op when absent
    async fn increment_item(&self, user_id: i64, name: &str) -> AppResult<()>;

    /// Decrements the line named `name`, removing it when its count would reach zero
    async fn decrement_item(&self, user_id: i64, name: &str) -> AppResult<()>;

    async fn remove_item(&self, user_id: i64, name: &str) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, comment: NewComment) -> AppResult<()>;

    /// Products by number of comments, most commented first
    async fn most_commented(&self) -> AppResult<Vec<CommentedProduct>>;
}
