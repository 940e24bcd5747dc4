pub mod auth;
pub mod cart;
pub mod catalog;
pub mod comments;
pub mod recommendations;

pub use cart::{BrandRecommendations, CartChange};
