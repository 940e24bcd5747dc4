pub mod cart;
pub mod comment;
pub mod de;
pub mod product;
pub mod user;

pub use cart::{
    AddToCartRequest, CartAddOutcome, CartItem, CartItemRequest, CartProduct, CartResponse,
    CartUpdateResponse,
};
pub use comment::{AddCommentRequest, CommentedProduct, NewComment};
pub use product::{
    BrandRating, DashboardData, HybridRecommendations, Product, ProductSummary, RatedProduct,
    RatingObservation, RecommendedProduct,
};
pub use user::{LoginRequest, LoginResponse, NewUser, SignupRequest, User};
