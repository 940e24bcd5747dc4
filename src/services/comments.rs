use crate::{
    db::CommentStore,
    error::{AppError, AppResult},
    models::{AddCommentRequest, CommentedProduct, NewComment},
};

/// Stores a comment; `user_id`, `product_id` and `comment` must be present
pub async fn add_comment(comments: &dyn CommentStore, request: AddCommentRequest) -> AppResult<()> {
    let missing = || AppError::InvalidInput("Missing data".to_string());
    let user_id = request.user_id.ok_or_else(missing)?;
    let product_id = request.product_id.filter(|p| !p.is_empty()).ok_or_else(missing)?;
    let comment = request.comment.filter(|c| !c.is_empty()).ok_or_else(missing)?;

    comments
        .insert_comment(NewComment {
            user_id,
            product_id: product_id.clone(),
            username: request.username,
            comment,
            productname: request.productname,
            brand: request.brand,
            rating: request.rating,
            review_count: request.review_count,
            description: request.description,
        })
        .await?;

    tracing::info!(user_id, product_id = %product_id, "Comment added");
    Ok(())
}

pub async fn top_commented(comments: &dyn CommentStore) -> AppResult<Vec<CommentedProduct>> {
    let products = comments.most_commented().await?;
    tracing::debug!(results = products.len(), "Most commented products");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockCommentStore;

    fn request() -> AddCommentRequest {
        AddCommentRequest {
            user_id: Some(4),
            product_id: Some("2b7c".to_string()),
            username: Some("ann".to_string()),
            comment: Some("Great fit".to_string()),
            productname: Some("Trail Runner".to_string()),
            brand: Some("Acme".to_string()),
            rating: Some(4.5),
            review_count: Some(12),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_add_comment_stores_every_field() {
        let mut comments = MockCommentStore::new();
        comments
            .expect_insert_comment()
            .withf(|c| {
                c.user_id == 4
                    && c.product_id == "2b7c"
                    && c.comment == "Great fit"
                    && c.brand.as_deref() == Some("Acme")
            })
            .times(1)
            .returning(|_| Ok(()));

        tokio_test::assert_ok!(add_comment(&comments, request()).await);
    }

    #[tokio::test]
    async fn test_add_comment_requires_text() {
        let mut comments = MockCommentStore::new();
        comments.expect_insert_comment().never();

        let mut req = request();
        req.comment = Some(String::new());
        let err = add_comment(&comments, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "Missing data"));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut comments = MockCommentStore::new();
        comments
            .expect_most_commented()
            .returning(|| Err(AppError::Internal("Failed to fetch top comments products".to_string())));

        assert!(top_commented(&comments).await.is_err());
    }
}
