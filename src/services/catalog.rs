use std::collections::BTreeMap;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    models::{DashboardData, Product, RatedProduct, RecommendedProduct},
};

const TOP_RATED_LIMIT: usize = 10;
const DASHBOARD_LIMIT: usize = 10;

fn non_empty(catalog: &Catalog) -> AppResult<()> {
    if catalog.is_empty() {
        return Err(AppError::Internal("Dataset is empty".to_string()));
    }
    Ok(())
}

pub fn brands(catalog: &Catalog) -> AppResult<Vec<String>> {
    non_empty(catalog)?;
    Ok(catalog.brands().into_iter().map(str::to_string).collect())
}

pub fn products_by_brand(catalog: &Catalog, brand: Option<&str>) -> AppResult<Vec<Product>> {
    let brand = brand
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Brand parameter is required".to_string()))?;

    let products: Vec<Product> = catalog.products_by_brand(brand).into_iter().cloned().collect();
    if products.is_empty() {
        return Err(AppError::NoMatches("No products found for this brand".to_string()));
    }

    tracing::debug!(brand, results = products.len(), "Products by brand");
    Ok(products)
}

pub fn brands_with_products(catalog: &Catalog) -> AppResult<BTreeMap<String, Vec<Product>>> {
    non_empty(catalog)?;
    Ok(catalog
        .products_grouped_by_brand()
        .into_iter()
        .map(|(brand, products)| (brand.to_string(), products.into_iter().cloned().collect()))
        .collect())
}

/// Best groups by mean rating, ignoring any user
pub fn top_rated(catalog: &Catalog) -> Vec<RatedProduct> {
    catalog.top_rated(TOP_RATED_LIMIT)
}

pub fn dashboard(catalog: &Catalog) -> DashboardData {
    DashboardData {
        top_products: catalog
            .top_products(DASHBOARD_LIMIT)
            .into_iter()
            .map(RecommendedProduct::from)
            .collect(),
        top_brands: catalog.top_brands(DASHBOARD_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::STORE_CSV;

    fn catalog() -> Catalog {
        Catalog::from_csv_bytes(STORE_CSV.as_bytes()).unwrap()
    }

    fn empty() -> Catalog {
        Catalog::from_csv_bytes(b"ProdID,Name,Brand,Tags,Description,ImageURL,Rating,ReviewCount\n").unwrap()
    }

    #[test]
    fn test_empty_catalog_brand_listings_fail() {
        assert!(matches!(brands(&empty()), Err(AppError::Internal(msg)) if msg == "Dataset is empty"));
        assert!(brands_with_products(&empty()).is_err());
    }

    #[test]
    fn test_products_by_brand_validation() {
        let catalog = catalog();
        assert!(matches!(
            products_by_brand(&catalog, None),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            products_by_brand(&catalog, Some("Nobody")),
            Err(AppError::NoMatches(msg)) if msg == "No products found for this brand"
        ));
        assert_eq!(products_by_brand(&catalog, Some("ACME")).unwrap().len(), 3);
    }

    #[test]
    fn test_brands_with_products_sorted() {
        let grouped = brands_with_products(&catalog()).unwrap();
        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Acme", "Hatco", "acme"]);
    }

    #[test]
    fn test_dashboard_lists_are_bounded() {
        let data = dashboard(&catalog());
        assert!(data.top_products.len() <= DASHBOARD_LIMIT);
        assert_eq!(data.top_products[0].prod_id, "10");
        assert!(data.top_brands.len() <= DASHBOARD_LIMIT);
    }
}
