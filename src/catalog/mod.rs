//! The product catalog: an immutable, in-memory table loaded once from CSV.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs::File,
    io::Read,
    path::Path,
};

use thiserror::Error;

use crate::models::{BrandRating, Product, RatedProduct, RatingObservation};

mod loader;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog row at line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// Read-only product table, in file order
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    observations: Vec<RatingObservation>,
    /// ProdID -> first row carrying it
    first_row: HashMap<String, usize>,
    fingerprint: String,
}

impl Catalog {
    /// Loads the catalog file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            observations = catalog.observations.len(),
            fingerprint = %catalog.short_fingerprint(),
            "Loaded product catalog"
        );

        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(Self::assemble(loader::load(reader)?))
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        Ok(Self::assemble(loader::parse(bytes)?))
    }

    fn assemble(loaded: loader::LoadedCatalog) -> Self {
        let mut first_row = HashMap::new();
        for (idx, product) in loaded.products.iter().enumerate() {
            first_row.entry(product.prod_id.clone()).or_insert(idx);
        }

        Self {
            products: loaded.products,
            observations: loaded.observations,
            first_row,
            fingerprint: loaded.fingerprint,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn observations(&self) -> &[RatingObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// SHA-256 of the catalog file, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..self.fingerprint.len().min(16)]
    }

    /// First row carrying `prod_id`
    pub fn product_by_id(&self, prod_id: &str) -> Option<&Product> {
        self.first_row.get(prod_id).map(|&idx| &self.products[idx])
    }

    /// Index of the first product whose name contains `query`, ignoring case
    pub fn find_by_name(&self, query: &str) -> Option<usize> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .position(|p| p.name.to_lowercase().contains(&needle))
    }

    /// Index of the first product whose description contains `query`, ignoring case
    pub fn find_by_description(&self, query: &str) -> Option<usize> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .position(|p| p.description.to_lowercase().contains(&needle))
    }

    /// Distinct non-empty brands in order of first appearance
    pub fn brands(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.brand.as_str())
            .filter(|brand| !brand.is_empty() && seen.insert(*brand))
            .collect()
    }

    /// Every row of `brand`, compared case-insensitively
    pub fn products_by_brand(&self, brand: &str) -> Vec<&Product> {
        let brand = brand.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.brand.to_lowercase() == brand)
            .collect()
    }

    /// All rows grouped by brand, brands in sorted order
    pub fn products_grouped_by_brand(&self) -> BTreeMap<&str, Vec<&Product>> {
        let mut groups: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
        for product in self.products.iter().filter(|p| !p.brand.is_empty()) {
            groups.entry(product.brand.as_str()).or_default().push(product);
        }
        groups
    }

    /// Products of any of `brands`, one per ProdID, in catalog order
    pub fn products_in_brands(&self, brands: &HashSet<String>) -> Vec<&Product> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .filter(|p| brands.contains(&p.brand) && seen.insert(p.prod_id.as_str()))
            .collect()
    }

    /// Highest rated products, one per ProdID
    pub fn top_products(&self, limit: usize) -> Vec<&Product> {
        let mut seen = HashSet::new();
        let mut unique: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| seen.insert(p.prod_id.as_str()))
            .collect();
        unique.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        unique.truncate(limit);
        unique
    }

    /// Mean rating per `(Name, ReviewCount, Brand, ImageURL)` group, best first
    pub fn top_rated(&self, limit: usize) -> Vec<RatedProduct> {
        let mut groups: BTreeMap<(&str, i64, &str, &str), (f64, usize)> = BTreeMap::new();
        for p in &self.products {
            let entry = groups
                .entry((p.name.as_str(), p.review_count, p.brand.as_str(), p.image_url.as_str()))
                .or_insert((0.0, 0));
            entry.0 += p.rating;
            entry.1 += 1;
        }

        let mut rated: Vec<_> = groups
            .into_iter()
            .map(|(key, (sum, count))| (key, sum / count as f64))
            .collect();
        rated.sort_by(|a, b| b.1.total_cmp(&a.1));

        rated
            .into_iter()
            .take(limit)
            .map(|((name, review_count, brand, image_url), mean)| RatedProduct {
                name: name.to_string(),
                review_count,
                brand: brand.to_string(),
                image_url: image_url.to_string(),
                rating: mean.trunc() as i64,
            })
            .collect()
    }

    /// Brands by mean rating, best first
    pub fn top_brands(&self, limit: usize) -> Vec<BrandRating> {
        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for p in self.products.iter().filter(|p| !p.brand.is_empty()) {
            let entry = groups.entry(p.brand.as_str()).or_insert((0.0, 0));
            entry.0 += p.rating;
            entry.1 += 1;
        }

        let mut brands: Vec<BrandRating> = groups
            .into_iter()
            .map(|(brand, (sum, count))| BrandRating {
                brand: brand.to_string(),
                average_rating: sum / count as f64,
            })
            .collect();
        brands.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
        brands.truncate(limit);
        brands
    }
}
