use std::io::Read;

use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};

use super::CatalogError;
use crate::models::{
    de::{normalize_id, parse_i64},
    Product, RatingObservation,
};

/// One line of the catalog file
///
/// Only the columns the storefront reads are mapped; any others are ignored.
/// `ID` is the reviewing user and is optional.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "ID", default, deserialize_with = "lenient_opt_i64")]
    user_id: Option<i64>,
    #[serde(rename = "ProdID", deserialize_with = "id_column")]
    prod_id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Brand", default)]
    brand: String,
    #[serde(rename = "Tags", default)]
    tags: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "ImageURL", default)]
    image_url: String,
    #[serde(rename = "Rating", default, deserialize_with = "lenient_f64")]
    rating: f64,
    #[serde(rename = "ReviewCount", default, deserialize_with = "lenient_i64")]
    review_count: i64,
}

fn id_column<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(normalize_id(&String::deserialize(d)?))
}

fn lenient_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = String::deserialize(d)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_i64(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid integer: {}", raw)))
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(lenient_opt_i64(d)?.unwrap_or(0))
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(d)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid number: {}", raw)))
}

/// Parsed catalog contents
pub(super) struct LoadedCatalog {
    pub products: Vec<Product>,
    pub observations: Vec<RatingObservation>,
    pub fingerprint: String,
}

/// Reads the whole catalog, fingerprinting the raw bytes
pub(super) fn load<R: Read>(mut reader: R) -> Result<LoadedCatalog, CatalogError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse(&bytes)
}

pub(super) fn parse(bytes: &[u8]) -> Result<LoadedCatalog, CatalogError> {
    let fingerprint = hex::encode(Sha256::digest(bytes));

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(bytes);

    let mut products = Vec::new();
    let mut observations = Vec::new();

    for (line, record) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = record.map_err(|source| CatalogError::Row {
            // header is line 1
            line: line + 2,
            source,
        })?;

        if let Some(user_id) = row.user_id {
            observations.push(RatingObservation {
                user_id,
                prod_id: row.prod_id.clone(),
                rating: row.rating,
            });
        }

        products.push(Product {
            prod_id: row.prod_id,
            name: row.name,
            brand: row.brand,
            tags: row.tags,
            description: row.description,
            image_url: row.image_url,
            rating: row.rating,
            review_count: row.review_count,
        });
    }

    Ok(LoadedCatalog {
        products,
        observations,
        fingerprint,
    })
}
