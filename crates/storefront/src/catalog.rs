//! Plant catalog.
//!
//! The catalog is a JSON document of categories and plants. Costs are written
//! in display form (`"$15.00"`) and parsed into [`Price`] once, at load time,
//! so a malformed cost stops startup instead of surfacing later in cart totals.
//!
//! The default catalog is embedded from `content/catalog.json`; a different file
//! can be supplied with `STOREFRONT_CATALOG_PATH`.

use std::collections::HashSet;
use std::path::Path;

use paradise_nursery_core::{CurrencyCode, NewCartItem, Price, PriceError};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid cost for {plant}: {source}")]
    InvalidCost { plant: String, source: PriceError },
    #[error("plant listed more than once: {0}")]
    DuplicatePlant(String),
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: String,
    plants: Vec<RawPlant>,
}

#[derive(Debug, Deserialize)]
struct RawPlant {
    name: String,
    image: String,
    #[serde(default)]
    description: String,
    cost: String,
}

/// A plant offered for sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plant {
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: Price,
}

impl Plant {
    /// The cart line this plant becomes when added.
    #[must_use]
    pub fn to_cart_item(&self) -> NewCartItem {
        NewCartItem {
            name: self.name.clone(),
            image: self.image.clone(),
            unit_price: self.price,
        }
    }
}

/// A named group of plants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub plants: Vec<Plant>,
}

/// All plants offered, grouped by category. Plant names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// The catalog bundled with the storefront.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a bundled cost is not in `currency`.
    pub fn embedded(currency: CurrencyCode) -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG, currency)
    }

    /// Load a catalog file from disk.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load(path: &Path, currency: CurrencyCode) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, currency)
    }

    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON, a cost that does not parse
    /// in `currency`, or a plant name that appears twice.
    pub fn from_json(json: &str, currency: CurrencyCode) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut seen = HashSet::new();

        let categories = raw
            .categories
            .into_iter()
            .map(|category| {
                let plants = category
                    .plants
                    .into_iter()
                    .map(|plant| {
                        if !seen.insert(plant.name.clone()) {
                            return Err(CatalogError::DuplicatePlant(plant.name));
                        }
                        let price = Price::parse(&plant.cost, currency).map_err(|source| {
                            CatalogError::InvalidCost {
                                plant: plant.name.clone(),
                                source,
                            }
                        })?;
                        Ok(Plant {
                            name: plant.name,
                            image: plant.image,
                            description: plant.description,
                            price,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Category {
                    name: category.name,
                    plants,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Self { categories })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a plant by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Plant> {
        self.categories
            .iter()
            .flat_map(|category| category.plants.iter())
            .find(|plant| plant.name == name)
    }
}
