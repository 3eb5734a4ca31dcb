use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::{Product, ProductClass};
use crate::errors::{ApplicationError, DomainError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Invalid(error) => ApplicationError::Domain(error),
            CatalogError::Parse(error) => ApplicationError::MalformedCatalog(error.to_string()),
            read @ CatalogError::ReadFile { .. } => ApplicationError::Catalog(read.to_string()),
        }
    }
}

/// In-memory catalog snapshot taken once per request.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Builds a catalog after checking ids are unique and prices non-negative.
    pub fn try_new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(DomainError::DuplicateProduct(product.id));
            }
            if product.price < Decimal::ZERO {
                return Err(DomainError::NegativePrice(product.id));
            }
        }
        Ok(Self { products })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let products = serde_json::from_str::<Vec<Product>>(raw)?;
        Ok(Self::try_new(products)?)
    }

    pub fn load_json(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Listed products of one class.
    pub fn in_class<'a, 'b>(
        &'a self,
        class: ProductClass,
        parts_category: &'b str,
    ) -> impl Iterator<Item = &'a Product> + 'b
    where
        'a: 'b,
    {
        self.products
            .iter()
            .filter(move |product| product.is_listed())
            .filter(move |product| ProductClass::of(product, parts_category) == class)
    }
}

/// Inclusive price-range check; unset bounds do not constrain.
pub fn within_budget(product: &Product, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    if let Some(min) = min {
        if product.price < min {
            return false;
        }
    }
    if let Some(max) = max {
        if product.price > max {
            return false;
        }
    }
    true
}
