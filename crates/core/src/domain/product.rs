use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog entry as exposed by the storefront. Read-only to the advisor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "listed_by_default")]
    pub active: bool,
    #[serde(default = "listed_by_default")]
    pub published: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn listed_by_default() -> bool {
    true
}

impl Product {
    pub fn brand_name(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }

    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Only active and published products may be suggested.
    pub fn is_listed(&self) -> bool {
        self.active && self.published
    }

    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// The two mutually exclusive product classes the advisor searches in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductClass {
    Vehicle,
    Part,
}

impl ProductClass {
    pub fn of(product: &Product, parts_category: &str) -> Self {
        if product.category_name().trim().to_lowercase() == parts_category.trim().to_lowercase() {
            Self::Part
        } else {
            Self::Vehicle
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, ProductClass, ProductId};

    #[test]
    fn deserializes_with_defaults_for_optional_fields() {
        let product: Product =
            serde_json::from_str(r#"{"id": 7, "name": "Honda Vision", "price": 31000000}"#)
                .expect("minimal product should deserialize");

        assert_eq!(product.id, ProductId(7));
        assert_eq!(product.price, Decimal::from(31_000_000));
        assert!(product.brand.is_none());
        assert!(product.tags.is_empty());
        assert!(product.is_listed());
        assert_eq!(product.brand_name(), "");
        assert_eq!(product.category_name(), "");
    }

    #[test]
    fn class_compares_category_case_insensitively() {
        let mut product: Product =
            serde_json::from_str(r#"{"id": 1, "name": "Nhớt Motul", "price": 120000}"#)
                .expect("product should deserialize");
        assert_eq!(ProductClass::of(&product, "Phụ tùng"), ProductClass::Vehicle);

        product.category = Some(" PHỤ TÙNG ".to_string());
        assert_eq!(ProductClass::of(&product, "phụ tùng"), ProductClass::Part);
    }

    #[test]
    fn unpublished_products_are_not_listed() {
        let product: Product = serde_json::from_str(
            r#"{"id": 2, "name": "Yamaha Exciter", "price": 47000000, "published": false}"#,
        )
        .expect("product should deserialize");
        assert!(!product.is_listed());
    }
}
