//! Types for the recommender

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::scoring::ScoringWeights;
use crate::domain::product::{Product, ProductId};

/// How a suggestion earned its place in the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ranking {
    /// Passed the hard filters and scored above zero
    Matched { score: u32 },
    /// Substitute item shown because nothing matched
    Fallback,
}

impl Ranking {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Ranking::Fallback)
    }

    pub fn score(&self) -> Option<u32> {
        match self {
            Ranking::Matched { score } => Some(*score),
            Ranking::Fallback => None,
        }
    }
}

/// One recommended product with display fields and a justification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub reason: String,
    pub ranking: Ranking,
}

impl Suggestion {
    pub fn from_product(product: &Product, ranking: Ranking, reason: String) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            brand: product.brand.clone(),
            category: product.category.clone(),
            reason,
            ranking,
        }
    }
}

/// Tunable limits and weights for the recommender.
#[derive(Clone, Debug, PartialEq)]
pub struct RecommenderSettings {
    /// Maximum ranked suggestions returned
    pub max_results: usize,
    /// Maximum fallback suggestions returned
    pub fallback_limit: usize,
    /// Price at or below this share of the budget maximum earns the headroom bonus
    pub headroom_ratio: Decimal,
    /// Category name that marks parts/accessories
    pub parts_category: String,
    pub weights: ScoringWeights,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            max_results: super::DEFAULT_MAX_RESULTS,
            fallback_limit: super::DEFAULT_FALLBACK_LIMIT,
            headroom_ratio: Decimal::new(super::DEFAULT_HEADROOM_PERCENT.into(), 2),
            parts_category: super::DEFAULT_PARTS_CATEGORY.to_string(),
            weights: ScoringWeights::default(),
        }
    }
}
