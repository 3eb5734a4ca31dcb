//! Scoring rules for recommendation candidates

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductClass};
use crate::query::ParsedQuery;
use crate::tags;

/// Additive points awarded by each scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Product carries a requested part tag (default: 100)
    pub part_tag_match: u32,
    /// Product name hints at a requested part type nobody is tagged with yet (default: 80)
    pub part_name_hint: u32,
    /// Flat score when browsing parts without a specific type (default: 10)
    pub part_browse_base: u32,
    /// Part brand field matches a preferred brand (default: 20)
    pub part_brand_field: u32,
    /// Preferred brand appears in the part name (default: 25)
    pub part_brand_in_name: u32,
    /// Requested model appears in the part name (default: 30)
    pub part_model_in_name: u32,
    /// Vehicle brand field matches a preferred brand (default: 50)
    pub vehicle_brand: u32,
    /// Requested model appears in the vehicle name (default: 100)
    pub vehicle_model_in_name: u32,
    /// Per preferred tag carried by the vehicle (default: 5)
    pub vehicle_tag: u32,
    /// Price leaves headroom under the budget maximum (default: 2)
    pub budget_headroom: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Catalog-level facts the part scorer needs.
#[derive(Debug, Clone, Default)]
pub struct PartTagCoverage<'a> {
    tagged: BTreeSet<&'a str>,
}

impl<'a> PartTagCoverage<'a> {
    /// Collects every part tag carried by at least one in-class product.
    pub fn from_products<I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let tagged = products
            .into_iter()
            .flat_map(|product| product.tags.iter().map(String::as_str))
            .filter(|tag| tags::is_part_tag(tag))
            .collect();
        Self { tagged }
    }

    /// Whether any product has been tagged with `tag` yet.
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tagged.contains(tag)
    }
}

/// Score calculator for recommendation candidates
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
    headroom_ratio: Decimal,
}

impl ScoreCalculator {
    pub fn new(weights: ScoringWeights, headroom_ratio: Decimal) -> Self {
        Self { weights, headroom_ratio }
    }

    /// Total score for a candidate, or `None` when it must be dropped.
    pub fn score(
        &self,
        class: ProductClass,
        product: &Product,
        query: &ParsedQuery,
        coverage: &PartTagCoverage<'_>,
    ) -> Option<u32> {
        let base = match class {
            ProductClass::Part => self.part_score(product, query, coverage)?,
            ProductClass::Vehicle => self.vehicle_score(product, query),
        };
        let total = base + self.budget_headroom_bonus(product, query);

        (total > 0).then_some(total)
    }

    /// Part branch. Returns `None` when specific part types were requested and
    /// the product matches none of them.
    pub fn part_score(
        &self,
        product: &Product,
        query: &ParsedQuery,
        coverage: &PartTagCoverage<'_>,
    ) -> Option<u32> {
        let name = product.normalized_name();
        let mut score = 0;
        let mut requested = 0;
        let mut matched = 0;

        for tag in query.part_tags() {
            requested += 1;
            if product.has_tag(tag) {
                score += self.weights.part_tag_match;
                matched += 1;
            } else if !coverage.is_tagged(tag) && tags::contains_any(&name, tags::part_name_hints(tag))
            {
                score += self.weights.part_name_hint;
                matched += 1;
            }
        }

        if requested > 0 && matched == 0 {
            return None;
        }
        if requested == 0 {
            score += self.weights.part_browse_base;
        }

        if brand_matches(product, query) {
            score += self.weights.part_brand_field;
        }
        if brand_in_name(&name, query) {
            score += self.weights.part_brand_in_name;
        }
        if model_in_name(&name, query) {
            score += self.weights.part_model_in_name;
        }

        Some(score)
    }

    /// Vehicle branch.
    pub fn vehicle_score(&self, product: &Product, query: &ParsedQuery) -> u32 {
        let name = product.normalized_name();
        let mut score = 0;

        if brand_matches(product, query) {
            score += self.weights.vehicle_brand;
        }
        if model_in_name(&name, query) {
            score += self.weights.vehicle_model_in_name;
        }

        let shared_tags =
            query.preferred_tags.iter().filter(|tag| product.has_tag(tag.as_str())).count() as u32;
        score += shared_tags * self.weights.vehicle_tag;

        score
    }

    /// Small reward for leaving room under the stated budget maximum.
    pub fn budget_headroom_bonus(&self, product: &Product, query: &ParsedQuery) -> u32 {
        match query.budget_max {
            Some(max) if product.price <= max * self.headroom_ratio => self.weights.budget_headroom,
            _ => 0,
        }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), Decimal::new(super::DEFAULT_HEADROOM_PERCENT.into(), 2))
    }
}

/// Product brand (canonicalised) is among the preferred brands.
pub(crate) fn brand_matches(product: &Product, query: &ParsedQuery) -> bool {
    let brand = product.brand_name();
    !brand.trim().is_empty() && query.preferred_brands.contains(&tags::brand_token(brand))
}

fn brand_in_name(normalized_name: &str, query: &ParsedQuery) -> bool {
    query.preferred_brands.iter().any(|brand| {
        tags::brand_spellings(brand).into_iter().any(|spelling| normalized_name.contains(spelling))
    })
}

pub(crate) fn model_in_name(normalized_name: &str, query: &ParsedQuery) -> bool {
    query.model_names().iter().any(|model| normalized_name.contains(model.as_str()))
}
