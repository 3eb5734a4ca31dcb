//! Recommender implementation

use std::cmp::Reverse;

use tracing::debug;

use super::reason::build_reason;
use super::scoring::{brand_matches, PartTagCoverage, ScoreCalculator};
use super::types::*;
use crate::catalog::{within_budget, Catalog};
use crate::domain::product::{Product, ProductClass};
use crate::query::ParsedQuery;

/// Ranks catalog products against an accumulated query.
#[derive(Debug, Clone)]
pub struct Recommender {
    settings: RecommenderSettings,
    calculator: ScoreCalculator,
}

impl Recommender {
    pub fn new(settings: RecommenderSettings) -> Self {
        let calculator = ScoreCalculator::new(settings.weights, settings.headroom_ratio);
        Self { settings, calculator }
    }

    /// Product class the query is searching in.
    pub fn search_class(query: &ParsedQuery) -> ProductClass {
        if query.is_part_search() {
            ProductClass::Part
        } else {
            ProductClass::Vehicle
        }
    }

    /// Ranked suggestions, or fallback suggestions when nothing scores.
    ///
    /// Empty only when the catalog has no listed product of the searched class.
    pub fn get_suggestions(&self, query: &ParsedQuery, catalog: &Catalog) -> Vec<Suggestion> {
        let class = Self::search_class(query);
        let in_class =
            catalog.in_class(class, &self.settings.parts_category).collect::<Vec<&Product>>();
        let candidates = filter_budget(query, &in_class);
        let ranked = self.rank(class, query, &candidates, &in_class);

        if !ranked.is_empty() {
            debug!(
                event_name = "recommend.ranked",
                class = ?class,
                in_class = in_class.len(),
                candidates = candidates.len(),
                returned = ranked.len(),
                "ranked suggestions produced"
            );
            return ranked
                .into_iter()
                .map(|(product, score)| {
                    let ranking = Ranking::Matched { score };
                    let reason = build_reason(product, query, ranking, class);
                    Suggestion::from_product(product, ranking, reason)
                })
                .collect();
        }

        let fallback = self.fallback(query, &in_class);
        debug!(
            event_name = "recommend.fallback",
            class = ?class,
            in_class = in_class.len(),
            candidates = candidates.len(),
            returned = fallback.len(),
            "no candidate scored, using fallback suggestions"
        );
        fallback
            .into_iter()
            .map(|product| {
                let reason = build_reason(product, query, Ranking::Fallback, class);
                Suggestion::from_product(product, Ranking::Fallback, reason)
            })
            .collect()
    }

    /// Products that survive the hard class and budget filters, before scoring.
    pub fn candidates<'a>(&self, query: &ParsedQuery, catalog: &'a Catalog) -> Vec<&'a Product> {
        let class = Self::search_class(query);
        let in_class =
            catalog.in_class(class, &self.settings.parts_category).collect::<Vec<&Product>>();
        filter_budget(query, &in_class)
    }

    fn rank<'a>(
        &self,
        class: ProductClass,
        query: &ParsedQuery,
        candidates: &[&'a Product],
        in_class: &[&'a Product],
    ) -> Vec<(&'a Product, u32)> {
        let coverage = PartTagCoverage::from_products(in_class.iter().copied());

        let mut scored = candidates
            .iter()
            .filter_map(|product| {
                self.calculator.score(class, product, query, &coverage).map(|score| (*product, score))
            })
            .collect::<Vec<_>>();

        scored.sort_by(|(left, left_score), (right, right_score)| {
            right_score
                .cmp(left_score)
                .then_with(|| left.price.cmp(&right.price))
                .then_with(|| left.id.cmp(&right.id))
        });
        scored.truncate(self.settings.max_results);
        scored
    }

    fn fallback<'a>(&self, query: &ParsedQuery, in_class: &[&'a Product]) -> Vec<&'a Product> {
        let limit = self.settings.fallback_limit;

        if !query.preferred_brands.is_empty() {
            let mut branded = in_class
                .iter()
                .copied()
                .filter(|product| brand_matches(product, query))
                .collect::<Vec<_>>();
            branded.sort_by_key(|product| (Reverse(product.stock), Reverse(product.id)));
            branded.truncate(limit);
            if !branded.is_empty() {
                return branded;
            }
        }

        let mut recent = in_class.to_vec();
        recent.sort_by_key(|product| Reverse(product.id));
        recent.truncate(limit);
        recent
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(RecommenderSettings::default())
    }
}

fn filter_budget<'a>(query: &ParsedQuery, products: &[&'a Product]) -> Vec<&'a Product> {
    products
        .iter()
        .copied()
        .filter(|product| within_budget(product, query.budget_min, query.budget_max))
        .collect()
}
