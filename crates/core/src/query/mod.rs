//! Structured shopper intent and its accumulation across conversation turns.

mod insight;

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tags;

pub use insight::{build_insight_sentence, INSIGHT_PREFIX};

/// Half-width of the band around a single stated budget, in millions of VND
pub const DEFAULT_BUDGET_BAND_MILLIONS: u32 = 5;

/// Prior user messages folded into the current query
pub const DEFAULT_HISTORY_WINDOW: usize = 3;

/// What the shopper intends to use the vehicle for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    City,
    Delivery,
    Touring,
}

impl Purpose {
    pub fn usage_tag(&self) -> &'static str {
        match self {
            Purpose::City => tags::USAGE_CITY,
            Purpose::Delivery => tags::USAGE_DELIVERY,
            Purpose::Touring => tags::USAGE_TOURING,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Purpose::City => "đi lại trong phố",
            Purpose::Delivery => "chạy giao hàng",
            Purpose::Touring => "đi phượt đường dài",
        }
    }
}

/// Intent extracted from one message, or accumulated over several.
///
/// Every field starts absent. Presence is tracked with `Option` so an explicit
/// zero is never confused with "not mentioned".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub height_cm: Option<u16>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub purpose: Option<Purpose>,
    pub is_beginner: Option<bool>,
    #[serde(default)]
    pub preferred_tags: BTreeSet<String>,
    #[serde(default)]
    pub preferred_brands: BTreeSet<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.height_cm.is_none()
            && self.budget_min.is_none()
            && self.budget_max.is_none()
            && self.purpose.is_none()
            && self.is_beginner.is_none()
            && self.preferred_tags.is_empty()
            && self.preferred_brands.is_empty()
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.preferred_tags.insert(tag.into());
    }

    pub fn add_brand(&mut self, brand: impl AsRef<str>) {
        self.preferred_brands.insert(tags::brand_token(brand.as_ref()));
    }

    pub fn has_budget(&self) -> bool {
        self.budget_min.is_some() || self.budget_max.is_some()
    }

    /// True when the shopper is looking for parts/accessories rather than a vehicle.
    pub fn is_part_search(&self) -> bool {
        self.preferred_tags.iter().any(|tag| tags::is_part_tag(tag) || tag == tags::PART_SEARCH)
    }

    /// Specific part types requested (`part-*` tags).
    pub fn part_tags(&self) -> impl Iterator<Item = &str> {
        self.preferred_tags.iter().map(String::as_str).filter(|tag| tags::is_part_tag(tag))
    }

    pub fn model_tags(&self) -> impl Iterator<Item = &str> {
        self.preferred_tags.iter().map(String::as_str).filter(|tag| tags::is_model_tag(tag))
    }

    /// Display names of every requested model, e.g. `air blade`.
    pub fn model_names(&self) -> Vec<String> {
        self.model_tags().filter_map(tags::model_name).collect()
    }

    /// Returns a new query where `incoming` takes precedence for every field it
    /// carries. Absent incoming fields leave `self` untouched; tag and brand sets
    /// are unioned.
    pub fn merged(&self, incoming: &ParsedQuery) -> ParsedQuery {
        let mut preferred_tags = self.preferred_tags.clone();
        preferred_tags.extend(incoming.preferred_tags.iter().cloned());
        let mut preferred_brands = self.preferred_brands.clone();
        preferred_brands.extend(incoming.preferred_brands.iter().cloned());

        ParsedQuery {
            height_cm: incoming.height_cm.or(self.height_cm),
            budget_min: incoming.budget_min.or(self.budget_min),
            budget_max: incoming.budget_max.or(self.budget_max),
            purpose: incoming.purpose.or(self.purpose),
            is_beginner: incoming.is_beginner.or(self.is_beginner),
            preferred_tags,
            preferred_brands,
        }
    }
}

/// Folds queries in chronological order (oldest first).
pub fn accumulate<'a, I>(queries: I) -> ParsedQuery
where
    I: IntoIterator<Item = &'a ParsedQuery>,
{
    queries.into_iter().fold(ParsedQuery::default(), |acc, query| acc.merged(query))
}
