//! Product Recommender
//!
//! Filters a catalog snapshot by product class and budget, scores the remaining
//! candidates against an accumulated [`ParsedQuery`](crate::query::ParsedQuery),
//! and falls back to stock/recency ordering when nothing scores.

mod engine;
mod reason;
mod scoring;
mod types;

pub use engine::Recommender;
pub use reason::{build_reason, FALLBACK_REASON};
pub use scoring::{PartTagCoverage, ScoreCalculator, ScoringWeights};
pub use types::*;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    part_tag_match: 100,
    part_name_hint: 80,
    part_browse_base: 10,
    part_brand_field: 20,
    part_brand_in_name: 25,
    part_model_in_name: 30,
    vehicle_brand: 50,
    vehicle_model_in_name: 100,
    vehicle_tag: 5,
    budget_headroom: 2,
};

/// Maximum ranked suggestions to return
pub const DEFAULT_MAX_RESULTS: usize = 12;

/// Maximum fallback suggestions to return
pub const DEFAULT_FALLBACK_LIMIT: usize = 8;

/// Headroom bonus threshold as a percentage of the budget maximum
pub const DEFAULT_HEADROOM_PERCENT: u32 = 90;

/// Category name for parts and accessories
pub const DEFAULT_PARTS_CATEGORY: &str = "Phụ tùng";
