pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod query;
pub mod recommend;
pub mod tags;

pub use catalog::{Catalog, CatalogError};
pub use domain::product::{Product, ProductClass, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use query::{accumulate, build_insight_sentence, ParsedQuery, Purpose, INSIGHT_PREFIX};
pub use recommend::{
    build_reason, PartTagCoverage, Ranking, Recommender, RecommenderSettings, ScoreCalculator,
    ScoringWeights, Suggestion,
};
