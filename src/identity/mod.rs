mod cache;
pub mod normalization;
mod resolver;
pub mod scoring;

pub use cache::NormalizationCache;
pub use normalization::{NormalizationRules, NormalizedName};
pub use resolver::{IdentityResolver, MatchMethod, Resolution};
pub use scoring::TokenScorer;
