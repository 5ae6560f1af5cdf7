// Core algorithm exports
pub mod matcher;
pub mod scoring;

pub use matcher::{Matcher, RankedMatches, DEFAULT_PREVIEW_LIMIT, DEFAULT_TOP_LIMIT};
pub use scoring::{budget_to_cost_index, compute_match, BUDGET_SCALE, MAX_CATEGORY_SCORE};
