//! Lead scoring engine.
//!
//! Pure functions: the same signal and config always produce the same
//! lead, sub-scores, hook, and offer.

pub mod authority;
pub mod engine;
pub mod industry;
pub mod pain;
pub mod templates;

pub use authority::score_authority;
pub use engine::{budget_score, score};
pub use industry::detect_industry;
pub use pain::score_pain;
