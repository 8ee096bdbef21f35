mod export;
mod merge;
pub mod views;

pub use export::render_markdown;
pub use merge::{
    CriterionScore, Divergence, FinalReport, MergeEngine, ReviewConfig, ReviewerRating,
    VerdictTally,
};
