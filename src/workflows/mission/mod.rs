pub mod evaluations;

mod catalog;
pub mod domain;
pub mod report;
mod scorecard;

pub use catalog::{CriterionTemplate, ScorecardCatalog, SuggestionRule};
pub use scorecard::{suggest_criteria, CriterionId, ScorecardCriterion};
