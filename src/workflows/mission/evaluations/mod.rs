//! Candidate evaluation workflow: mission intake, reviewer panels, and the
//! merged final report.

pub mod domain;
pub(crate) mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateId, CandidateIntake, CandidateProfile, CandidateStatus, CriterionRating,
    EvaluationId, EvaluationStatus, EvaluationSubmission, ReviewerEvaluation, ReviewerProfile,
    ReviewerVerdict, StagedIntake,
};
pub use repository::{
    EvaluationReceipt, EvaluationRecord, EvaluationRepository, MissionDetailView,
    MissionDirectory, MissionOverview, MissionRecord, PublishError, ReportNotice,
    ReportPublisher, RepositoryError,
};
pub use router::mission_router;
pub use service::{EvaluationServiceError, MissionEvaluationService};
