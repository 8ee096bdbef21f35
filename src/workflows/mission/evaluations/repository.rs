use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{Mission, MissionId, MissionStatus};
use super::super::scorecard::ScorecardCriterion;
use super::domain::{
    CandidateId, CandidateProfile, EvaluationId, EvaluationStatus, ReviewerEvaluation,
    ReviewerProfile,
};

/// Directory record for one mission: brief, generated scorecard, and the
/// people attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRecord {
    pub mission: Mission,
    pub status: MissionStatus,
    pub scorecard: Vec<ScorecardCriterion>,
    pub candidates: Vec<CandidateProfile>,
    pub reviewers: Vec<ReviewerProfile>,
}

impl MissionRecord {
    pub fn candidate(&self, id: &CandidateId) -> Option<&CandidateProfile> {
        self.candidates
            .iter()
            .find(|candidate| candidate.candidate_id == *id)
    }

    pub fn reviewer_by_email(&self, email: &str) -> Option<&ReviewerProfile> {
        self.reviewers
            .iter()
            .find(|reviewer| reviewer.email.eq_ignore_ascii_case(email))
    }

    /// Every weight zero (or an empty scorecard) means the brief matched no
    /// catalog rule worth surfacing; callers warn rather than fail.
    pub fn scorecard_is_degenerate(&self) -> bool {
        self.scorecard
            .iter()
            .all(|criterion| criterion.weight_percentage == 0)
    }

    pub fn overview(&self) -> MissionOverview {
        MissionOverview {
            mission_id: self.mission.mission_id.clone(),
            title: self.mission.title.clone(),
            company: self.mission.client.company.clone(),
            status: self.status.label(),
            criteria_count: self.scorecard.len(),
            candidate_count: self.candidates.len(),
            reviewer_count: self.reviewers.len(),
            degenerate_scorecard: self.scorecard_is_degenerate(),
        }
    }

    pub fn detail(&self) -> MissionDetailView {
        MissionDetailView {
            mission_id: self.mission.mission_id.clone(),
            title: self.mission.title.clone(),
            company: self.mission.client.company.clone(),
            status: self.status.label(),
            scorecard: self.scorecard.clone(),
            candidates: self.candidates.clone(),
            reviewers: self.reviewers.clone(),
            degenerate_scorecard: self.scorecard_is_degenerate(),
        }
    }
}

/// Storage abstraction for missions so the service can be exercised in
/// isolation.
pub trait MissionDirectory: Send + Sync {
    fn insert(&self, record: MissionRecord) -> Result<MissionRecord, RepositoryError>;
    fn update(&self, record: MissionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &MissionId) -> Result<Option<MissionRecord>, RepositoryError>;
}

/// Repository record wrapping a vetted reviewer evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub mission_id: MissionId,
    pub evaluation: ReviewerEvaluation,
    pub status: EvaluationStatus,
}

impl EvaluationRecord {
    pub fn receipt(&self) -> EvaluationReceipt {
        EvaluationReceipt {
            evaluation_id: self.evaluation.evaluation_id.clone(),
            mission_id: self.mission_id.clone(),
            candidate_id: self.evaluation.candidate_id.clone(),
            reviewer_email: self.evaluation.reviewer_email.clone(),
            status: self.status.label(),
        }
    }
}

/// Storage abstraction for reviewer evaluations.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn for_candidate(
        &self,
        mission_id: &MissionId,
        candidate_id: &CandidateId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound report notification hooks (e.g., mail or chat
/// adapters).
pub trait ReportPublisher: Send + Sync {
    fn publish(&self, notice: ReportNotice) -> Result<(), PublishError>;
}

/// Notification payload emitted when a report is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNotice {
    pub template: String,
    pub mission_id: MissionId,
    pub candidate_id: CandidateId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("report channel unavailable: {0}")]
    Channel(String),
}

/// Sanitized mission headline exposed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct MissionOverview {
    pub mission_id: MissionId,
    pub title: String,
    pub company: String,
    pub status: &'static str,
    pub criteria_count: usize,
    pub candidate_count: usize,
    pub reviewer_count: usize,
    pub degenerate_scorecard: bool,
}

/// Full mission payload returned on open and fetch, scorecard included.
#[derive(Debug, Clone, Serialize)]
pub struct MissionDetailView {
    pub mission_id: MissionId,
    pub title: String,
    pub company: String,
    pub status: &'static str,
    pub scorecard: Vec<ScorecardCriterion>,
    pub candidates: Vec<CandidateProfile>,
    pub reviewers: Vec<ReviewerProfile>,
    pub degenerate_scorecard: bool,
}

/// Acknowledgement returned when an evaluation is accepted.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReceipt {
    pub evaluation_id: EvaluationId,
    pub mission_id: MissionId,
    pub candidate_id: CandidateId,
    pub reviewer_email: String,
    pub status: &'static str,
}
