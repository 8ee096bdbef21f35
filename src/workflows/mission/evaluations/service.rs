use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::super::catalog::ScorecardCatalog;
use super::super::domain::{Mission, MissionBrief, MissionError, MissionId, MissionStatus};
use super::super::report::{FinalReport, MergeEngine, ReviewConfig};
use super::super::scorecard::suggest_criteria;
use super::domain::{
    CandidateId, CandidateIntake, CandidateProfile, CandidateStatus, EvaluationId,
    EvaluationStatus, EvaluationSubmission, ReviewerEvaluation, ReviewerProfile, StagedIntake,
};
use super::intake::{IntakeGuard, IntakeViolation};
use super::repository::{
    EvaluationRecord, EvaluationRepository, MissionDirectory, MissionRecord, PublishError,
    ReportNotice, ReportPublisher, RepositoryError,
};

/// Service composing the intake guard, scorecard catalog, repositories, and
/// the merge engine.
pub struct MissionEvaluationService<M, E, P> {
    guard: Arc<IntakeGuard>,
    catalog: Arc<ScorecardCatalog>,
    directory: Arc<M>,
    evaluations: Arc<E>,
    reports: Arc<P>,
    engine: Arc<MergeEngine>,
}

static MISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_mission_id() -> MissionId {
    let id = MISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MissionId(format!("mis-{id:06}"))
}

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

impl<M, E, P> MissionEvaluationService<M, E, P>
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    pub fn new(directory: Arc<M>, evaluations: Arc<E>, reports: Arc<P>, config: ReviewConfig) -> Self {
        let guard = Arc::new(IntakeGuard::from_config(&config));
        let engine = Arc::new(MergeEngine::new(config));

        Self {
            guard,
            catalog: Arc::new(ScorecardCatalog::standard()),
            directory,
            evaluations,
            reports,
            engine,
        }
    }

    pub fn review_config(&self) -> &ReviewConfig {
        self.engine.config()
    }

    /// Open a mission: vet the brief, generate its scorecard, and persist
    /// the directory record.
    pub fn open_mission(
        &self,
        brief: MissionBrief,
    ) -> Result<MissionRecord, EvaluationServiceError> {
        self.guard.vet_brief(&brief)?;

        let scorecard = suggest_criteria(&self.catalog, &brief.ratios);
        let mission = Mission {
            mission_id: next_mission_id(),
            title: brief.title,
            client: brief.client,
            ratios: brief.ratios,
        };

        let record = MissionRecord {
            mission,
            status: MissionStatus::Open,
            scorecard,
            candidates: Vec::new(),
            reviewers: Vec::new(),
        };

        let stored = self.directory.insert(record)?;
        Ok(stored)
    }

    /// Fetch a mission record for API responses.
    pub fn mission(&self, mission_id: &MissionId) -> Result<MissionRecord, EvaluationServiceError> {
        let record = self
            .directory
            .fetch(mission_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Attach a vetted candidate to a mission. Candidates are keyed by
    /// email within a mission.
    pub fn register_candidate(
        &self,
        mission_id: &MissionId,
        intake: CandidateIntake,
    ) -> Result<CandidateProfile, EvaluationServiceError> {
        let mut record = self.mission(mission_id)?;
        let mut profile = self.guard.profile_from_intake(intake)?;

        if record
            .candidates
            .iter()
            .any(|candidate| candidate.email == profile.email)
        {
            return Err(RepositoryError::Conflict.into());
        }

        profile.candidate_id = next_candidate_id();
        record.candidates.push(profile.clone());
        self.directory.update(record)?;

        Ok(profile)
    }

    /// Bulk-attach candidates from an imported roster. Rows whose email is
    /// already on the mission are skipped, so re-importing the same roster
    /// is idempotent.
    pub fn register_candidates(
        &self,
        mission_id: &MissionId,
        intakes: Vec<StagedIntake>,
    ) -> Result<Vec<CandidateProfile>, EvaluationServiceError> {
        let mut record = self.mission(mission_id)?;
        let mut registered = Vec::new();

        for staged in intakes {
            let mut profile = self.guard.profile_from_intake(staged.intake)?;
            if record
                .candidates
                .iter()
                .any(|candidate| candidate.email == profile.email)
            {
                continue;
            }

            profile.candidate_id = next_candidate_id();
            profile.status = staged.stage;
            record.candidates.push(profile.clone());
            registered.push(profile);
        }

        self.directory.update(record)?;
        Ok(registered)
    }

    /// Add a reviewer to the mission panel.
    pub fn assign_reviewer(
        &self,
        mission_id: &MissionId,
        reviewer: ReviewerProfile,
    ) -> Result<ReviewerProfile, EvaluationServiceError> {
        let mut record = self.mission(mission_id)?;
        let reviewer = self.guard.vet_reviewer(reviewer)?;

        if record.reviewer_by_email(&reviewer.email).is_some() {
            return Err(RepositoryError::Conflict.into());
        }

        record.reviewers.push(reviewer.clone());
        self.directory.update(record)?;

        Ok(reviewer)
    }

    /// Accept one reviewer's evaluation of a candidate. Each reviewer
    /// submits at most once per candidate.
    pub fn submit_evaluation(
        &self,
        mission_id: &MissionId,
        submission: EvaluationSubmission,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let mut record = self.mission(mission_id)?;

        if record.candidate(&submission.candidate_id).is_none() {
            return Err(MissionError::CandidateNotFound(submission.candidate_id.0.clone()).into());
        }
        if record.reviewer_by_email(&submission.reviewer_email).is_none() {
            return Err(MissionError::ReviewerNotFound(submission.reviewer_email.clone()).into());
        }

        let mut evaluation = self
            .guard
            .evaluation_from_submission(&record.scorecard, submission)?;

        let existing = self
            .evaluations
            .for_candidate(mission_id, &evaluation.candidate_id)?;
        if existing
            .iter()
            .any(|prior| prior.evaluation.reviewer_email == evaluation.reviewer_email)
        {
            return Err(RepositoryError::Conflict.into());
        }

        evaluation.evaluation_id = next_evaluation_id();
        let stored = self.evaluations.insert(EvaluationRecord {
            mission_id: mission_id.clone(),
            evaluation,
            status: EvaluationStatus::Submitted,
        })?;

        if record.status == MissionStatus::Open {
            record.status = MissionStatus::InReview;
        }
        if let Some(candidate) = record
            .candidates
            .iter_mut()
            .find(|candidate| candidate.candidate_id == stored.evaluation.candidate_id)
        {
            if matches!(
                candidate.status,
                CandidateStatus::Applied | CandidateStatus::Shortlisted
            ) {
                candidate.status = CandidateStatus::InEvaluation;
            }
        }
        self.directory.update(record)?;

        Ok(stored)
    }

    /// Merge the panel's evaluations into a final report once the quorum is
    /// reached. Read-only: repeated calls merge the same inputs again.
    pub fn candidate_report(
        &self,
        mission_id: &MissionId,
        candidate_id: &CandidateId,
    ) -> Result<FinalReport, EvaluationServiceError> {
        let record = self.mission(mission_id)?;
        let candidate = record
            .candidate(candidate_id)
            .ok_or_else(|| MissionError::CandidateNotFound(candidate_id.0.clone()))?;

        let stored = self.evaluations.for_candidate(mission_id, candidate_id)?;
        let required = self.engine.config().validation_quorum;
        if stored.len() < required {
            return Err(EvaluationServiceError::QuorumNotMet {
                required,
                received: stored.len(),
            });
        }

        let evaluations: Vec<ReviewerEvaluation> = stored
            .into_iter()
            .map(|record| record.evaluation)
            .collect();

        Ok(self
            .engine
            .merge(&record.mission, &record.scorecard, candidate, &evaluations))
    }

    /// Validate the merged report: freeze the panel's evaluations, advance
    /// the candidate and mission, and notify the client contact.
    pub fn validate_report(
        &self,
        mission_id: &MissionId,
        candidate_id: &CandidateId,
    ) -> Result<FinalReport, EvaluationServiceError> {
        let report = self.candidate_report(mission_id, candidate_id)?;

        for mut stored in self.evaluations.for_candidate(mission_id, candidate_id)? {
            stored.status = EvaluationStatus::Merged;
            self.evaluations.update(stored)?;
        }

        let mut record = self.mission(mission_id)?;
        if let Some(candidate) = record
            .candidates
            .iter_mut()
            .find(|candidate| candidate.candidate_id == *candidate_id)
        {
            candidate.status = CandidateStatus::Evaluated;
        }
        record.status = MissionStatus::Validated;
        self.directory.update(record)?;

        let mut details = BTreeMap::new();
        details.insert(
            "recommendation".to_string(),
            report.recommendation.label().to_string(),
        );
        details.insert(
            "overall_score".to_string(),
            format!("{:.2}", report.overall_score),
        );
        self.reports.publish(ReportNotice {
            template: "report_validated".to_string(),
            mission_id: mission_id.clone(),
            candidate_id: candidate_id.clone(),
            details,
        })?;

        Ok(report)
    }
}

/// Error raised by the mission evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error("report needs {required} evaluations, received {received}")]
    QuorumNotMet { required: usize, received: usize },
}
