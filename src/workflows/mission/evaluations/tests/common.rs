use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::mission::domain::{
    ClientContact, DomainRatio, MissionBrief, MissionId, SkillLevel,
};
use crate::workflows::mission::evaluations::domain::{
    CandidateId, CandidateIntake, CandidateProfile, CriterionRating, EvaluationId,
    EvaluationSubmission, ReviewerProfile, ReviewerVerdict,
};
use crate::workflows::mission::evaluations::intake::IntakeGuard;
use crate::workflows::mission::evaluations::repository::{
    EvaluationRecord, EvaluationRepository, MissionDirectory, MissionRecord, PublishError,
    ReportNotice, ReportPublisher, RepositoryError,
};
use crate::workflows::mission::evaluations::{mission_router, MissionEvaluationService};
use crate::workflows::mission::report::ReviewConfig;
use crate::workflows::mission::ScorecardCriterion;

pub(super) fn review_config() -> ReviewConfig {
    ReviewConfig {
        rating_scale_max: 5,
        recommend_threshold: 3.5,
        reserve_threshold: 2.5,
        divergence_alert: 2,
        validation_quorum: 2,
    }
}

pub(super) fn ratio(domain: &str, percentage: f32, level: SkillLevel) -> DomainRatio {
    DomainRatio {
        domain_name: domain.to_string(),
        percentage,
        level,
        expertise_ratios: Vec::new(),
    }
}

pub(super) fn client() -> ClientContact {
    ClientContact {
        company: "Nimbus Labs".to_string(),
        contact_name: "Claire Fontaine".to_string(),
        email: "claire@nimbuslabs.test".to_string(),
    }
}

pub(super) fn brief() -> MissionBrief {
    MissionBrief {
        title: "Fullstack Senior".to_string(),
        client: client(),
        ratios: vec![
            ratio("Frontend", 60.0, SkillLevel::Senior),
            ratio("Backend", 40.0, SkillLevel::Senior),
        ],
    }
}

pub(super) fn unbalanced_brief() -> MissionBrief {
    MissionBrief {
        title: "Fullstack Senior".to_string(),
        client: client(),
        ratios: vec![ratio("Frontend", 60.0, SkillLevel::Senior)],
    }
}

pub(super) fn candidate_intake() -> CandidateIntake {
    CandidateIntake {
        full_name: "Jules Brun".to_string(),
        email: "jules.brun@example.test".to_string(),
        headline: Some("React, 7 years".to_string()),
        applied_on: NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date"),
        source: Some("LinkedIn".to_string()),
    }
}

pub(super) fn reviewer(email: &str) -> ReviewerProfile {
    ReviewerProfile {
        full_name: "Panel Reviewer".to_string(),
        email: email.to_string(),
    }
}

/// Rate every scorecard criterion with the same score.
pub(super) fn flat_submission(
    scorecard: &[ScorecardCriterion],
    candidate_id: &CandidateId,
    reviewer_email: &str,
    score: u8,
    verdict: ReviewerVerdict,
) -> EvaluationSubmission {
    EvaluationSubmission {
        candidate_id: candidate_id.clone(),
        reviewer_email: reviewer_email.to_string(),
        ratings: scorecard
            .iter()
            .map(|criterion| CriterionRating {
                criterion_id: criterion.id.clone(),
                score,
                comment: None,
            })
            .collect(),
        verdict,
        summary_note: None,
    }
}

pub(super) type MemoryService =
    MissionEvaluationService<MemoryDirectory, MemoryEvaluations, MemoryReports>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryDirectory>,
    Arc<MemoryEvaluations>,
    Arc<MemoryReports>,
) {
    let directory = Arc::new(MemoryDirectory::default());
    let evaluations = Arc::new(MemoryEvaluations::default());
    let reports = Arc::new(MemoryReports::default());
    let service = MissionEvaluationService::new(
        directory.clone(),
        evaluations.clone(),
        reports.clone(),
        review_config(),
    );
    (service, directory, evaluations, reports)
}

/// Open a mission and staff it with one candidate and two reviewers.
pub(super) fn staffed_mission(
    service: &MemoryService,
) -> (MissionRecord, CandidateProfile, [ReviewerProfile; 2]) {
    let record = service.open_mission(brief()).expect("mission opens");
    let mission_id = record.mission.mission_id.clone();

    let candidate = service
        .register_candidate(&mission_id, candidate_intake())
        .expect("candidate registers");
    let first = service
        .assign_reviewer(&mission_id, reviewer("ana@panel.test"))
        .expect("first reviewer joins");
    let second = service
        .assign_reviewer(&mission_id, reviewer("bob@panel.test"))
        .expect("second reviewer joins");

    let record = service.mission(&mission_id).expect("mission exists");
    (record, candidate, [first, second])
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    pub(super) records: Arc<Mutex<HashMap<MissionId, MissionRecord>>>,
}

impl MissionDirectory for MemoryDirectory {
    fn insert(&self, record: MissionRecord) -> Result<MissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("directory mutex poisoned");
        if guard.contains_key(&record.mission.mission_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.mission.mission_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: MissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("directory mutex poisoned");
        guard.insert(record.mission.mission_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &MissionId) -> Result<Option<MissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvaluations {
    records: Arc<Mutex<HashMap<EvaluationId, EvaluationRecord>>>,
}

impl EvaluationRepository for MemoryEvaluations {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("evaluation mutex poisoned");
        if guard.contains_key(&record.evaluation.evaluation_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.evaluation.evaluation_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("evaluation mutex poisoned");
        guard.insert(record.evaluation.evaluation_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("evaluation mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_candidate(
        &self,
        mission_id: &MissionId,
        candidate_id: &CandidateId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("evaluation mutex poisoned");
        let mut matches: Vec<EvaluationRecord> = guard
            .values()
            .filter(|record| {
                record.mission_id == *mission_id
                    && record.evaluation.candidate_id == *candidate_id
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.evaluation.evaluation_id.0.cmp(&b.evaluation.evaluation_id.0));
        Ok(matches)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryReports {
    events: Arc<Mutex<Vec<ReportNotice>>>,
}

impl MemoryReports {
    pub(super) fn events(&self) -> Vec<ReportNotice> {
        self.events.lock().expect("report mutex poisoned").clone()
    }
}

impl ReportPublisher for MemoryReports {
    fn publish(&self, notice: ReportNotice) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("report mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableDirectory;

impl MissionDirectory for UnavailableDirectory {
    fn insert(&self, _record: MissionRecord) -> Result<MissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }

    fn update(&self, _record: MissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }

    fn fetch(&self, _id: &MissionId) -> Result<Option<MissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn intake_guard() -> IntakeGuard {
    IntakeGuard::from_config(&review_config())
}

pub(super) fn mission_router_with_service(service: MemoryService) -> axum::Router {
    mission_router(Arc::new(service))
}
