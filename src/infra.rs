//! In-memory adapters backing the default server wiring, the CLI demo, and
//! integration tests. Swap these for real storage by implementing the
//! repository traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::mission::domain::MissionId;
use crate::workflows::mission::evaluations::{
    CandidateId, EvaluationId, EvaluationRecord, EvaluationRepository, MissionDirectory,
    MissionRecord, PublishError, ReportNotice, ReportPublisher, RepositoryError,
};
use crate::workflows::mission::report::ReviewConfig;

#[derive(Default, Clone)]
pub struct InMemoryMissionDirectory {
    records: Arc<Mutex<HashMap<MissionId, MissionRecord>>>,
}

impl MissionDirectory for InMemoryMissionDirectory {
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
        if guard.contains_key(&record.mission.mission_id) {
            guard.insert(record.mission.mission_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &MissionId) -> Result<Option<MissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, EvaluationRecord>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
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
        if guard.contains_key(&record.evaluation.evaluation_id) {
            guard.insert(record.evaluation.evaluation_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
        let mut records: Vec<EvaluationRecord> = guard
            .values()
            .filter(|record| {
                record.mission_id == *mission_id && record.evaluation.candidate_id == *candidate_id
            })
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; keep merges stable.
        records.sort_by(|a, b| {
            a.evaluation
                .evaluation_id
                .0
                .cmp(&b.evaluation.evaluation_id.0)
        });
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryReportPublisher {
    events: Arc<Mutex<Vec<ReportNotice>>>,
}

impl ReportPublisher for InMemoryReportPublisher {
    fn publish(&self, notice: ReportNotice) -> Result<(), PublishError> {
        let mut guard = self.events.lock().expect("notice mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryReportPublisher {
    pub fn events(&self) -> Vec<ReportNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

pub fn default_review_config() -> ReviewConfig {
    ReviewConfig {
        rating_scale_max: 5,
        recommend_threshold: 3.5,
        reserve_threshold: 2.5,
        divergence_alert: 2,
        validation_quorum: 2,
    }
}
