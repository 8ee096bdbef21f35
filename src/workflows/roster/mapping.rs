use super::normalizer::normalize_label;
use crate::workflows::mission::evaluations::CandidateStatus;
use std::collections::HashMap;
use std::sync::OnceLock;

static STAGE_STATUS_MAP: OnceLock<HashMap<String, CandidateStatus>> = OnceLock::new();

pub(crate) fn status_for_normalized(normalized_stage: &str) -> Option<CandidateStatus> {
    stage_status_map().get(normalized_stage).copied()
}

fn stage_status_map() -> &'static HashMap<String, CandidateStatus> {
    STAGE_STATUS_MAP.get_or_init(|| {
        const STAGE_TO_STATUS: &[(&str, CandidateStatus)] = &[
            // Application received
            ("Applied", CandidateStatus::Applied),
            ("New", CandidateStatus::Applied),
            ("New Applicant", CandidateStatus::Applied),
            ("Application Review", CandidateStatus::Applied),
            ("Sourced", CandidateStatus::Applied),
            ("Candidature", CandidateStatus::Applied),
            ("Candidature re\u{e7}ue", CandidateStatus::Applied),
            // Shortlist
            ("Shortlisted", CandidateStatus::Shortlisted),
            ("Shortlist", CandidateStatus::Shortlisted),
            ("Screening", CandidateStatus::Shortlisted),
            ("Phone Screen", CandidateStatus::Shortlisted),
            ("Pr\u{e9}s\u{e9}lection", CandidateStatus::Shortlisted),
            ("Pr\u{e9}qualification", CandidateStatus::Shortlisted),
            // Evaluation in progress
            ("In Evaluation", CandidateStatus::InEvaluation),
            ("Evaluation", CandidateStatus::InEvaluation),
            ("Interview", CandidateStatus::InEvaluation),
            ("Technical Interview", CandidateStatus::InEvaluation),
            ("Technical Test", CandidateStatus::InEvaluation),
            ("Entretien technique", CandidateStatus::InEvaluation),
            ("Test technique", CandidateStatus::InEvaluation),
            // Evaluation complete
            ("Evaluated", CandidateStatus::Evaluated),
            ("Debrief", CandidateStatus::Evaluated),
            ("D\u{e9}briefing", CandidateStatus::Evaluated),
            ("Offer", CandidateStatus::Evaluated),
            ("Hired", CandidateStatus::Evaluated),
            // Out of process
            ("Withdrawn", CandidateStatus::Withdrawn),
            ("Declined", CandidateStatus::Withdrawn),
            ("Rejected", CandidateStatus::Withdrawn),
            ("D\u{e9}sistement", CandidateStatus::Withdrawn),
            ("Abandon", CandidateStatus::Withdrawn),
        ];

        let mut map = HashMap::with_capacity(STAGE_TO_STATUS.len());
        for (stage, status) in STAGE_TO_STATUS {
            map.insert(normalize_label(stage), *status);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(stage: &str) -> Option<CandidateStatus> {
    let normalized = normalize_label(stage);
    status_for_normalized(&normalized)
}
