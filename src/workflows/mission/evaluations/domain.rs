use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::scorecard::CriterionId;

/// Identifier wrapper for candidates attached to a mission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for submitted reviewer evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

/// Candidate-supplied snapshot collected before intake validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIntake {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    pub applied_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Intake paired with the pipeline stage an external roster reported for
/// the candidate. Direct API registrations always start at `Applied`;
/// imported rosters may land further along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedIntake {
    pub intake: CandidateIntake,
    pub stage: CandidateStatus,
}

/// The vetted candidate model persisted on the mission record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    pub applied_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub status: CandidateStatus,
}

/// High level status tracked for each candidate on a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Applied,
    Shortlisted,
    InEvaluation,
    Evaluated,
    Withdrawn,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Applied => "applied",
            CandidateStatus::Shortlisted => "shortlisted",
            CandidateStatus::InEvaluation => "in_evaluation",
            CandidateStatus::Evaluated => "evaluated",
            CandidateStatus::Withdrawn => "withdrawn",
        }
    }
}

/// Reviewer invited onto a mission's evaluation panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerProfile {
    pub full_name: String,
    pub email: String,
}

/// Reviewer's overall call, independent of per-criterion scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerVerdict {
    Favorable,
    Neutral,
    Unfavorable,
}

impl ReviewerVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewerVerdict::Favorable => "favorable",
            ReviewerVerdict::Neutral => "neutral",
            ReviewerVerdict::Unfavorable => "unfavorable",
        }
    }
}

/// Score a reviewer gives one scorecard criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRating {
    pub criterion_id: CriterionId,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Inbound evaluation payload, validated against the mission scorecard
/// before it becomes a `ReviewerEvaluation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    pub candidate_id: CandidateId,
    pub reviewer_email: String,
    pub ratings: Vec<CriterionRating>,
    pub verdict: ReviewerVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_note: Option<String>,
}

/// The vetted evaluation persisted per reviewer and candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerEvaluation {
    pub evaluation_id: EvaluationId,
    pub candidate_id: CandidateId,
    pub reviewer_email: String,
    pub ratings: Vec<CriterionRating>,
    pub verdict: ReviewerVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Submitted,
    Merged,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationStatus::Submitted => "submitted",
            EvaluationStatus::Merged => "merged",
        }
    }
}
