use std::collections::HashSet;

use super::super::domain::MissionBrief;
use super::super::report::ReviewConfig;
use super::super::scorecard::ScorecardCriterion;
use super::domain::{
    CandidateId, CandidateIntake, CandidateProfile, CandidateStatus, EvaluationId,
    EvaluationSubmission, ReviewerEvaluation, ReviewerProfile,
};

/// Validation errors raised by the intake guard.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("candidate name is required")]
    MissingName,
    #[error("email address {found:?} is not deliverable")]
    InvalidEmail { found: String },
    #[error("mission declares no domain ratios")]
    EmptyRatios,
    #[error("domain {domain:?} carries an invalid percentage ({found})")]
    InvalidPercentage { domain: String, found: f32 },
    #[error("domain ratios must sum to 100, found {found}")]
    RatioSumMismatch { found: f32 },
    #[error("mission scorecard has no criteria to rate")]
    EmptyScorecard,
    #[error("rating {found} for criterion {criterion:?} is outside the 1..={max} scale")]
    RatingOutOfScale { criterion: String, found: u8, max: u8 },
    #[error("rating references unknown criterion {criterion:?}")]
    UnknownCriterion { criterion: String },
    #[error("criterion {criterion:?} is rated more than once")]
    DuplicateRating { criterion: String },
    #[error("submission leaves {missing} scorecard criteria unrated")]
    IncompleteRatings { missing: usize },
}

const DEFAULT_RATING_SCALE_MAX: u8 = 5;
const DEFAULT_RATIO_SUM_TOLERANCE: f32 = 0.5;

/// Policy dial backing intake validation.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    rating_scale_max: u8,
    ratio_sum_tolerance: f32,
}

impl IntakePolicy {
    pub fn new(rating_scale_max: u8, ratio_sum_tolerance: f32) -> Self {
        let rating_scale_max = if rating_scale_max == 0 {
            DEFAULT_RATING_SCALE_MAX
        } else {
            rating_scale_max
        };
        let ratio_sum_tolerance =
            if ratio_sum_tolerance.is_finite() && ratio_sum_tolerance >= 0.0 {
                ratio_sum_tolerance
            } else {
                DEFAULT_RATIO_SUM_TOLERANCE
            };

        Self {
            rating_scale_max,
            ratio_sum_tolerance,
        }
    }

    pub fn rating_scale_max(&self) -> u8 {
        self.rating_scale_max
    }

    pub fn ratio_sum_tolerance(&self) -> f32 {
        self.ratio_sum_tolerance
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RATING_SCALE_MAX, DEFAULT_RATIO_SUM_TOLERANCE)
    }
}

impl From<&ReviewConfig> for IntakePolicy {
    fn from(config: &ReviewConfig) -> Self {
        Self::new(config.rating_scale_max, DEFAULT_RATIO_SUM_TOLERANCE)
    }
}

/// Guard responsible for vetting briefs, candidates, and evaluations before
/// they reach the repositories.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self::with_policy(IntakePolicy::default())
    }
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::with_policy(IntakePolicy::from(config))
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Check that a mission brief carries a usable ratio breakdown. The
    /// scorecard generator itself tolerates anything; missions that would
    /// persist a skewed breakdown are rejected here instead.
    pub fn vet_brief(&self, brief: &MissionBrief) -> Result<(), IntakeViolation> {
        if brief.ratios.is_empty() {
            return Err(IntakeViolation::EmptyRatios);
        }

        let mut sum = 0.0f32;
        for ratio in &brief.ratios {
            if !ratio.percentage.is_finite() || ratio.percentage < 0.0 {
                return Err(IntakeViolation::InvalidPercentage {
                    domain: ratio.domain_name.clone(),
                    found: ratio.percentage,
                });
            }
            sum += ratio.percentage;
        }

        if (sum - 100.0).abs() > self.policy.ratio_sum_tolerance {
            return Err(IntakeViolation::RatioSumMismatch { found: sum });
        }

        Ok(())
    }

    /// Convert an inbound candidate snapshot into a vetted profile.
    pub fn profile_from_intake(
        &self,
        intake: CandidateIntake,
    ) -> Result<CandidateProfile, IntakeViolation> {
        let full_name = intake.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(IntakeViolation::MissingName);
        }

        let email = normalized_email(&intake.email)?;

        Ok(CandidateProfile {
            candidate_id: CandidateId("pending".to_string()),
            full_name,
            email,
            headline: intake.headline,
            applied_on: intake.applied_on,
            source: intake.source,
            status: CandidateStatus::Applied,
        })
    }

    /// Vet a reviewer before they join the panel, normalizing the email the
    /// panel is keyed on.
    pub fn vet_reviewer(
        &self,
        reviewer: ReviewerProfile,
    ) -> Result<ReviewerProfile, IntakeViolation> {
        let full_name = reviewer.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(IntakeViolation::MissingName);
        }

        let email = normalized_email(&reviewer.email)?;
        Ok(ReviewerProfile { full_name, email })
    }

    /// Validate a submission against the mission scorecard: the scorecard
    /// must carry criteria to rate, every criterion rated exactly once,
    /// every score on the configured scale.
    pub fn evaluation_from_submission(
        &self,
        scorecard: &[ScorecardCriterion],
        submission: EvaluationSubmission,
    ) -> Result<ReviewerEvaluation, IntakeViolation> {
        if scorecard.is_empty() {
            return Err(IntakeViolation::EmptyScorecard);
        }

        let reviewer_email = normalized_email(&submission.reviewer_email)?;

        let known: HashSet<&str> = scorecard
            .iter()
            .map(|criterion| criterion.id.0.as_str())
            .collect();
        let max = self.policy.rating_scale_max;

        let mut seen: HashSet<&str> = HashSet::new();
        for rating in &submission.ratings {
            let criterion = rating.criterion_id.0.as_str();
            if !known.contains(criterion) {
                return Err(IntakeViolation::UnknownCriterion {
                    criterion: criterion.to_string(),
                });
            }
            if !seen.insert(criterion) {
                return Err(IntakeViolation::DuplicateRating {
                    criterion: criterion.to_string(),
                });
            }
            if rating.score == 0 || rating.score > max {
                return Err(IntakeViolation::RatingOutOfScale {
                    criterion: criterion.to_string(),
                    found: rating.score,
                    max,
                });
            }
        }

        if seen.len() < known.len() {
            return Err(IntakeViolation::IncompleteRatings {
                missing: known.len() - seen.len(),
            });
        }

        Ok(ReviewerEvaluation {
            evaluation_id: EvaluationId("pending".to_string()),
            candidate_id: submission.candidate_id,
            reviewer_email,
            ratings: submission.ratings,
            verdict: submission.verdict,
            summary_note: submission.summary_note,
        })
    }
}

fn normalized_email(raw: &str) -> Result<String, IntakeViolation> {
    let email = raw.trim().to_ascii_lowercase();
    let deliverable = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);

    if !deliverable {
        return Err(IntakeViolation::InvalidEmail {
            found: raw.to_string(),
        });
    }

    Ok(email)
}
