use super::super::domain::{CriterionGroup, Mission, MissionId};
use super::super::evaluations::domain::{
    CandidateId, CandidateProfile, ReviewerEvaluation, ReviewerVerdict,
};
use super::super::scorecard::{CriterionId, ScorecardCriterion};
use super::views::{
    CriterionScoreView, DivergenceView, Recommendation, ReportSummary, ReviewerAgreement,
    ReviewerRatingView, VerdictTallyView,
};

const DEFAULT_RATING_SCALE_MAX: u8 = 5;
const DEFAULT_RECOMMEND_THRESHOLD: f32 = 3.5;
const DEFAULT_RESERVE_THRESHOLD: f32 = 2.5;
const DEFAULT_DIVERGENCE_ALERT: u8 = 2;
const DEFAULT_VALIDATION_QUORUM: usize = 2;

/// Dials governing how reviewer evaluations are merged and judged.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub rating_scale_max: u8,
    pub recommend_threshold: f32,
    pub reserve_threshold: f32,
    pub divergence_alert: u8,
    pub validation_quorum: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            rating_scale_max: DEFAULT_RATING_SCALE_MAX,
            recommend_threshold: DEFAULT_RECOMMEND_THRESHOLD,
            reserve_threshold: DEFAULT_RESERVE_THRESHOLD,
            divergence_alert: DEFAULT_DIVERGENCE_ALERT,
            validation_quorum: DEFAULT_VALIDATION_QUORUM,
        }
    }
}

/// Stateless engine folding reviewer evaluations into one final report.
pub struct MergeEngine {
    config: ReviewConfig,
}

impl MergeEngine {
    pub fn new(config: ReviewConfig) -> Self {
        let config = sanitize_config(config);
        Self { config }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn merge(
        &self,
        mission: &Mission,
        scorecard: &[ScorecardCriterion],
        candidate: &CandidateProfile,
        evaluations: &[ReviewerEvaluation],
    ) -> FinalReport {
        let criterion_scores: Vec<CriterionScore> = scorecard
            .iter()
            .map(|criterion| score_criterion(criterion, evaluations))
            .collect();

        let overall_score = overall_score(&criterion_scores);

        let max_spread = criterion_scores
            .iter()
            .map(|score| score.spread)
            .max()
            .unwrap_or(0);
        let agreement = if max_spread >= self.config.divergence_alert {
            ReviewerAgreement::Divergent
        } else if max_spread <= 1 {
            ReviewerAgreement::Aligned
        } else {
            ReviewerAgreement::Mixed
        };

        let divergences = criterion_scores
            .iter()
            .filter(|score| score.spread >= self.config.divergence_alert)
            .map(|score| Divergence {
                criterion_id: score.criterion_id.clone(),
                label: score.label.clone(),
                low: score.low,
                high: score.high,
                spread: score.spread,
            })
            .collect();

        let verdicts = tally_verdicts(evaluations);

        let mut recommendation = if overall_score >= self.config.recommend_threshold {
            Recommendation::Recommended
        } else if overall_score < self.config.reserve_threshold {
            Recommendation::NotRecommended
        } else {
            Recommendation::FollowUp
        };

        // A majority of unfavorable verdicts holds an otherwise passing
        // score at follow-up until the panel talks it through.
        if recommendation == Recommendation::Recommended && verdicts.unfavorable > verdicts.favorable
        {
            recommendation = Recommendation::FollowUp;
        }

        FinalReport {
            mission_id: mission.mission_id.clone(),
            mission_title: mission.title.clone(),
            candidate_id: candidate.candidate_id.clone(),
            candidate_name: candidate.full_name.clone(),
            reviewer_count: evaluations.len(),
            rating_scale_max: self.config.rating_scale_max,
            criterion_scores,
            overall_score,
            agreement,
            divergences,
            verdicts,
            recommendation,
        }
    }
}

fn sanitize_config(config: ReviewConfig) -> ReviewConfig {
    let rating_scale_max = if config.rating_scale_max == 0 {
        DEFAULT_RATING_SCALE_MAX
    } else {
        config.rating_scale_max
    };

    let recommend_threshold = if config.recommend_threshold.is_finite() {
        config.recommend_threshold
    } else {
        DEFAULT_RECOMMEND_THRESHOLD
    };

    let reserve_threshold = if config.reserve_threshold.is_finite() {
        config.reserve_threshold.min(recommend_threshold)
    } else {
        DEFAULT_RESERVE_THRESHOLD.min(recommend_threshold)
    };

    let validation_quorum = config.validation_quorum.max(1);

    ReviewConfig {
        rating_scale_max,
        recommend_threshold,
        reserve_threshold,
        divergence_alert: config.divergence_alert.max(1),
        validation_quorum,
    }
}

fn score_criterion(
    criterion: &ScorecardCriterion,
    evaluations: &[ReviewerEvaluation],
) -> CriterionScore {
    let ratings: Vec<ReviewerRating> = evaluations
        .iter()
        .filter_map(|evaluation| {
            evaluation
                .ratings
                .iter()
                .find(|rating| rating.criterion_id == criterion.id)
                .map(|rating| ReviewerRating {
                    reviewer_email: evaluation.reviewer_email.clone(),
                    score: rating.score,
                    comment: rating.comment.clone(),
                })
        })
        .collect();

    let (low, high) = ratings.iter().fold((u8::MAX, 0u8), |(low, high), rating| {
        (low.min(rating.score), high.max(rating.score))
    });
    let (low, high) = if ratings.is_empty() { (0, 0) } else { (low, high) };

    let average = if ratings.is_empty() {
        0.0
    } else {
        let sum: u32 = ratings.iter().map(|rating| u32::from(rating.score)).sum();
        sum as f32 / ratings.len() as f32
    };

    CriterionScore {
        criterion_id: criterion.id.clone(),
        label: criterion.label.clone(),
        group: criterion.group,
        weight_percentage: criterion.weight_percentage,
        average,
        low,
        high,
        spread: high.saturating_sub(low),
        ratings,
    }
}

fn overall_score(criterion_scores: &[CriterionScore]) -> f32 {
    if criterion_scores.is_empty() {
        return 0.0;
    }

    let total_weight: u32 = criterion_scores
        .iter()
        .map(|score| u32::from(score.weight_percentage))
        .sum();

    // Degenerate scorecards (all weights zero) score zero, same as the empty
    // case above. No criterion carries weight, so no rating can count.
    if total_weight == 0 {
        return 0.0;
    }

    let weighted: f64 = criterion_scores
        .iter()
        .map(|score| f64::from(score.average) * f64::from(score.weight_percentage))
        .sum();
    (weighted / f64::from(total_weight)) as f32
}

fn tally_verdicts(evaluations: &[ReviewerEvaluation]) -> VerdictTally {
    let mut tally = VerdictTally {
        favorable: 0,
        neutral: 0,
        unfavorable: 0,
    };

    for evaluation in evaluations {
        match evaluation.verdict {
            ReviewerVerdict::Favorable => tally.favorable += 1,
            ReviewerVerdict::Neutral => tally.neutral += 1,
            ReviewerVerdict::Unfavorable => tally.unfavorable += 1,
        }
    }

    tally
}

/// Merged view of one scorecard criterion across the reviewer panel.
#[derive(Debug, Clone)]
pub struct CriterionScore {
    pub criterion_id: CriterionId,
    pub label: String,
    pub group: CriterionGroup,
    pub weight_percentage: u8,
    pub average: f32,
    pub low: u8,
    pub high: u8,
    pub spread: u8,
    pub ratings: Vec<ReviewerRating>,
}

impl CriterionScore {
    pub fn to_view(&self) -> CriterionScoreView {
        CriterionScoreView {
            criterion_id: self.criterion_id.0.clone(),
            label: self.label.clone(),
            group: self.group,
            group_label: self.group.label(),
            weight_percentage: self.weight_percentage,
            average: round2(self.average),
            spread: self.spread,
            ratings: self
                .ratings
                .iter()
                .map(|rating| ReviewerRatingView {
                    reviewer_email: rating.reviewer_email.clone(),
                    score: rating.score,
                    comment: rating.comment.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewerRating {
    pub reviewer_email: String,
    pub score: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Divergence {
    pub criterion_id: CriterionId,
    pub label: String,
    pub low: u8,
    pub high: u8,
    pub spread: u8,
}

impl Divergence {
    pub fn to_view(&self) -> DivergenceView {
        DivergenceView {
            criterion_id: self.criterion_id.0.clone(),
            label: self.label.clone(),
            low: self.low,
            high: self.high,
            spread: self.spread,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VerdictTally {
    pub favorable: usize,
    pub neutral: usize,
    pub unfavorable: usize,
}

impl VerdictTally {
    pub fn to_view(&self) -> VerdictTallyView {
        VerdictTallyView {
            favorable: self.favorable,
            neutral: self.neutral,
            unfavorable: self.unfavorable,
        }
    }
}

/// Merged evaluation for one candidate, kept internal; `summary` produces
/// the serializable view handed to API consumers.
#[derive(Debug, Clone)]
pub struct FinalReport {
    pub mission_id: MissionId,
    pub mission_title: String,
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub reviewer_count: usize,
    pub rating_scale_max: u8,
    pub criterion_scores: Vec<CriterionScore>,
    pub overall_score: f32,
    pub agreement: ReviewerAgreement,
    pub divergences: Vec<Divergence>,
    pub verdicts: VerdictTally,
    pub recommendation: Recommendation,
}

impl FinalReport {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            mission_id: self.mission_id.0.clone(),
            mission_title: self.mission_title.clone(),
            candidate_id: self.candidate_id.0.clone(),
            candidate_name: self.candidate_name.clone(),
            reviewer_count: self.reviewer_count,
            overall_score: round2(self.overall_score),
            rating_scale_max: self.rating_scale_max,
            agreement: self.agreement,
            agreement_label: self.agreement.label(),
            recommendation: self.recommendation,
            recommendation_label: self.recommendation.label(),
            criterion_scores: self
                .criterion_scores
                .iter()
                .map(CriterionScore::to_view)
                .collect(),
            divergences: self.divergences.iter().map(Divergence::to_view).collect(),
            verdicts: self.verdicts.to_view(),
        }
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mission::domain::{ClientContact, Mission, SkillLevel};
    use crate::workflows::mission::evaluations::domain::{
        CandidateId, CandidateProfile, CandidateStatus, CriterionRating, EvaluationId,
        ReviewerEvaluation,
    };
    use chrono::NaiveDate;

    fn mission() -> Mission {
        Mission {
            mission_id: MissionId("mis-000001".to_string()),
            title: "Senior Frontend".to_string(),
            client: ClientContact {
                company: "Acme".to_string(),
                contact_name: "Lina".to_string(),
                email: "lina@acme.test".to_string(),
            },
            ratios: Vec::new(),
        }
    }

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            candidate_id: CandidateId("cand-000001".to_string()),
            full_name: "Jules Brun".to_string(),
            email: "jules@example.test".to_string(),
            headline: None,
            applied_on: NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date"),
            source: None,
            status: CandidateStatus::InEvaluation,
        }
    }

    fn criterion(id: &str, label: &str, weight: u8) -> ScorecardCriterion {
        ScorecardCriterion {
            id: CriterionId(id.to_string()),
            label: label.to_string(),
            group: CriterionGroup::Primary,
            weight_percentage: weight,
            description: None,
        }
    }

    fn evaluation(
        reviewer: &str,
        verdict: ReviewerVerdict,
        scores: &[(&str, u8)],
    ) -> ReviewerEvaluation {
        ReviewerEvaluation {
            evaluation_id: EvaluationId(format!("eval-{reviewer}")),
            candidate_id: CandidateId("cand-000001".to_string()),
            reviewer_email: reviewer.to_string(),
            ratings: scores
                .iter()
                .map(|(id, score)| CriterionRating {
                    criterion_id: CriterionId((*id).to_string()),
                    score: *score,
                    comment: None,
                })
                .collect(),
            verdict,
            summary_note: None,
        }
    }

    #[test]
    fn weighted_average_follows_criterion_weights() {
        let engine = MergeEngine::new(ReviewConfig::default());
        let scorecard = vec![criterion("c1", "Lisibilité du code", 75), criterion("c2", "Testing", 25)];
        let evaluations = vec![
            evaluation("ana@panel.test", ReviewerVerdict::Favorable, &[("c1", 4), ("c2", 2)]),
            evaluation("bob@panel.test", ReviewerVerdict::Favorable, &[("c1", 4), ("c2", 2)]),
        ];

        let report = engine.merge(&mission(), &scorecard, &candidate(), &evaluations);

        // 4 * 0.75 + 2 * 0.25 = 3.5
        assert!((report.overall_score - 3.5).abs() < f32::EPSILON);
        assert_eq!(report.recommendation, Recommendation::Recommended);
        assert_eq!(report.agreement, ReviewerAgreement::Aligned);
    }

    #[test]
    fn divergent_scores_are_flagged_per_criterion() {
        let engine = MergeEngine::new(ReviewConfig::default());
        let scorecard = vec![criterion("c1", "Architecture API", 100)];
        let evaluations = vec![
            evaluation("ana@panel.test", ReviewerVerdict::Favorable, &[("c1", 5)]),
            evaluation("bob@panel.test", ReviewerVerdict::Unfavorable, &[("c1", 2)]),
        ];

        let report = engine.merge(&mission(), &scorecard, &candidate(), &evaluations);

        assert_eq!(report.agreement, ReviewerAgreement::Divergent);
        assert_eq!(report.divergences.len(), 1);
        assert_eq!(report.divergences[0].spread, 3);
    }

    #[test]
    fn unfavorable_majority_downgrades_a_passing_score() {
        let engine = MergeEngine::new(ReviewConfig::default());
        let scorecard = vec![criterion("c1", "Performance", 100)];
        let evaluations = vec![
            evaluation("ana@panel.test", ReviewerVerdict::Unfavorable, &[("c1", 4)]),
            evaluation("bob@panel.test", ReviewerVerdict::Unfavorable, &[("c1", 4)]),
            evaluation("eva@panel.test", ReviewerVerdict::Favorable, &[("c1", 4)]),
        ];

        let report = engine.merge(&mission(), &scorecard, &candidate(), &evaluations);

        assert_eq!(report.recommendation, Recommendation::FollowUp);
        assert_eq!(report.verdicts.unfavorable, 2);
    }

    #[test]
    fn zero_weight_scorecards_score_zero() {
        let engine = MergeEngine::new(ReviewConfig::default());
        let scorecard = vec![criterion("c1", "CI/CD", 0), criterion("c2", "Monitoring", 0)];
        let evaluations = vec![
            evaluation(
                "ana@panel.test",
                ReviewerVerdict::Favorable,
                &[("c1", 5), ("c2", 5)],
            ),
            evaluation(
                "bob@panel.test",
                ReviewerVerdict::Favorable,
                &[("c1", 5), ("c2", 5)],
            ),
        ];

        let report = engine.merge(&mission(), &scorecard, &candidate(), &evaluations);

        // Flat top marks cannot pass a candidate when no criterion carries
        // weight; the mission view already flags the scorecard as degenerate.
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn summary_rounds_scores_for_display() {
        let engine = MergeEngine::new(ReviewConfig::default());
        let scorecard = vec![criterion("c1", "Documentation", 100)];
        let evaluations = vec![
            evaluation("ana@panel.test", ReviewerVerdict::Neutral, &[("c1", 3)]),
            evaluation("bob@panel.test", ReviewerVerdict::Neutral, &[("c1", 3)]),
            evaluation("eva@panel.test", ReviewerVerdict::Neutral, &[("c1", 4)]),
        ];

        let report = engine.merge(&mission(), &scorecard, &candidate(), &evaluations);
        let summary = report.summary();

        assert!((summary.overall_score - 3.33).abs() < 0.001);
        assert_eq!(summary.criterion_scores[0].average, 3.33);
        assert_eq!(summary.reviewer_count, 3);
    }
}
