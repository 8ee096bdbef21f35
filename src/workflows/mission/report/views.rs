use serde::Serialize;

use super::super::domain::CriterionGroup;

/// How closely the reviewer panel agreed across the scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerAgreement {
    Aligned,
    Mixed,
    Divergent,
}

impl ReviewerAgreement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aligned => "Aligned",
            Self::Mixed => "Mixed",
            Self::Divergent => "Divergent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    FollowUp,
    NotRecommended,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::FollowUp => "Follow Up",
            Self::NotRecommended => "Not Recommended",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewerRatingView {
    pub reviewer_email: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CriterionScoreView {
    pub criterion_id: String,
    pub label: String,
    pub group: CriterionGroup,
    pub group_label: &'static str,
    pub weight_percentage: u8,
    pub average: f32,
    pub spread: u8,
    pub ratings: Vec<ReviewerRatingView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DivergenceView {
    pub criterion_id: String,
    pub label: String,
    pub low: u8,
    pub high: u8,
    pub spread: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VerdictTallyView {
    pub favorable: usize,
    pub neutral: usize,
    pub unfavorable: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub mission_id: String,
    pub mission_title: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub reviewer_count: usize,
    pub overall_score: f32,
    pub rating_scale_max: u8,
    pub agreement: ReviewerAgreement,
    pub agreement_label: &'static str,
    pub recommendation: Recommendation,
    pub recommendation_label: &'static str,
    pub criterion_scores: Vec<CriterionScoreView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub divergences: Vec<DivergenceView>,
    pub verdicts: VerdictTallyView,
}
