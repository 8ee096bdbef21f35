use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for evaluation missions (job posts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionId(pub String);

/// Canonical ordered skill tiers. "Confirmé" is the display label of
/// `Intermediate`; the legacy spelling is accepted on deserialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Junior,
    #[serde(alias = "confirmé", alias = "confirme")]
    Intermediate,
    Senior,
    Expert,
}

impl SkillLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Junior, Self::Intermediate, Self::Senior, Self::Expert]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Intermediate => "Confirmé",
            Self::Senior => "Senior",
            Self::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionGroup {
    Primary,
    Secondary,
}

impl CriterionGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Draft,
    Open,
    InReview,
    Validated,
    Closed,
}

impl MissionStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Draft,
            Self::Open,
            Self::InReview,
            Self::Validated,
            Self::Closed,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Open => "Open",
            Self::InReview => "In Review",
            Self::Validated => "Validated",
            Self::Closed => "Closed",
        }
    }
}

/// Share of the overall evaluation targeting one technical domain.
///
/// The sum-to-100 invariant across a mission's ratios is enforced by the
/// intake layer, never by the scorecard generator, which scales
/// proportionally to whatever total it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRatio {
    pub domain_name: String,
    pub percentage: f32,
    pub level: SkillLevel,
    #[serde(default)]
    pub expertise_ratios: Vec<ExpertiseRatio>,
}

/// Sub-breakdown within a domain, carried for display only; the scorecard
/// generator operates at domain granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertiseRatio {
    pub name: String,
    pub percentage: f32,
    pub level: SkillLevel,
}

/// Client the mission is run for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    pub company: String,
    pub contact_name: String,
    pub email: String,
}

/// Intake payload for opening a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionBrief {
    pub title: String,
    pub client: ClientContact,
    pub ratios: Vec<DomainRatio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: MissionId,
    pub title: String,
    pub client: ClientContact,
    pub ratios: Vec<DomainRatio>,
}

#[derive(Debug)]
pub enum MissionError {
    CandidateNotFound(String),
    ReviewerNotFound(String),
}

impl fmt::Display for MissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionError::CandidateNotFound(id) => {
                write!(f, "candidate {} is not attached to this mission", id)
            }
            MissionError::ReviewerNotFound(email) => {
                write!(f, "reviewer {} is not assigned to this mission", email)
            }
        }
    }
}

impl std::error::Error for MissionError {}
