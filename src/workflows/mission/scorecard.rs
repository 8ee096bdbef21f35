use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::catalog::ScorecardCatalog;
use super::domain::{CriterionGroup, DomainRatio};

/// Identifier wrapper for generated scorecard criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriterionId(pub String);

/// One weighted evaluation line on a mission's scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardCriterion {
    pub id: CriterionId,
    pub label: String,
    pub group: CriterionGroup,
    pub weight_percentage: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

static CRITERION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_criterion_id() -> CriterionId {
    let id = CRITERION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let stamp = Utc::now().timestamp_millis();
    CriterionId(format!("crit-{stamp}-{id:04}"))
}

/// Builds the suggested scorecard for a set of domain ratios.
///
/// Domains are matched against the catalog in input order; a domain with no
/// qualifying rule contributes nothing. Matched criterion weights are scaled
/// by the domain's share, then the combined list is renormalized to sum to
/// 100. Both steps round to the nearest integer, so a criterion can drift
/// one point from its exact proportional share. When every scaled weight
/// collapses to zero, weights stay zero instead of dividing by zero. This
/// function never fails: malformed percentages degrade to zero-weighted
/// output and oversized shares clamp instead of overflowing.
pub fn suggest_criteria(
    catalog: &ScorecardCatalog,
    ratios: &[DomainRatio],
) -> Vec<ScorecardCriterion> {
    let mut drafts: Vec<CriterionDraft> = Vec::new();

    for ratio in ratios {
        let Some(rule) = catalog.best_rule(&ratio.domain_name, ratio.level) else {
            continue;
        };

        for template in &rule.criteria {
            drafts.push(CriterionDraft {
                label: template.label,
                group: template.group,
                scaled_weight: scale_weight(template.weight, ratio.percentage),
            });
        }
    }

    // Scaled weights clamp at u32::MAX for absurd percentages, so the total
    // accumulates in u64 to stay overflow-free.
    let total: u64 = drafts
        .iter()
        .map(|draft| u64::from(draft.scaled_weight))
        .sum();

    drafts
        .into_iter()
        .map(|draft| ScorecardCriterion {
            id: next_criterion_id(),
            label: draft.label.to_string(),
            group: draft.group,
            weight_percentage: normalized_weight(draft.scaled_weight, total),
            description: None,
        })
        .collect()
}

struct CriterionDraft {
    label: &'static str,
    group: CriterionGroup,
    scaled_weight: u32,
}

fn scale_weight(weight: u8, percentage: f32) -> u32 {
    let scaled = (f64::from(weight) * f64::from(percentage) / 100.0).round();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u32
    } else {
        0
    }
}

fn normalized_weight(scaled: u32, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    ((f64::from(scaled) / total as f64) * 100.0).round() as u8
}
