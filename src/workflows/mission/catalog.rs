use super::domain::{CriterionGroup, SkillLevel};

/// Weighted criterion template as authored in the catalog. Weights within a
/// rule sum to 100 before any mission-specific scaling is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionTemplate {
    pub label: &'static str,
    pub group: CriterionGroup,
    pub weight: u8,
}

/// One catalog entry: the criteria suggested for a technical domain at or
/// above a minimum seniority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRule {
    pub domain: &'static str,
    pub min_level: SkillLevel,
    pub criteria: Vec<CriterionTemplate>,
}

#[derive(Debug)]
pub struct ScorecardCatalog {
    rules: Vec<SuggestionRule>,
}

impl ScorecardCatalog {
    pub fn standard() -> Self {
        Self {
            rules: standard_suggestion_rules(),
        }
    }

    pub fn rules(&self) -> &[SuggestionRule] {
        &self.rules
    }

    pub fn rules_for_domain(&self, domain: &str) -> Vec<&SuggestionRule> {
        self.rules
            .iter()
            .filter(|rule| rule.domain == domain)
            .collect()
    }

    /// Picks the most demanding rule the requested level still qualifies
    /// for: among rules whose `min_level` does not exceed `level`, the one
    /// with the highest `min_level` wins. Domain names match exactly.
    pub fn best_rule(&self, domain: &str, level: SkillLevel) -> Option<&SuggestionRule> {
        self.rules
            .iter()
            .filter(|rule| rule.domain == domain && rule.min_level <= level)
            .max_by_key(|rule| rule.min_level)
    }
}

fn standard_suggestion_rules() -> Vec<SuggestionRule> {
    vec![
        SuggestionRule {
            domain: "Frontend",
            min_level: SkillLevel::Senior,
            criteria: vec![
                CriterionTemplate {
                    label: "Lisibilité du code",
                    group: CriterionGroup::Primary,
                    weight: 25,
                },
                CriterionTemplate {
                    label: "Architecture frontend",
                    group: CriterionGroup::Primary,
                    weight: 25,
                },
                CriterionTemplate {
                    label: "Sécurité frontend",
                    group: CriterionGroup::Primary,
                    weight: 15,
                },
                CriterionTemplate {
                    label: "Performance",
                    group: CriterionGroup::Secondary,
                    weight: 15,
                },
                CriterionTemplate {
                    label: "Testing",
                    group: CriterionGroup::Secondary,
                    weight: 10,
                },
                CriterionTemplate {
                    label: "Git & Versioning",
                    group: CriterionGroup::Secondary,
                    weight: 10,
                },
            ],
        },
        SuggestionRule {
            domain: "Frontend",
            min_level: SkillLevel::Junior,
            criteria: vec![
                CriterionTemplate {
                    label: "Lisibilité du code",
                    group: CriterionGroup::Primary,
                    weight: 40,
                },
                CriterionTemplate {
                    label: "Git & Versioning",
                    group: CriterionGroup::Primary,
                    weight: 30,
                },
                CriterionTemplate {
                    label: "Testing",
                    group: CriterionGroup::Secondary,
                    weight: 30,
                },
            ],
        },
        SuggestionRule {
            domain: "Backend",
            min_level: SkillLevel::Senior,
            criteria: vec![
                CriterionTemplate {
                    label: "Architecture API",
                    group: CriterionGroup::Primary,
                    weight: 25,
                },
                CriterionTemplate {
                    label: "Sécurité backend",
                    group: CriterionGroup::Primary,
                    weight: 20,
                },
                CriterionTemplate {
                    label: "Base de données",
                    group: CriterionGroup::Primary,
                    weight: 20,
                },
                CriterionTemplate {
                    label: "Performance serveur",
                    group: CriterionGroup::Secondary,
                    weight: 15,
                },
                CriterionTemplate {
                    label: "Testing backend",
                    group: CriterionGroup::Secondary,
                    weight: 10,
                },
                CriterionTemplate {
                    label: "Documentation",
                    group: CriterionGroup::Secondary,
                    weight: 10,
                },
            ],
        },
        SuggestionRule {
            domain: "Backend",
            min_level: SkillLevel::Junior,
            criteria: vec![
                CriterionTemplate {
                    label: "Lisibilité du code",
                    group: CriterionGroup::Primary,
                    weight: 35,
                },
                CriterionTemplate {
                    label: "Base de données",
                    group: CriterionGroup::Primary,
                    weight: 35,
                },
                CriterionTemplate {
                    label: "Testing backend",
                    group: CriterionGroup::Secondary,
                    weight: 30,
                },
            ],
        },
        SuggestionRule {
            domain: "DevOps",
            min_level: SkillLevel::Junior,
            criteria: vec![
                CriterionTemplate {
                    label: "CI/CD",
                    group: CriterionGroup::Primary,
                    weight: 40,
                },
                CriterionTemplate {
                    label: "Conteneurisation",
                    group: CriterionGroup::Primary,
                    weight: 35,
                },
                CriterionTemplate {
                    label: "Monitoring",
                    group: CriterionGroup::Secondary,
                    weight: 25,
                },
            ],
        },
    ]
}
