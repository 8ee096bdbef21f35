use super::common::*;

use crate::workflows::mission::domain::{MissionBrief, SkillLevel};
use crate::workflows::mission::evaluations::domain::{
    CandidateIntake, CandidateStatus, ReviewerVerdict,
};
use crate::workflows::mission::evaluations::intake::IntakeViolation;
use crate::workflows::mission::{suggest_criteria, ScorecardCatalog, ScorecardCriterion};

fn scorecard() -> Vec<ScorecardCriterion> {
    let catalog = ScorecardCatalog::standard();
    suggest_criteria(&catalog, &[ratio("DevOps", 100.0, SkillLevel::Junior)])
}

#[test]
fn guard_accepts_balanced_briefs() {
    let guard = intake_guard();
    assert!(guard.vet_brief(&brief()).is_ok());
}

#[test]
fn guard_rejects_empty_ratio_sets() {
    let guard = intake_guard();
    let empty = MissionBrief {
        title: "Backend".to_string(),
        client: client(),
        ratios: Vec::new(),
    };

    match guard.vet_brief(&empty) {
        Err(IntakeViolation::EmptyRatios) => {}
        other => panic!("expected empty ratio violation, got {other:?}"),
    }
}

#[test]
fn guard_rejects_percentages_that_do_not_sum_to_100() {
    let guard = intake_guard();

    match guard.vet_brief(&unbalanced_brief()) {
        Err(IntakeViolation::RatioSumMismatch { found }) => {
            assert!((found - 60.0).abs() < f32::EPSILON);
        }
        other => panic!("expected ratio sum violation, got {other:?}"),
    }
}

#[test]
fn guard_rejects_malformed_percentages() {
    let guard = intake_guard();
    let mut brief = brief();
    brief.ratios[0].percentage = f32::NAN;

    match guard.vet_brief(&brief) {
        Err(IntakeViolation::InvalidPercentage { domain, .. }) => {
            assert_eq!(domain, "Frontend");
        }
        other => panic!("expected invalid percentage violation, got {other:?}"),
    }
}

#[test]
fn candidate_profiles_are_normalized() {
    let guard = intake_guard();
    let intake = CandidateIntake {
        full_name: "  Jules Brun  ".to_string(),
        email: "Jules.Brun@Example.TEST".to_string(),
        ..candidate_intake()
    };

    let profile = guard.profile_from_intake(intake).expect("profile is vetted");

    assert_eq!(profile.full_name, "Jules Brun");
    assert_eq!(profile.email, "jules.brun@example.test");
    assert_eq!(profile.status, CandidateStatus::Applied);
    assert_eq!(profile.candidate_id.0, "pending");
}

#[test]
fn candidates_without_usable_emails_are_rejected() {
    let guard = intake_guard();
    let intake = CandidateIntake {
        email: "not-an-address".to_string(),
        ..candidate_intake()
    };

    match guard.profile_from_intake(intake) {
        Err(IntakeViolation::InvalidEmail { found }) => {
            assert_eq!(found, "not-an-address");
        }
        other => panic!("expected email violation, got {other:?}"),
    }
}

#[test]
fn blank_candidate_names_are_rejected() {
    let guard = intake_guard();
    let intake = CandidateIntake {
        full_name: "   ".to_string(),
        ..candidate_intake()
    };

    match guard.profile_from_intake(intake) {
        Err(IntakeViolation::MissingName) => {}
        other => panic!("expected missing name violation, got {other:?}"),
    }
}

#[test]
fn evaluations_must_rate_every_criterion() {
    let guard = intake_guard();
    let scorecard = scorecard();
    let candidate = guard
        .profile_from_intake(candidate_intake())
        .expect("profile is vetted");

    let mut submission = flat_submission(
        &scorecard,
        &candidate.candidate_id,
        "ana@panel.test",
        4,
        ReviewerVerdict::Favorable,
    );
    submission.ratings.pop();

    match guard.evaluation_from_submission(&scorecard, submission) {
        Err(IntakeViolation::IncompleteRatings { missing }) => assert_eq!(missing, 1),
        other => panic!("expected incomplete ratings violation, got {other:?}"),
    }
}

#[test]
fn evaluations_reject_scores_off_the_scale() {
    let guard = intake_guard();
    let scorecard = scorecard();
    let candidate = guard
        .profile_from_intake(candidate_intake())
        .expect("profile is vetted");

    for bad_score in [0u8, 6u8] {
        let submission = flat_submission(
            &scorecard,
            &candidate.candidate_id,
            "ana@panel.test",
            bad_score,
            ReviewerVerdict::Neutral,
        );

        match guard.evaluation_from_submission(&scorecard, submission) {
            Err(IntakeViolation::RatingOutOfScale { found, max, .. }) => {
                assert_eq!(found, bad_score);
                assert_eq!(max, 5);
            }
            other => panic!("expected out of scale violation, got {other:?}"),
        }
    }
}

#[test]
fn evaluations_reject_unknown_and_duplicate_criteria() {
    let guard = intake_guard();
    let scorecard = scorecard();
    let candidate = guard
        .profile_from_intake(candidate_intake())
        .expect("profile is vetted");

    let mut unknown = flat_submission(
        &scorecard,
        &candidate.candidate_id,
        "ana@panel.test",
        3,
        ReviewerVerdict::Neutral,
    );
    unknown.ratings[0].criterion_id.0 = "crit-unknown".to_string();
    match guard.evaluation_from_submission(&scorecard, unknown) {
        Err(IntakeViolation::UnknownCriterion { criterion }) => {
            assert_eq!(criterion, "crit-unknown");
        }
        other => panic!("expected unknown criterion violation, got {other:?}"),
    }

    let mut duplicated = flat_submission(
        &scorecard,
        &candidate.candidate_id,
        "ana@panel.test",
        3,
        ReviewerVerdict::Neutral,
    );
    duplicated.ratings[1] = duplicated.ratings[0].clone();
    match guard.evaluation_from_submission(&scorecard, duplicated) {
        Err(IntakeViolation::DuplicateRating { .. }) => {}
        other => panic!("expected duplicate rating violation, got {other:?}"),
    }
}

#[test]
fn evaluations_against_an_empty_scorecard_are_rejected() {
    let guard = intake_guard();
    let candidate = guard
        .profile_from_intake(candidate_intake())
        .expect("profile is vetted");

    let submission = flat_submission(
        &[],
        &candidate.candidate_id,
        "ana@panel.test",
        4,
        ReviewerVerdict::Favorable,
    );

    match guard.evaluation_from_submission(&[], submission) {
        Err(IntakeViolation::EmptyScorecard) => {}
        other => panic!("expected empty scorecard violation, got {other:?}"),
    }
}

#[test]
fn vetted_evaluations_normalize_the_reviewer_email() {
    let guard = intake_guard();
    let scorecard = scorecard();
    let candidate = guard
        .profile_from_intake(candidate_intake())
        .expect("profile is vetted");

    let submission = flat_submission(
        &scorecard,
        &candidate.candidate_id,
        "Ana@Panel.TEST",
        4,
        ReviewerVerdict::Favorable,
    );

    let evaluation = guard
        .evaluation_from_submission(&scorecard, submission)
        .expect("submission is vetted");

    assert_eq!(evaluation.reviewer_email, "ana@panel.test");
    assert_eq!(evaluation.evaluation_id.0, "pending");
    assert_eq!(evaluation.ratings.len(), scorecard.len());
}
