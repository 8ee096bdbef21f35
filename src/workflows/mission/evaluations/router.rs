use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::super::domain::{MissionBrief, MissionId};
use super::super::report::render_markdown;
use super::domain::{CandidateId, CandidateIntake, EvaluationSubmission, ReviewerProfile};
use super::repository::{
    EvaluationRepository, MissionDirectory, ReportPublisher, RepositoryError,
};
use super::service::{EvaluationServiceError, MissionEvaluationService};

/// Router builder exposing HTTP endpoints for the mission evaluation
/// workflow.
pub fn mission_router<M, E, P>(service: Arc<MissionEvaluationService<M, E, P>>) -> Router
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    Router::new()
        .route("/api/v1/missions", post(open_handler::<M, E, P>))
        .route("/api/v1/missions/:mission_id", get(mission_handler::<M, E, P>))
        .route(
            "/api/v1/missions/:mission_id/candidates",
            post(candidate_handler::<M, E, P>),
        )
        .route(
            "/api/v1/missions/:mission_id/reviewers",
            post(reviewer_handler::<M, E, P>),
        )
        .route(
            "/api/v1/missions/:mission_id/evaluations",
            post(evaluation_handler::<M, E, P>),
        )
        .route(
            "/api/v1/missions/:mission_id/candidates/:candidate_id/report",
            get(report_handler::<M, E, P>),
        )
        .route(
            "/api/v1/missions/:mission_id/candidates/:candidate_id/report/validate",
            post(validate_handler::<M, E, P>),
        )
        .route(
            "/api/v1/missions/:mission_id/candidates/:candidate_id/report/document",
            get(document_handler::<M, E, P>),
        )
        .with_state(service)
}

fn error_response(error: EvaluationServiceError) -> Response {
    let status = match &error {
        EvaluationServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EvaluationServiceError::Mission(_) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EvaluationServiceError::QuorumNotMet { .. } => StatusCode::CONFLICT,
        EvaluationServiceError::Repository(RepositoryError::Unavailable(_))
        | EvaluationServiceError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn open_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    axum::Json(brief): axum::Json<MissionBrief>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.open_mission(brief) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.detail())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn mission_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path(mission_id): Path<String>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.mission(&MissionId(mission_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.detail())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path(mission_id): Path<String>,
    axum::Json(intake): axum::Json<CandidateIntake>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.register_candidate(&MissionId(mission_id), intake) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reviewer_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path(mission_id): Path<String>,
    axum::Json(reviewer): axum::Json<ReviewerProfile>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.assign_reviewer(&MissionId(mission_id), reviewer) {
        Ok(reviewer) => (StatusCode::CREATED, axum::Json(reviewer)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluation_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path(mission_id): Path<String>,
    axum::Json(submission): axum::Json<EvaluationSubmission>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.submit_evaluation(&MissionId(mission_id), submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.receipt())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path((mission_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    let mission_id = MissionId(mission_id);
    let candidate_id = CandidateId(candidate_id);
    match service.candidate_report(&mission_id, &candidate_id) {
        Ok(report) => (StatusCode::OK, axum::Json(report.summary())).into_response(),
        Err(EvaluationServiceError::QuorumNotMet { required, received }) => {
            let payload = json!({
                "mission_id": mission_id.0,
                "candidate_id": candidate_id.0,
                "status": "pending",
                "required_evaluations": required,
                "received_evaluations": received,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validate_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path((mission_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.validate_report(&MissionId(mission_id), &CandidateId(candidate_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report.summary())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn document_handler<M, E, P>(
    State(service): State<Arc<MissionEvaluationService<M, E, P>>>,
    Path((mission_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    M: MissionDirectory + 'static,
    E: EvaluationRepository + 'static,
    P: ReportPublisher + 'static,
{
    match service.candidate_report(&MissionId(mission_id), &CandidateId(candidate_id)) {
        Ok(report) => {
            let document = render_markdown(&report.summary());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
                document,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}
