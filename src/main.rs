use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use coton_check::config::AppConfig;
use coton_check::error::AppError;
use coton_check::infra::{
    default_review_config, InMemoryEvaluationRepository, InMemoryMissionDirectory,
    InMemoryReportPublisher,
};
use coton_check::telemetry;
use coton_check::workflows::mission::domain::{
    ClientContact, DomainRatio, MissionBrief, SkillLevel,
};
use coton_check::workflows::mission::evaluations::{
    mission_router, CandidateId, CandidateIntake, CriterionRating, EvaluationSubmission,
    MissionEvaluationService, ReviewerProfile, ReviewerVerdict, StagedIntake,
};
use coton_check::workflows::mission::report::render_markdown;
use coton_check::workflows::mission::{suggest_criteria, ScorecardCatalog, ScorecardCriterion};
use coton_check::workflows::roster::CandidateRosterImporter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "COTON Check",
    about = "Run the COTON Check evaluation service and scorecard demos from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect mission scorecards and merged reports for stakeholder demos
    Mission {
        #[command(subcommand)]
        command: MissionCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum MissionCommand {
    /// Open a sample mission, collect panel evaluations, and print the merged report
    Report(MissionReportArgs),
}

#[derive(Args, Debug)]
struct MissionReportArgs {
    /// Optional ATS roster CSV export to hydrate the candidate list
    #[arg(long)]
    roster_csv: Option<PathBuf>,
    /// Roster export date, backfills blank Applied At cells (defaults to today)
    #[arg(long, value_parser = parse_date)]
    exported_on: Option<NaiveDate>,
    /// Include the full generated scorecard in the output
    #[arg(long)]
    list_criteria: bool,
    /// Print the merged report as a markdown document
    #[arg(long)]
    markdown: bool,
}

#[derive(Debug, Deserialize)]
struct MissionPreviewRequest {
    ratios: Vec<DomainRatio>,
    #[serde(default)]
    roster_csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    roster_exported_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct MissionPreviewResponse {
    data_source: PreviewDataSource,
    criteria: Vec<ScorecardCriterion>,
    total_weight: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    roster: Option<Vec<StagedIntake>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum PreviewDataSource {
    Roster,
    Brief,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Mission {
            command: MissionCommand::Report(args),
        } => run_mission_report(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let service = Arc::new(MissionEvaluationService::new(
        Arc::new(InMemoryMissionDirectory::default()),
        Arc::new(InMemoryEvaluationRepository::default()),
        Arc::new(InMemoryReportPublisher::default()),
        default_review_config(),
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/missions/preview", post(mission_preview_endpoint))
        .with_state(state)
        .merge(mission_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mission evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_mission_report(args: MissionReportArgs) -> Result<(), AppError> {
    let MissionReportArgs {
        roster_csv,
        exported_on,
        list_criteria,
        markdown,
    } = args;

    let reports = Arc::new(InMemoryReportPublisher::default());
    let service = Arc::new(MissionEvaluationService::new(
        Arc::new(InMemoryMissionDirectory::default()),
        Arc::new(InMemoryEvaluationRepository::default()),
        reports.clone(),
        default_review_config(),
    ));

    let record = service.open_mission(demo_mission_brief())?;
    let mission_id = record.mission.mission_id.clone();

    println!("Mission scorecard demo");
    println!(
        "Mission {} ({}) opened for {}",
        mission_id.0, record.mission.title, record.mission.client.company
    );
    println!("Generated criteria: {}", record.scorecard.len());

    if list_criteria {
        println!("\nScorecard");
        for criterion in &record.scorecard {
            println!(
                "- {} | {} | {}%",
                criterion.label,
                criterion.group.label(),
                criterion.weight_percentage
            );
        }
    }

    if let Some(path) = roster_csv {
        let exported_on = exported_on.unwrap_or_else(|| Local::now().date_naive());
        let staged = CandidateRosterImporter::from_path(path, exported_on)?;
        let profiles = service.register_candidates(&mission_id, staged)?;
        println!("\nRoster import: {} candidates attached", profiles.len());
        for profile in &profiles {
            println!(
                "- {} <{}> ({})",
                profile.full_name,
                profile.email,
                profile.status.label()
            );
        }
    } else {
        println!("\nRoster import: none provided, continuing with a sample candidate");
    }

    let candidate = service.register_candidate(
        &mission_id,
        CandidateIntake {
            full_name: "Jules Brun".to_string(),
            email: "jules.brun@example.test".to_string(),
            headline: Some("Fullstack developer, 7 years".to_string()),
            applied_on: Local::now().date_naive(),
            source: Some("Demo".to_string()),
        },
    )?;

    for reviewer in demo_reviewers() {
        service.assign_reviewer(&mission_id, reviewer)?;
    }

    service.submit_evaluation(
        &mission_id,
        demo_submission(
            &record.scorecard,
            &candidate.candidate_id,
            "ana.caron@panel.test",
            &[4],
            ReviewerVerdict::Favorable,
        ),
    )?;
    service.submit_evaluation(
        &mission_id,
        demo_submission(
            &record.scorecard,
            &candidate.candidate_id,
            "bilal.kone@panel.test",
            &[5, 4, 2],
            ReviewerVerdict::Favorable,
        ),
    )?;

    let report = service.validate_report(&mission_id, &candidate.candidate_id)?;
    let summary = report.summary();

    if markdown {
        println!("\n{}", render_markdown(&summary));
        return Ok(());
    }

    println!("\nMerged report for {}", summary.candidate_name);
    println!(
        "Overall score: {:.2} / {} ({})",
        summary.overall_score, summary.rating_scale_max, summary.recommendation_label
    );
    println!(
        "Panel: {} reviewers, agreement {}",
        summary.reviewer_count, summary.agreement_label
    );

    println!("\nCriterion consensus");
    for score in &summary.criterion_scores {
        println!(
            "- {} ({}%): avg {:.2}, spread {}",
            score.label, score.weight_percentage, score.average, score.spread
        );
    }

    if summary.divergences.is_empty() {
        println!("\nDivergences: none");
    } else {
        println!("\nDivergences");
        for divergence in &summary.divergences {
            println!(
                "- {}: scores {} to {} (spread {})",
                divergence.label, divergence.low, divergence.high, divergence.spread
            );
        }
    }

    println!(
        "\nVerdicts: {} favorable / {} neutral / {} unfavorable",
        summary.verdicts.favorable, summary.verdicts.neutral, summary.verdicts.unfavorable
    );

    let events = reports.events();
    if events.is_empty() {
        println!("\nClient notices: none dispatched");
    } else {
        println!("\nClient notices");
        for notice in events {
            println!(
                "- template={} -> candidate {}",
                notice.template, notice.candidate_id.0
            );
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless what-if: generate the scorecard a brief would get, optionally
/// previewing the candidates an ATS roster export would attach.
async fn mission_preview_endpoint(
    Json(payload): Json<MissionPreviewRequest>,
) -> Result<Json<MissionPreviewResponse>, AppError> {
    let MissionPreviewRequest {
        ratios,
        roster_csv,
        roster_exported_on,
    } = payload;

    let catalog = ScorecardCatalog::standard();
    let criteria = suggest_criteria(&catalog, &ratios);
    let total_weight: u32 = criteria
        .iter()
        .map(|criterion| u32::from(criterion.weight_percentage))
        .sum();

    let (data_source, roster) = match roster_csv {
        Some(csv) => {
            let exported_on = roster_exported_on.unwrap_or_else(|| Local::now().date_naive());
            let reader = Cursor::new(csv.into_bytes());
            let staged = CandidateRosterImporter::from_reader(reader, exported_on)?;
            (PreviewDataSource::Roster, Some(staged))
        }
        None => (PreviewDataSource::Brief, None),
    };

    Ok(Json(MissionPreviewResponse {
        data_source,
        criteria,
        total_weight,
        roster,
    }))
}

fn demo_mission_brief() -> MissionBrief {
    MissionBrief {
        title: "Fullstack Senior".to_string(),
        client: ClientContact {
            company: "Nimbus Labs".to_string(),
            contact_name: "Claire Fontaine".to_string(),
            email: "claire@nimbuslabs.test".to_string(),
        },
        ratios: vec![
            DomainRatio {
                domain_name: "Frontend".to_string(),
                percentage: 60.0,
                level: SkillLevel::Senior,
                expertise_ratios: Vec::new(),
            },
            DomainRatio {
                domain_name: "Backend".to_string(),
                percentage: 40.0,
                level: SkillLevel::Intermediate,
                expertise_ratios: Vec::new(),
            },
        ],
    }
}

fn demo_reviewers() -> [ReviewerProfile; 2] {
    [
        ReviewerProfile {
            full_name: "Ana Caron".to_string(),
            email: "ana.caron@panel.test".to_string(),
        },
        ReviewerProfile {
            full_name: "Bilal Kone".to_string(),
            email: "bilal.kone@panel.test".to_string(),
        },
    ]
}

fn demo_submission(
    scorecard: &[ScorecardCriterion],
    candidate_id: &CandidateId,
    reviewer_email: &str,
    scores: &[u8],
    verdict: ReviewerVerdict,
) -> EvaluationSubmission {
    let ratings = scorecard
        .iter()
        .zip(scores.iter().cycle())
        .map(|(criterion, score)| CriterionRating {
            criterion_id: criterion.id.clone(),
            score: *score,
            comment: None,
        })
        .collect();

    EvaluationSubmission {
        candidate_id: candidate_id.clone(),
        reviewer_email: reviewer_email.to_string(),
        ratings,
        verdict,
        summary_note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use coton_check::workflows::mission::evaluations::CandidateStatus;

    fn ratio(domain: &str, percentage: f32, level: SkillLevel) -> DomainRatio {
        DomainRatio {
            domain_name: domain.to_string(),
            percentage,
            level,
            expertise_ratios: Vec::new(),
        }
    }

    #[tokio::test]
    async fn mission_preview_endpoint_returns_scorecard() {
        let request = MissionPreviewRequest {
            ratios: vec![
                ratio("Frontend", 60.0, SkillLevel::Senior),
                ratio("Backend", 40.0, SkillLevel::Senior),
            ],
            roster_csv: None,
            roster_exported_on: None,
        };

        let Json(body) = super::mission_preview_endpoint(Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.data_source, PreviewDataSource::Brief);
        assert_eq!(body.criteria.len(), 12);
        assert_eq!(body.total_weight, 100);
        assert!(body.roster.is_none());
    }

    #[tokio::test]
    async fn mission_preview_endpoint_can_hydrate_roster() {
        let request = MissionPreviewRequest {
            ratios: vec![ratio("DevOps", 100.0, SkillLevel::Junior)],
            roster_csv: Some(
                "Candidate,Email,Applied At,Stage,Source\nLila Moreau,lila@exemple.fr,2025-11-03,Shortlist,LinkedIn\n"
                    .to_string(),
            ),
            roster_exported_on: Some(NaiveDate::from_ymd_opt(2025, 11, 10).expect("valid date")),
        };

        let Json(body) = super::mission_preview_endpoint(Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.data_source, PreviewDataSource::Roster);
        assert_eq!(body.criteria.len(), 3);
        let roster = body.roster.expect("roster returned");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].stage, CandidateStatus::Shortlisted);
        assert_eq!(roster[0].intake.full_name, "Lila Moreau");
    }
}
