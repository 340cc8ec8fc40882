use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{find_blocking_pairs, MatchError};
use crate::models::{ErrorResponse, HealthResponse, RunMatchRequest, RunMatchResponse, TraceEvent};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub matching: MatchingSettings,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_match));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run a matching
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "proposers": [{ "id": "A", "preferences": ["X", "Y"] }],
///   "proposees": [{ "id": "X", "preferences": ["A"] }],
///   "mode": "stable|greedy",
///   "includeTrace": false
/// }
/// ```
async fn run_match(
    state: web::Data<AppState>,
    req: web::Json<RunMatchRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for run_match request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let matching = state.matching.clone();
    let req = req.into_inner();

    let largest_side = req.proposers.len().max(req.proposees.len());
    if req.include_trace.unwrap_or(matching.include_trace) && largest_side > matching.max_trace_agents {
        tracing::info!(
            "Refusing traced run with {} agents per side (limit {})",
            largest_side,
            matching.max_trace_agents
        );
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Trace too large".to_string(),
            message: format!(
                "includeTrace is limited to {} agents per side, got {}",
                matching.max_trace_agents, largest_side
            ),
            status_code: 400,
        });
    }

    tracing::info!(
        "Running matching: {} proposers, {} proposees",
        req.proposers.len(),
        req.proposees.len()
    );

    // CPU-bound; runs on the blocking pool
    let outcome = tokio::task::spawn_blocking(move || execute(&matching, req)).await;

    match outcome {
        Ok(Ok(response)) => {
            tracing::info!(
                "Run {} ({}) settled with {} matches after {} proposals",
                response.run_id,
                response.mode,
                response.report.utility.match_count,
                response.report.proposals
            );
            HttpResponse::Ok().json(response)
        }
        Ok(Err(e)) => match_error_response(e),
        Err(e) => {
            tracing::error!("Matching task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Run the requested matching and audit its stability
fn execute(matching: &MatchingSettings, req: RunMatchRequest) -> Result<RunMatchResponse, MatchError> {
    let mode = req.mode.unwrap_or(matching.default_mode);
    let include_trace = req.include_trace.unwrap_or(matching.include_trace);
    let matcher = matching.matcher(mode);

    let mut trace: Vec<TraceEvent> = Vec::new();
    let report = if include_trace {
        matcher.run_traced(req.proposers.clone(), req.proposees.clone(), |_, event| {
            trace.push(event.clone())
        })?
    } else {
        matcher.run(req.proposers.clone(), req.proposees.clone())?
    };

    let blocking_pairs = find_blocking_pairs(&req.proposers, &req.proposees, &report);

    Ok(RunMatchResponse {
        run_id: uuid::Uuid::new_v4().to_string(),
        mode,
        stable: blocking_pairs.is_empty(),
        blocking_pairs,
        report,
        trace: include_trace.then_some(trace),
        completed_at: chrono::Utc::now(),
    })
}

fn match_error_response(e: MatchError) -> HttpResponse {
    tracing::info!("Rejected matching input: {}", e);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Invalid input".to_string(),
        message: e.to_string(),
        status_code: 400,
    })
}
