use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{
    AssetRecord, CareerSkill, CashflowRecord, CategoryAmount, Clock, Forecast, Goal,
    GoalProgress, HistorySnapshot, Impact, InMemoryLedger, Ledger, LedgerSource,
    LiabilityRecord, Metrics, MonthlyCashflow, PlannerConfig, ScenarioConfig,
    ScenarioProjection, SystemClock, TargetEta, Trajectory, active_goal_progress,
    asset_allocation, build_oracle, build_statement, career_summary, classify_trajectory,
    expenses_by_category, forecast, monthly_cashflow, months_to_target, run_scenarios,
    suggested_contribution, target_eta,
};
use crate::error::Error;

mod cli;

pub use cli::{Cli, Command, SimulateArgs, build_simulation_inputs, run_cli};

const MAX_MONTHLY_CONTRIBUTION: f64 = 5_000.0;

/// Shared handler state. The clock is injected so date-relative answers are
/// reproducible in tests.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<InMemoryLedger>,
    clock: Arc<dyn Clock>,
    planner: Arc<PlannerConfig>,
    scenarios: ScenarioConfig,
}

impl AppState {
    pub fn new(ledger: Arc<InMemoryLedger>, clock: Arc<dyn Clock>) -> Self {
        AppState {
            ledger,
            clock,
            planner: Arc::new(PlannerConfig::default()),
            scenarios: ScenarioConfig::default(),
        }
    }

    pub fn with_planner(mut self, planner: PlannerConfig) -> Self {
        self.planner = Arc::new(planner);
        self
    }

    pub fn with_scenarios(mut self, scenarios: ScenarioConfig) -> Self {
        self.scenarios = scenarios;
        self
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    start_net_worth: Option<f64>,
    base_rate: Option<f64>,
    inflation: Option<f64>,
    years: Option<u32>,
    monthly_contribution: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastPayload {
    history: Vec<HistorySnapshot>,
    #[serde(default)]
    offsets: Option<Vec<u32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TargetPayload {
    current_net_worth: f64,
    monthly_cashflow: f64,
    target: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OracleQuery {
    target: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VictoryPayload {
    description: String,
    #[serde(default)]
    impact: Impact,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StatementQuery {
    prepared_for: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    start_net_worth: f64,
    monthly_contribution: f64,
    years: u32,
    projected_real_wealth: f64,
    projections: Vec<ScenarioProjection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    metrics: Metrics,
    monthly_cashflow: MonthlyCashflow,
    asset_allocation: Vec<CategoryAmount>,
    expenses_by_category: Vec<CategoryAmount>,
    goals: Vec<GoalProgress>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ForecastResponse {
    forecast: Forecast,
    trajectory: Trajectory,
    trajectory_message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetResponse {
    months_to_target: Option<f64>,
    target_eta: TargetEta,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/forecast", post(forecast_handler))
        .route("/api/target", post(target_handler))
        .route("/api/users/:user", delete(delete_user_handler))
        .route(
            "/api/users/:user/ledger",
            get(get_ledger_handler).put(put_ledger_handler),
        )
        .route("/api/users/:user/assets", put(put_assets_handler))
        .route("/api/users/:user/liabilities", put(put_liabilities_handler))
        .route("/api/users/:user/cashflow", put(put_cashflow_handler))
        .route("/api/users/:user/goals", put(put_goals_handler))
        .route("/api/users/:user/skills", put(put_skills_handler))
        .route("/api/users/:user/wins", post(victory_handler))
        .route("/api/users/:user/career", get(career_handler))
        .route("/api/users/:user/snapshots", post(snapshot_handler))
        .route("/api/users/:user/dashboard", get(dashboard_handler))
        .route("/api/users/:user/oracle", get(oracle_handler))
        .route("/api/users/:user/scenarios", get(user_scenarios_handler))
        .route("/api/users/:user/statement", get(statement_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(
    port: u16,
    planner: PlannerConfig,
    scenarios: ScenarioConfig,
) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = AppState::new(Arc::new(InMemoryLedger::new()), Arc::new(SystemClock))
        .with_planner(planner)
        .with_scenarios(scenarios);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "kairos HTTP API listening");

    axum::serve(listener, router(state)).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload, SimulateArgs::default())
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload, SimulateArgs::default())
}

fn simulate_handler_impl(payload: SimulatePayload, defaults: SimulateArgs) -> Response {
    match simulate_response(payload, defaults) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn forecast_handler(
    State(state): State<AppState>,
    Json(payload): Json<ForecastPayload>,
) -> Response {
    json_response(StatusCode::OK, forecast_response(payload, &state.planner))
}

async fn target_handler(
    State(state): State<AppState>,
    Json(payload): Json<TargetPayload>,
) -> Response {
    match target_response(payload, &state.planner, state.clock.today()) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Response {
    let outcome = state.ledger.delete_user(&user).and_then(|removed| {
        if removed {
            Ok(())
        } else {
            Err(Error::UnknownUser(user.clone()))
        }
    });
    empty_or_error(outcome)
}

async fn get_ledger_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Response {
    match state.ledger.load_ledger(&user) {
        Ok(ledger) => json_response(StatusCode::OK, ledger),
        Err(err) => failure_response(&err),
    }
}

async fn put_ledger_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(ledger): Json<Ledger>,
) -> Response {
    empty_or_error(state.ledger.replace_ledger(&user, ledger))
}

async fn put_assets_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(rows): Json<Vec<AssetRecord>>,
) -> Response {
    empty_or_error(state.ledger.replace_assets(&user, rows))
}

async fn put_liabilities_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(rows): Json<Vec<LiabilityRecord>>,
) -> Response {
    empty_or_error(state.ledger.replace_liabilities(&user, rows))
}

async fn put_cashflow_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(rows): Json<Vec<CashflowRecord>>,
) -> Response {
    empty_or_error(state.ledger.replace_cashflow(&user, rows))
}

async fn put_goals_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(rows): Json<Vec<Goal>>,
) -> Response {
    empty_or_error(state.ledger.replace_goals(&user, rows))
}

async fn put_skills_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(rows): Json<Vec<CareerSkill>>,
) -> Response {
    empty_or_error(state.ledger.replace_skills(&user, rows))
}

async fn victory_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<VictoryPayload>,
) -> Response {
    let logged = state.ledger.log_victory(
        &user,
        state.clock.today(),
        &payload.description,
        payload.impact,
    );
    match logged {
        Ok(win) => json_response(StatusCode::CREATED, win),
        Err(err) => failure_response(&err),
    }
}

async fn career_handler(State(state): State<AppState>, Path(user): Path<String>) -> Response {
    match state.ledger.load_ledger(&user) {
        Ok(ledger) => json_response(
            StatusCode::OK,
            career_summary(&ledger.skills, &ledger.wins),
        ),
        Err(err) => failure_response(&err),
    }
}

async fn snapshot_handler(State(state): State<AppState>, Path(user): Path<String>) -> Response {
    match state.ledger.record_snapshot(&user, state.clock.today()) {
        Ok(snapshot) => json_response(StatusCode::CREATED, snapshot),
        Err(err) => failure_response(&err),
    }
}

async fn dashboard_handler(State(state): State<AppState>, Path(user): Path<String>) -> Response {
    match state.ledger.load_ledger(&user) {
        Ok(ledger) => json_response(StatusCode::OK, dashboard_response(&ledger)),
        Err(err) => failure_response(&err),
    }
}

async fn oracle_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<OracleQuery>,
) -> Response {
    let config = match planner_with_target(&state.planner, query.target) {
        Ok(config) => config,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match state.ledger.load_ledger(&user) {
        Ok(ledger) => {
            let report = build_oracle(
                &ledger.metrics(),
                &ledger.history,
                state.clock.today(),
                &config,
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => failure_response(&err),
    }
}

async fn user_scenarios_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(payload): Query<SimulatePayload>,
) -> Response {
    match state.ledger.load_ledger(&user) {
        Ok(ledger) => {
            let metrics = ledger.metrics();
            let defaults = SimulateArgs {
                start_net_worth: metrics.net_worth,
                contribution: Some(
                    suggested_contribution(&metrics).min(MAX_MONTHLY_CONTRIBUTION),
                ),
                ..SimulateArgs::default()
            };
            match simulate_response_with(payload, defaults, &state.scenarios) {
                Ok(response) => json_response(StatusCode::OK, response),
                Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
            }
        }
        Err(err) => failure_response(&err),
    }
}

async fn statement_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<StatementQuery>,
) -> Response {
    match state.ledger.load_ledger(&user) {
        Ok(ledger) => {
            let prepared_for = query.prepared_for.unwrap_or_else(|| user.clone());
            let statement = build_statement(
                &prepared_for,
                &ledger.metrics(),
                &ledger.assets,
                &ledger.cashflow,
                state.clock.today(),
            );
            json_response(StatusCode::OK, statement)
        }
        Err(err) => failure_response(&err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    no_store((status, Json(body)).into_response())
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn failure_response(err: &Error) -> Response {
    let status = match err {
        Error::UnknownUser(_) => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    error_response(status, &err.to_string())
}

fn empty_or_error(outcome: crate::Result<()>) -> Response {
    match outcome {
        Ok(()) => no_store(StatusCode::NO_CONTENT.into_response()),
        Err(err) => failure_response(&err),
    }
}

fn simulation_args_from_payload(payload: SimulatePayload, mut args: SimulateArgs) -> SimulateArgs {
    if let Some(v) = payload.start_net_worth {
        args.start_net_worth = v;
    }
    if let Some(v) = payload.base_rate {
        args.base_rate = v;
    }
    if let Some(v) = payload.inflation {
        args.inflation = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.contribution = Some(v);
    }
    args
}

fn simulate_response(
    payload: SimulatePayload,
    defaults: SimulateArgs,
) -> Result<SimulateResponse, String> {
    simulate_response_with(payload, defaults, &ScenarioConfig::default())
}

fn simulate_response_with(
    payload: SimulatePayload,
    defaults: SimulateArgs,
    config: &ScenarioConfig,
) -> Result<SimulateResponse, String> {
    let args = simulation_args_from_payload(payload, defaults);
    let inputs = build_simulation_inputs(&args)?;
    let set = run_scenarios(&inputs, config);

    Ok(SimulateResponse {
        start_net_worth: inputs.start_net_worth,
        monthly_contribution: inputs.monthly_contribution,
        years: inputs.years,
        projected_real_wealth: set.projected_real_wealth(),
        projections: set.projections,
    })
}

fn dashboard_response(ledger: &Ledger) -> DashboardResponse {
    DashboardResponse {
        metrics: ledger.metrics(),
        monthly_cashflow: monthly_cashflow(&ledger.cashflow),
        asset_allocation: asset_allocation(&ledger.assets),
        expenses_by_category: expenses_by_category(&ledger.cashflow),
        goals: active_goal_progress(&ledger.goals),
    }
}

fn forecast_response(payload: ForecastPayload, planner: &PlannerConfig) -> ForecastResponse {
    let offsets = payload
        .offsets
        .unwrap_or_else(|| planner.forecast_offsets.clone());
    let trajectory = classify_trajectory(&payload.history);

    ForecastResponse {
        forecast: forecast(&payload.history, &offsets),
        trajectory,
        trajectory_message: trajectory.message(),
    }
}

fn planner_with_target(planner: &PlannerConfig, target: Option<f64>) -> Result<PlannerConfig, String> {
    match target {
        None => Ok(planner.clone()),
        Some(t) if t.is_finite() && t > 0.0 => Ok(PlannerConfig {
            target_net_worth: t,
            ..planner.clone()
        }),
        Some(_) => Err("target must be > 0".to_string()),
    }
}

fn target_response(
    payload: TargetPayload,
    planner: &PlannerConfig,
    today: NaiveDate,
) -> Result<TargetResponse, String> {
    if !payload.current_net_worth.is_finite() || !payload.monthly_cashflow.is_finite() {
        return Err("currentNetWorth and monthlyCashflow must be finite numbers".to_string());
    }
    let config = planner_with_target(planner, payload.target)?;
    let months = months_to_target(
        payload.current_net_worth,
        payload.monthly_cashflow.max(0.0),
        config.target_net_worth,
    );

    Ok(TargetResponse {
        months_to_target: months.is_finite().then_some(months),
        target_eta: target_eta(months, today),
    })
}

#[cfg(test)]
fn simulate_payload_from_json(json: &str) -> Result<SimulatePayload, String> {
    serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))
}
