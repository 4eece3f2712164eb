use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::core::config::{
    DEFAULT_SCENARIO_SPREAD, DEFAULT_TARGET_NET_WORTH, FALLBACK_MONTHLY_CONTRIBUTION,
};
use crate::core::{
    Clock, FixedClock, Ledger, PlannerConfig, ScenarioConfig, SimulationInputs, SystemClock,
    build_oracle, build_statement, run_scenarios,
};

#[derive(Parser, Debug)]
#[command(
    name = "kairos",
    about = "Net worth metrics, trend forecasts and inflation-adjusted wealth scenarios"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value_t = DEFAULT_TARGET_NET_WORTH, help = "Net worth target")]
        target: f64,
        #[arg(
            long,
            default_value_t = DEFAULT_SCENARIO_SPREAD,
            help = "Percentage points between the realistic and the bear/bull scenarios"
        )]
        spread: f64,
    },
    /// Print headline metrics for a ledger file.
    Metrics {
        #[arg(long)]
        ledger: PathBuf,
    },
    /// Print trend forecast, trajectory and time to target for a ledger file.
    Oracle {
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long, default_value_t = DEFAULT_TARGET_NET_WORTH, help = "Net worth target")]
        target: f64,
        #[arg(long, help = "Override today's date (YYYY-MM-DD)")]
        today: Option<NaiveDate>,
    },
    /// Print pessimistic, realistic and optimistic wealth trajectories.
    Simulate(SimulateArgs),
    /// Print the monthly closing statement for a ledger file.
    Statement {
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long, default_value = "operator")]
        user: String,
        #[arg(long, help = "Override today's date (YYYY-MM-DD)")]
        today: Option<NaiveDate>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SimulateArgs {
    #[arg(
        long,
        visible_alias = "start",
        default_value_t = 0.0,
        allow_hyphen_values = true
    )]
    pub start_net_worth: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Base annual return in percent, between 1 and 15"
    )]
    pub base_rate: f64,
    #[arg(
        long,
        default_value_t = 2.5,
        help = "Annual inflation in percent, between 0 and 10"
    )]
    pub inflation: f64,
    #[arg(long, default_value_t = 15, help = "Timeframe in years, between 5 and 40")]
    pub years: u32,
    #[arg(long, help = "Monthly contribution, between 0 and 5000; defaults to 500")]
    pub contribution: Option<f64>,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        SimulateArgs {
            start_net_worth: 0.0,
            base_rate: 7.0,
            inflation: 2.5,
            years: 15,
            contribution: None,
        }
    }
}

pub fn build_simulation_inputs(args: &SimulateArgs) -> Result<SimulationInputs, String> {
    if !args.start_net_worth.is_finite() {
        return Err("--start-net-worth must be a finite number".to_string());
    }

    if !(1.0..=15.0).contains(&args.base_rate) {
        return Err("--base-rate must be between 1 and 15".to_string());
    }

    if !(0.0..=10.0).contains(&args.inflation) {
        return Err("--inflation must be between 0 and 10".to_string());
    }

    if !(5..=40).contains(&args.years) {
        return Err("--years must be between 5 and 40".to_string());
    }

    let contribution = args.contribution.unwrap_or(FALLBACK_MONTHLY_CONTRIBUTION);
    if !(0.0..=5_000.0).contains(&contribution) {
        return Err("--contribution must be between 0 and 5000".to_string());
    }

    Ok(SimulationInputs {
        start_net_worth: args.start_net_worth,
        base_annual_rate: args.base_rate,
        inflation_rate: args.inflation,
        years: args.years,
        monthly_contribution: contribution,
    })
}

fn planner_config(target: f64) -> Result<PlannerConfig, String> {
    if !target.is_finite() || target <= 0.0 {
        return Err("--target must be > 0".to_string());
    }
    Ok(PlannerConfig {
        target_net_worth: target,
        ..PlannerConfig::default()
    })
}

fn scenario_config(spread: f64) -> Result<ScenarioConfig, String> {
    if !spread.is_finite() || spread < 0.0 {
        return Err("--spread must be >= 0".to_string());
    }
    Ok(ScenarioConfig { spread })
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    match today {
        Some(date) => FixedClock(date).today(),
        None => SystemClock.today(),
    }
}

fn load_ledger(path: &Path) -> Result<Ledger, String> {
    Ledger::from_json_file(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to encode output: {e}"))
}

pub async fn run_cli(cli: Cli) -> Result<(), String> {
    let output = match cli.command {
        Command::Serve {
            port,
            target,
            spread,
        } => {
            let planner = planner_config(target)?;
            let scenarios = scenario_config(spread)?;
            return super::run_http_server(port, planner, scenarios)
                .await
                .map_err(|e| format!("server error: {e}"));
        }
        Command::Metrics { ledger } => to_json(&load_ledger(&ledger)?.metrics())?,
        Command::Oracle {
            ledger,
            target,
            today,
        } => {
            let config = planner_config(target)?;
            let ledger = load_ledger(&ledger)?;
            let report = build_oracle(
                &ledger.metrics(),
                &ledger.history,
                resolve_today(today),
                &config,
            );
            to_json(&report)?
        }
        Command::Simulate(args) => {
            let inputs = build_simulation_inputs(&args)?;
            to_json(&run_scenarios(&inputs, &ScenarioConfig::default()))?
        }
        Command::Statement {
            ledger,
            user,
            today,
        } => {
            let ledger = load_ledger(&ledger)?;
            let statement = build_statement(
                &user,
                &ledger.metrics(),
                &ledger.assets,
                &ledger.cashflow,
                resolve_today(today),
            );
            to_json(&statement)?
        }
    };

    println!("{output}");
    Ok(())
}
