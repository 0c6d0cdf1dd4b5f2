//! Command-line runner for the turret demo scenario.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use bulwark_sim::exporters::JsonLinesSink;
use bulwark_sim::scenario::BUNDLED_SCENARIO;
use bulwark_sim::{ScenarioConfig, SimError, Simulation};

#[derive(Parser, Debug)]
#[command(name = "bulwark-sim", about = "Deterministic turret control demo")]
struct Args {
    /// Scenario file. Uses the bundled demo scenario when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,
    /// Override the number of ticks
    #[arg(long)]
    ticks: Option<u64>,
    /// Override the time step (seconds)
    #[arg(long)]
    dt: Option<f64>,
    /// Write one JSON telemetry snapshot per tick to this file
    #[arg(long)]
    telemetry: Option<PathBuf>,
    /// Drive the adaptive tuning loop with the shaped reward
    #[arg(long)]
    adaptive: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bulwark_sim=info,bulwark_turret=info".into()),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let mut scenario = match &args.config {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::from_toml_str(BUNDLED_SCENARIO)?,
    };
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }
    if let Some(dt) = args.dt {
        scenario.dt = dt;
    }
    scenario.adaptive |= args.adaptive;

    let mut simulation = Simulation::new(scenario)?;
    if let Some(path) = &args.telemetry {
        let file = File::create(path).map_err(|source| SimError::TelemetryIo {
            path: path.clone(),
            source,
        })?;
        simulation.add_telemetry_sink(JsonLinesSink::new(BufWriter::new(file)));
    }

    let scenario = simulation.scenario();
    info!(
        seed = scenario.seed,
        ticks = scenario.ticks,
        dt = scenario.dt,
        contacts = simulation.world().len(),
        "starting turret simulation"
    );

    let ticks = scenario.ticks;
    simulation.run(ticks, |report| info!("{}", report.status));
    simulation.finish();

    let tunables = simulation.turret().state().tunables();
    info!(
        time = simulation.time(),
        cooldown_scale = tunables.cooldown_scale,
        threat_bias = tunables.threat_bias,
        "simulation finished"
    );
    Ok(())
}
