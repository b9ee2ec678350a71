use nbsim::{bench_integrators, build_scenario, Integrator, Preset, ScenarioConfig, SolarSystem};
use nbsim::{Engine, Parameters};

use anyhow::Result;
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Headless N-body gravity simulator")]
struct Args {
    /// Scenario file, looked up in ./scenarios when not found as given
    #[arg(short, long)]
    file: Option<String>,

    /// Built-in body set when no scenario file is given
    #[arg(long, default_value = "inner")]
    preset: String,

    /// euler | rk4 | leapfrog, overrides the scenario file
    #[arg(long)]
    integrator: Option<String>,

    /// Step size in seconds, overrides the scenario file
    #[arg(long)]
    time_step: Option<f64>,

    /// Number of steps to run
    #[arg(long, default_value_t = 365)]
    steps: u64,

    /// Simulated seconds to run instead of a step count
    #[arg(long)]
    duration: Option<f64>,

    /// Print every body's trail along with its final state
    #[arg(long)]
    trails: bool,

    /// Run the integrator benchmark and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_engine(args: &Args) -> Result<Engine> {
    let mut engine = match &args.file {
        Some(file_name) => {
            let mut path = PathBuf::from(file_name);
            if !path.exists() {
                path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
            }
            info!("loading scenario {}", path.display());
            build_scenario(ScenarioConfig::from_yaml_file(&path)?)?
        }
        None => {
            let preset: Preset = args.preset.parse()?;
            let mut engine = Engine::new(Parameters::default(), Integrator::default())?;
            engine.add_bodies(SolarSystem::default().bodies(preset)?)?;
            engine
        }
    };

    if let Some(name) = &args.integrator {
        engine.set_integration_method(name.parse()?);
    }
    if let Some(dt) = args.time_step {
        engine.set_time_step(dt)?;
    }
    Ok(engine)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        println!("n,integrator,force_evaluations,ms_per_step,energy_drift_percent");
        for r in bench_integrators(&[50, 100, 200, 400], 20)? {
            println!(
                "{},{},{},{:.6},{:.3e}",
                r.n, r.integrator, r.force_evaluations, r.ms_per_step, r.energy_drift_percent
            );
        }
        return Ok(());
    }

    let mut engine = load_engine(&args)?;
    info!(
        "{} bodies, integrator {}, dt = {} s",
        engine.bodies().len(),
        engine.integrator(),
        engine.parameters().h0
    );

    match args.duration {
        Some(duration) => engine.run_for_duration(duration)?,
        None => engine.run(args.steps)?,
    };

    for snap in engine.snapshots() {
        let p = snap.position;
        let v = snap.velocity;
        println!(
            "{:>10}  x = ({:+.4e}, {:+.4e}, {:+.4e})  v = ({:+.4e}, {:+.4e}, {:+.4e})",
            snap.name, p.x, p.y, p.z, v.x, v.y, v.z
        );
        if args.trails {
            for x in &snap.trail {
                println!("{:>10}  ({:+.4e}, {:+.4e}, {:+.4e})", "", x.x, x.y, x.z);
            }
        }
    }

    let analysis = engine.get_conservation_analysis()?;
    print!("{}", serde_yaml::to_string(&analysis)?);

    Ok(())
}
