use timestep::{
    bench_forces, bench_step, AdditiveStepHandler, Forcing, GranularContact, NVec3, NeighborForce,
    NeighborScoped, PairwiseForce, Scenario, ScenarioConfig, System,
};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
struct Args {
    /// Path to a YAML scenario file
    #[arg(short, default_value = "scenarios/granular.yaml")]
    file_name: PathBuf,

    /// Run the aggregation/stepping benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(path: &PathBuf) -> Result<ScenarioConfig> {
    let file = File::open(path).with_context(|| format!("opening scenario {}", path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn kinetic_energy(v: &[NVec3], m: f64) -> f64 {
    v.iter().map(|vi| 0.5 * m * vi.norm_squared()).sum()
}

/// Shared step loop: advance to t_end, printing diagnostics at a fixed
/// cadence. `rebuild` is invoked before a step whenever the neighbor-list
/// rebuild cadence comes due (a no-op for direct aggregation).
fn run<F: Forcing<NVec3>>(
    mut system: System<NVec3, F, AdditiveStepHandler>,
    scenario: &Scenario,
    mut rebuild: impl FnMut(&mut System<NVec3, F, AdditiveStepHandler>),
) {
    let p = &scenario.parameters;
    let n_steps = p.n_steps();
    let n_dumps = 20;
    let dump_period = (n_steps / n_dumps).max(1);
    let rebuild_period = scenario.engine.rebuild_period.max(1);

    let wall = Instant::now();
    for step in 0..n_steps {
        if step % rebuild_period == 0 {
            rebuild(&mut system);
        }
        system.do_step(p.dt);

        if step % dump_period == 0 || step + 1 == n_steps {
            println!(
                "t = {:9.4}, E_kin = {:12.6e}, wall = {:8.3} s",
                system.time(),
                kinetic_energy(system.get_v(), p.m),
                wall.elapsed().as_secs_f64(),
            );
        }
    }
}

fn run_direct(scenario: &Scenario, contact: &GranularContact) -> Result<()> {
    let handler = AdditiveStepHandler;
    let forces = if scenario.engine.parallel {
        PairwiseForce::new(contact)
    } else {
        PairwiseForce::serial(contact)
    };

    let system = System::new(
        scenario.x0.clone(),
        scenario.v0.clone(),
        0.0,
        scenario.engine.scheme,
        forces,
        &handler,
    )?;

    run(system, scenario, |_| {});
    Ok(())
}

fn run_neighbors(scenario: &Scenario, contact: &GranularContact) -> Result<()> {
    let handler = AdditiveStepHandler;
    let mut forces = NeighborForce::new(contact, scenario.x0.len(), scenario.engine.r_verlet);

    // Both Verlet schemes evaluate forces during construction; seed the
    // neighbor list from the initial positions so that evaluation is not
    // scoped to empty lists
    forces.rebuild_neighbors(&scenario.x0);

    let system = System::new(
        scenario.x0.clone(),
        scenario.v0.clone(),
        0.0,
        scenario.engine.scheme,
        forces,
        &handler,
    )?;

    run(system, scenario, |sys| sys.update_neighbor_list());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_forces();
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg);
    let contact = scenario.contact();

    if scenario.engine.neighbors {
        run_neighbors(&scenario, &contact)?;
    } else {
        run_direct(&scenario, &contact)?;
    }

    Ok(())
}
