use std::time::Instant;

use crate::simulation::forces::{Forcing, NeighborForce, NeighborScoped, PairwiseForce};
use crate::simulation::integrator::SchemeKind;
use crate::simulation::scenario::GranularContact;
use crate::simulation::states::NVec3;
use crate::simulation::step_handler::AdditiveStepHandler;
use crate::simulation::system::System;

fn demo_contact() -> GranularContact {
    GranularContact {
        k: 1000.0,
        m: 1.0,
        g: 0.2,
        gamma_c: 0.05,
        r_part: 0.1,
    }
}

// deterministic scattered positions, no rand needed
fn scatter(n: usize) -> Vec<NVec3> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            )
        })
        .collect()
}

/// Compare all-pairs (serial and parallel) against neighbor-list-scoped
/// force aggregation across system sizes.
pub fn bench_forces() {
    let ns = [200, 400, 800, 1600, 3200];

    for n in ns {
        let x = scatter(n);
        let v = vec![NVec3::zeros(); n];
        let mut out = vec![NVec3::zeros(); n];

        let contact = demo_contact();
        let serial = PairwiseForce::serial(&contact);
        let parallel = PairwiseForce::new(&contact);
        let mut scoped = NeighborForce::new(&contact, n, 1.0);
        scoped.rebuild_neighbors(&x);

        // Warm up the rayon pool
        parallel.accumulate_accels(0.0, &x, &v, &mut out);

        let t0 = Instant::now();
        serial.accumulate_accels(0.0, &x, &v, &mut out);
        let dt_serial = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        parallel.accumulate_accels(0.0, &x, &v, &mut out);
        let dt_parallel = t1.elapsed().as_secs_f64();

        let t2 = Instant::now();
        scoped.accumulate_accels(0.0, &x, &v, &mut out);
        let dt_scoped = t2.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, serial = {dt_serial:8.6} s, parallel = {dt_parallel:8.6} s, neighbors = {dt_scoped:8.6} s"
        );
    }
}

/// Time full integration steps for each scheme at a fixed system size.
pub fn bench_step() {
    let n = 800;
    let n_steps = 100;
    let dt = 0.001;

    let schemes = [
        ("forward_euler", SchemeKind::ForwardEuler),
        ("velocity_verlet", SchemeKind::VelocityVerlet),
        ("velocity_verlet_half", SchemeKind::VelocityVerletHalf),
    ];

    for (name, kind) in schemes {
        let contact = demo_contact();
        let handler = AdditiveStepHandler;
        let forces = PairwiseForce::new(&contact);
        let mut system = System::new(
            scatter(n),
            vec![NVec3::zeros(); n],
            0.0,
            kind,
            forces,
            &handler,
        )
        .expect("equal-length buffers");

        let t0 = Instant::now();
        for _ in 0..n_steps {
            system.do_step(dt);
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "scheme = {name:20}, {n_steps} steps of N = {n}: {elapsed:8.6} s ({:.2e} s/step)",
            elapsed / n_steps as f64
        );
    }
}
