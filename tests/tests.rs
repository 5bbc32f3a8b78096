use std::sync::atomic::{AtomicUsize, Ordering};

use timestep::{
    AdditiveRotationalStepHandler, AdditiveStepHandler, BinaryAcceleration, Error, Forcing,
    GranularContact, NVec3, NeighborForce, NeighborScoped, PairwiseForce, RotationalSchemeKind,
    RotationalSystem, RotationalUnaryAcceleration, RotationalUnaryForce, SchemeKind, StepHandler,
    System, UnaryAcceleration, UnaryForce,
};

/// Force-free particle, for exactness checks
struct FreeParticle;

impl UnaryAcceleration<f64> for FreeParticle {
    fn compute_acceleration(&self, _i: usize, _x: &[f64], _v: &[f64], _t: f64) -> f64 {
        0.0
    }
}

/// Constant acceleration field
struct ConstantAcceleration(f64);

impl UnaryAcceleration<f64> for ConstantAcceleration {
    fn compute_acceleration(&self, _i: usize, _x: &[f64], _v: &[f64], _t: f64) -> f64 {
        self.0
    }
}

/// Critically damped driven oscillator from the regression scenario:
/// a = (g - gamma_d v - k x) / m
struct DampedOscillator {
    k: f64,
    m: f64,
    gamma_d: f64,
    g: f64,
}

impl UnaryAcceleration<f64> for DampedOscillator {
    fn compute_acceleration(&self, i: usize, x: &[f64], v: &[f64], _t: f64) -> f64 {
        (self.g - self.gamma_d * v[i] - self.k * x[i]) / self.m
    }
}

/// Undamped oscillator a = -k x, exact solution x = x0 cos(sqrt(k) t)
struct UndampedOscillator {
    k: f64,
}

impl UnaryAcceleration<f64> for UndampedOscillator {
    fn compute_acceleration(&self, i: usize, x: &[f64], _v: &[f64], _t: f64) -> f64 {
        -self.k * x[i]
    }
}

/// Linear attractive spring between every pair; satisfies Newton's third law
struct SpringPair {
    k: f64,
}

impl BinaryAcceleration<NVec3> for SpringPair {
    fn compute_acceleration(&self, i: usize, j: usize, x: &[NVec3], _v: &[NVec3], _t: f64) -> NVec3 {
        (x[j] - x[i]) * self.k
    }
}

/// Zero pairwise force with a uniform external field
struct ExternalOnly {
    g: NVec3,
}

impl BinaryAcceleration<NVec3> for ExternalOnly {
    fn compute_acceleration(
        &self,
        _i: usize,
        _j: usize,
        _x: &[NVec3],
        _v: &[NVec3],
        _t: f64,
    ) -> NVec3 {
        NVec3::zeros()
    }

    fn compute_external(&self, _i: usize, _x: &[NVec3], _v: &[NVec3], _t: f64) -> Option<NVec3> {
        Some(self.g)
    }
}

/// Torque-free rotational law with constant linear and angular acceleration
struct ConstantSpin {
    a: f64,
    alpha: f64,
}

impl RotationalUnaryAcceleration<f64> for ConstantSpin {
    fn compute_acceleration(
        &self,
        _i: usize,
        _x: &[f64],
        _v: &[f64],
        _theta: &[f64],
        _omega: &[f64],
        _t: f64,
    ) -> (f64, f64) {
        (self.a, self.alpha)
    }
}

fn demo_contact() -> GranularContact {
    GranularContact {
        k: 1000.0,
        m: 1.0,
        g: 0.2,
        gamma_c: 0.05,
        r_part: 0.1,
    }
}

/// Deterministic scattered positions within a few length units
fn scatter(n: usize) -> Vec<NVec3> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec3::new(
                (i_f * 0.37).sin() * 2.0,
                (i_f * 0.13).cos() * 2.0,
                (i_f * 0.07).sin() * 2.0,
            )
        })
        .collect()
}

const SCHEMES: [SchemeKind; 3] = [
    SchemeKind::ForwardEuler,
    SchemeKind::VelocityVerlet,
    SchemeKind::VelocityVerletHalf,
];

// ==================================================================================
// Integration scheme tests
// ==================================================================================

#[test]
fn free_particle_moves_linearly_under_all_schemes() {
    for kind in SCHEMES {
        let law = FreeParticle;
        let handler = AdditiveStepHandler;
        let mut sys = System::new(
            vec![0.25],
            vec![0.7],
            0.0,
            kind,
            UnaryForce::new(&law),
            &handler,
        )
        .unwrap();

        let dt = 0.1;
        for _ in 0..10 {
            sys.do_step(dt);
        }

        let expected = 0.25 + 0.7 * 10.0 * dt;
        assert!(
            (sys.get_x()[0] - expected).abs() < 1e-12,
            "{kind:?}: x = {}, expected {expected}",
            sys.get_x()[0]
        );
        assert!((sys.time() - 1.0).abs() < 1e-12, "{kind:?}: clock drifted");
    }
}

#[test]
fn forward_euler_matches_damped_oscillator_solution() {
    let dt = 0.1;
    let t_tot = 5.0;
    let k: f64 = 10.0;
    let m: f64 = 1.0;
    let g = 1.0;
    let gamma_d = 2.0 * (m * k).sqrt(); // critically damped
    let omega_0 = (k / m).sqrt();
    let n_steps = (t_tot / dt) as usize;

    let law = DampedOscillator { k, m, gamma_d, g };
    let handler = AdditiveStepHandler;
    let mut sys = System::new(
        vec![0.0],
        vec![0.0],
        0.0,
        SchemeKind::ForwardEuler,
        UnaryForce::new(&law),
        &handler,
    )
    .unwrap();

    let mut sq_sum = 0.0;
    for _ in 0..n_steps {
        sys.do_step(dt);
        let t = sys.time();
        let exact = g / k * (1.0 - (-omega_0 * t).exp() * (omega_0 * t + 1.0));
        let err = sys.get_x()[0] - exact;
        sq_sum += err * err;
    }

    let l2 = sq_sum.sqrt();
    assert!(
        l2 <= 0.0152767 * 1.05,
        "L2 error {l2} exceeds regression bound"
    );
}

/// dt-weighted L2 error of the undamped oscillator over [0, t_tot]
fn undamped_l2_error(kind: SchemeKind, dt: f64, t_tot: f64) -> f64 {
    let k: f64 = 10.0;
    let omega_0 = k.sqrt();
    let n_steps = (t_tot / dt).round() as usize;

    let law = UndampedOscillator { k };
    let handler = AdditiveStepHandler;
    let mut sys = System::new(
        vec![1.0],
        vec![0.0],
        0.0,
        kind,
        UnaryForce::new(&law),
        &handler,
    )
    .unwrap();

    let mut sq_sum = 0.0;
    for _ in 0..n_steps {
        sys.do_step(dt);
        let err = sys.get_x()[0] - (omega_0 * sys.time()).cos();
        sq_sum += err * err;
    }
    (dt * sq_sum).sqrt()
}

#[test]
fn forward_euler_converges_first_order() {
    let coarse = undamped_l2_error(SchemeKind::ForwardEuler, 0.01, 2.0);
    let fine = undamped_l2_error(SchemeKind::ForwardEuler, 0.005, 2.0);
    let ratio = coarse / fine;
    assert!(
        (1.7..2.4).contains(&ratio),
        "expected ~2x error reduction, got {ratio}"
    );
}

#[test]
fn velocity_verlet_variants_converge_second_order() {
    for kind in [SchemeKind::VelocityVerlet, SchemeKind::VelocityVerletHalf] {
        let coarse = undamped_l2_error(kind, 0.01, 2.0);
        let fine = undamped_l2_error(kind, 0.005, 2.0);
        let ratio = coarse / fine;
        assert!(
            (3.5..4.5).contains(&ratio),
            "{kind:?}: expected ~4x error reduction, got {ratio}"
        );
    }
}

#[test]
fn half_step_verlet_applies_half_kick_exactly_once() {
    let a = 2.0;
    let dt = 0.1;
    let law = ConstantAcceleration(a);
    let handler = AdditiveStepHandler;
    let mut sys = System::new(
        vec![0.0],
        vec![1.0],
        0.0,
        SchemeKind::VelocityVerletHalf,
        UnaryForce::new(&law),
        &handler,
    )
    .unwrap();

    // First step: one backward half-kick, then the regular kick
    sys.do_step(dt);
    let expected_first = 1.0 - 0.5 * a * dt + a * dt;
    assert!((sys.get_v()[0] - expected_first).abs() < 1e-12);

    // Second step must not repeat the half-kick
    sys.do_step(dt);
    let expected_second = expected_first + a * dt;
    assert!((sys.get_v()[0] - expected_second).abs() < 1e-12);
}

// ==================================================================================
// Force aggregation tests
// ==================================================================================

#[test]
fn all_pairs_and_neighbor_list_aggregation_agree() {
    let n = 8;
    let x = scatter(n);
    let v: Vec<NVec3> = (0..n).map(|i| NVec3::new(0.01 * i as f64, 0.0, 0.0)).collect();

    let contact = demo_contact();
    let direct = PairwiseForce::serial(&contact);
    // Cutoff far beyond every pairwise distance in the configuration
    let mut scoped = NeighborForce::new(&contact, n, 100.0);
    scoped.rebuild_neighbors(&x);

    let mut a_direct = vec![NVec3::zeros(); n];
    let mut a_scoped = vec![NVec3::zeros(); n];
    direct.accumulate_accels(0.0, &x, &v, &mut a_direct);
    scoped.accumulate_accels(0.0, &x, &v, &mut a_scoped);

    for i in 0..n {
        assert!(
            (a_direct[i] - a_scoped[i]).norm() < 1e-12,
            "particle {i}: direct {:?} vs scoped {:?}",
            a_direct[i],
            a_scoped[i]
        );
    }
}

#[test]
fn serial_and_parallel_aggregation_agree() {
    let n = 16;
    let x = scatter(n);
    let v = vec![NVec3::zeros(); n];

    let contact = demo_contact();
    let serial = PairwiseForce::serial(&contact);
    let parallel = PairwiseForce::new(&contact);

    let mut a_serial = vec![NVec3::zeros(); n];
    let mut a_parallel = vec![NVec3::zeros(); n];
    serial.accumulate_accels(0.0, &x, &v, &mut a_serial);
    parallel.accumulate_accels(0.0, &x, &v, &mut a_parallel);

    for i in 0..n {
        assert!((a_serial[i] - a_parallel[i]).norm() < 1e-12);
    }
}

#[test]
fn external_unary_term_reaches_every_particle_once() {
    let n = 5;
    let law = ExternalOnly {
        g: NVec3::new(0.0, -9.81, 0.0),
    };
    let forces = PairwiseForce::new(&law);

    let x = scatter(n);
    let v = vec![NVec3::zeros(); n];
    let mut a = vec![NVec3::zeros(); n];
    forces.accumulate_accels(0.0, &x, &v, &mut a);

    for ai in &a {
        assert!((*ai - NVec3::new(0.0, -9.81, 0.0)).norm() < 1e-15);
    }
}

#[test]
fn momentum_conserved_under_pairwise_forces() {
    // SpringPair satisfies handler(i,j) == -handler(j,i); with equal masses
    // the total momentum must stay put under both aggregation modes
    let n = 6;
    let x0 = scatter(n);
    let v0: Vec<NVec3> = (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec3::new((i_f * 0.9).cos() * 0.3, (i_f * 1.7).sin() * 0.3, 0.1 * i_f)
        })
        .collect();
    let p0: NVec3 = v0.iter().sum();

    let spring = SpringPair { k: 50.0 };
    let handler = AdditiveStepHandler;

    for parallel in [false, true] {
        let forces = if parallel {
            PairwiseForce::new(&spring)
        } else {
            PairwiseForce::serial(&spring)
        };
        let mut sys = System::new(
            x0.clone(),
            v0.clone(),
            0.0,
            SchemeKind::VelocityVerletHalf,
            forces,
            &handler,
        )
        .unwrap();

        for _ in 0..500 {
            sys.do_step(1e-3);
        }

        let p: NVec3 = sys.get_v().iter().sum();
        assert!(
            (p - p0).norm() < 1e-9,
            "parallel = {parallel}: momentum drifted by {}",
            (p - p0).norm()
        );
    }
}

// ==================================================================================
// Neighbor list tests
// ==================================================================================

#[test]
fn neighbor_list_rebuild_respects_cutoff() {
    let contact = demo_contact();
    let handler = AdditiveStepHandler;
    let x0 = vec![
        NVec3::new(0.0, 0.0, 0.0),
        NVec3::new(0.5, 0.0, 0.0),
        NVec3::new(10.0, 0.0, 0.0),
    ];
    let v0 = vec![NVec3::zeros(); 3];

    let forces = NeighborForce::new(&contact, 3, 1.0);
    let mut sys = System::new(
        x0,
        v0,
        0.0,
        SchemeKind::ForwardEuler,
        forces,
        &handler,
    )
    .unwrap();

    sys.update_neighbor_list();

    let list = sys.forces().neighbor_list();
    assert_eq!(list.neighbors_of(0), &[1]);
    assert_eq!(list.neighbors_of(1), &[0]);
    assert!(list.neighbors_of(2).is_empty());
}

// ==================================================================================
// System construction tests
// ==================================================================================

#[test]
fn mismatched_buffers_are_rejected() {
    let law = FreeParticle;
    let handler = AdditiveStepHandler;
    let result = System::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0, 1.0],
        0.0,
        SchemeKind::ForwardEuler,
        UnaryForce::new(&law),
        &handler,
    );

    assert!(matches!(
        result,
        Err(Error::SizeMismatch { context: "System::new", .. })
    ));
}

#[test]
fn rotational_mismatched_buffers_are_rejected() {
    let law = ConstantSpin { a: 0.0, alpha: 0.0 };
    let handler = AdditiveRotationalStepHandler;
    let result = RotationalSystem::new(
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0],
        vec![0.0, 1.0],
        0.0,
        RotationalSchemeKind::ForwardEuler,
        RotationalUnaryForce::new(&law),
        &handler,
    );

    assert!(matches!(result, Err(Error::SizeMismatch { .. })));
}

/// Step handler that counts increments while performing plain addition
struct CountingHandler {
    x_incs: AtomicUsize,
    v_incs: AtomicUsize,
}

impl StepHandler<f64> for CountingHandler {
    fn increment_x(&self, n: usize, dx: f64, x: &mut [f64], _v: &[f64]) {
        self.x_incs.fetch_add(1, Ordering::Relaxed);
        x[n] += dx;
    }

    fn increment_v(&self, n: usize, dv: f64, _x: &[f64], v: &mut [f64]) {
        self.v_incs.fetch_add(1, Ordering::Relaxed);
        v[n] += dv;
    }
}

#[test]
fn custom_step_handler_observes_every_increment() {
    let law = ConstantAcceleration(1.0);
    let handler = CountingHandler {
        x_incs: AtomicUsize::new(0),
        v_incs: AtomicUsize::new(0),
    };
    let n = 3;
    let steps = 5;

    let mut sys = System::new(
        vec![0.0; n],
        vec![0.0; n],
        0.0,
        SchemeKind::ForwardEuler,
        UnaryForce::new(&law),
        &handler,
    )
    .unwrap();

    for _ in 0..steps {
        sys.do_step(0.01);
    }

    assert_eq!(handler.x_incs.load(Ordering::Relaxed), n * steps);
    assert_eq!(handler.v_incs.load(Ordering::Relaxed), n * steps);
}

// ==================================================================================
// Rotational system tests
// ==================================================================================

#[test]
fn torque_free_rotation_advances_linearly() {
    for kind in [
        RotationalSchemeKind::ForwardEuler,
        RotationalSchemeKind::VelocityVerletHalf,
    ] {
        let law = ConstantSpin { a: 0.0, alpha: 0.0 };
        let handler = AdditiveRotationalStepHandler;
        let mut sys = RotationalSystem::new(
            vec![0.0],
            vec![0.5],
            vec![1.0],
            vec![2.0],
            0.0,
            kind,
            RotationalUnaryForce::new(&law),
            &handler,
        )
        .unwrap();

        let dt = 0.1;
        for _ in 0..10 {
            sys.do_step(dt);
        }

        assert!((sys.get_x()[0] - 0.5).abs() < 1e-12, "{kind:?}: x drifted");
        assert!(
            (sys.get_theta()[0] - (1.0 + 2.0)).abs() < 1e-12,
            "{kind:?}: theta drifted"
        );
        assert!(
            (sys.get_omega()[0] - 2.0).abs() < 1e-12,
            "{kind:?}: omega drifted"
        );
    }
}

#[test]
fn rotational_half_kick_applied_exactly_once() {
    let a = 1.0;
    let alpha = 2.0;
    let dt = 0.1;
    let law = ConstantSpin { a, alpha };
    let handler = AdditiveRotationalStepHandler;
    let mut sys = RotationalSystem::new(
        vec![0.0],
        vec![0.0],
        vec![0.0],
        vec![0.0],
        0.0,
        RotationalSchemeKind::VelocityVerletHalf,
        RotationalUnaryForce::new(&law),
        &handler,
    )
    .unwrap();

    sys.do_step(dt);
    assert!((sys.get_v()[0] - 0.5 * a * dt).abs() < 1e-12);
    assert!((sys.get_omega()[0] - 0.5 * alpha * dt).abs() < 1e-12);

    sys.do_step(dt);
    assert!((sys.get_v()[0] - 1.5 * a * dt).abs() < 1e-12);
    assert!((sys.get_omega()[0] - 1.5 * alpha * dt).abs() < 1e-12);
}
