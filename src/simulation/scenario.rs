//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! consumed by the driver: engine settings ([`Engine`]), numerical
//! parameters ([`Parameters`]), and the initial state buffers. Also defines
//! the demo physics, a spring-dashpot granular contact law with constant
//! pairwise attraction, that the driver binds to the engine. The contact
//! law lives here, on the caller side of the evaluator boundary, the same
//! way any user-supplied physics model would.

use nalgebra::Vector3;

use crate::configuration::config::{ScenarioConfig, SchemeConfig};
use crate::simulation::engine::Engine;
use crate::simulation::forces::BinaryAcceleration;
use crate::simulation::integrator::SchemeKind;
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec3;

/// Spring-dashpot contact with constant pairwise attraction.
///
/// Two particles closer than `2 r_part` overlap and feel a linear repulsive
/// spring force plus normal damping; every pair feels a constant attraction
/// of magnitude `g` along the separation direction. Satisfies Newton's third
/// law, so total momentum is conserved under aggregation.
pub struct GranularContact {
    pub k: f64,       // contact stiffness
    pub m: f64,       // particle mass
    pub g: f64,       // attraction acceleration
    pub gamma_c: f64, // contact damping coefficient
    pub r_part: f64,  // particle radius
}

impl GranularContact {
    fn elasticity(&self, xi: NVec3, xj: NVec3, vi: NVec3, vj: NVec3) -> NVec3 {
        let distance = xj - xi;
        let distance_norm = distance.norm();
        let overlap = distance_norm - 2.0 * self.r_part;

        if overlap >= 0.0 {
            return Vector3::zeros();
        }

        let n = distance / distance_norm;
        let normal_relative_velocity = (vj - vi).dot(&n);

        n * (self.k * overlap + self.gamma_c * normal_relative_velocity)
    }

    fn attraction(&self, xi: NVec3, xj: NVec3) -> NVec3 {
        (xj - xi).normalize() * self.g
    }
}

impl BinaryAcceleration<NVec3> for GranularContact {
    fn compute_acceleration(&self, i: usize, j: usize, x: &[NVec3], v: &[NVec3], _t: f64) -> NVec3 {
        let (xi, xj) = (x[i], x[j]);

        // Coincident particles have no defined separation direction
        if (xj - xi).norm() == 0.0 {
            return Vector3::zeros();
        }

        (self.elasticity(xi, xj, v[i], v[j]) + self.attraction(xi, xj)) * (1.0 / self.m)
    }
}

/// Fully-initialized runtime scenario: engine settings, parameters, and the
/// initial state buffers the driver hands to a `System`.
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub x0: Vec<NVec3>,
    pub v0: Vec<NVec3>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Bodies: map `BodyConfig` -> nalgebra vectors
        let x0: Vec<NVec3> = cfg
            .bodies
            .iter()
            .map(|bc| NVec3::new(bc.x[0], bc.x[1], bc.x[2]))
            .collect();
        let v0: Vec<NVec3> = cfg
            .bodies
            .iter()
            .map(|bc| NVec3::new(bc.v[0], bc.v[1], bc.v[2]))
            .collect();

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            t_end: p_cfg.t_end,
            dt: p_cfg.dt,
            k: p_cfg.k,
            m: p_cfg.m,
            g: p_cfg.g,
            gamma_c: p_cfg.gamma_c,
            r_part: p_cfg.r_part,
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            scheme: match e_cfg.scheme {
                SchemeConfig::ForwardEuler => SchemeKind::ForwardEuler,
                SchemeConfig::VelocityVerlet => SchemeKind::VelocityVerlet,
                SchemeConfig::VelocityVerletHalf => SchemeKind::VelocityVerletHalf,
            },
            parallel: e_cfg.parallel,
            neighbors: e_cfg.neighbors,
            r_verlet: e_cfg.r_verlet.unwrap_or(4.0 * parameters.r_part),
            rebuild_period: e_cfg.rebuild_period.unwrap_or(100),
        };

        Self {
            engine,
            parameters,
            x0,
            v0,
        }
    }

    /// Contact law parametrized from this scenario. The caller owns the
    /// returned evaluator; it must outlive the system built around it.
    pub fn contact(&self) -> GranularContact {
        GranularContact {
            k: self.parameters.k,
            m: self.parameters.m,
            g: self.parameters.g,
            gamma_c: self.parameters.gamma_c,
            r_part: self.parameters.r_part,
        }
    }
}
