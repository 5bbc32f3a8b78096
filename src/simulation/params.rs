//! Numerical and physical parameters for a driver run
//!
//! `Parameters` holds runtime settings: integration step size and end time,
//! plus the coefficients of the demo granular contact law.

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64,   // time end
    pub dt: f64,      // step size
    pub k: f64,       // contact stiffness
    pub m: f64,       // particle mass
    pub g: f64,       // pairwise attraction acceleration
    pub gamma_c: f64, // contact damping coefficient
    pub r_part: f64,  // particle radius
}

impl Parameters {
    /// Number of steps covering [0, t_end]. Rounds so that a t_end that is
    /// not an exact multiple of dt does not drop the final step.
    pub fn n_steps(&self) -> usize {
        (self.t_end / self.dt).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(t_end: f64, dt: f64) -> Parameters {
        Parameters {
            t_end,
            dt,
            k: 1.0,
            m: 1.0,
            g: 0.0,
            gamma_c: 0.0,
            r_part: 0.5,
        }
    }

    #[test]
    fn step_count_covers_inexact_durations() {
        assert_eq!(params(1.0, 0.1).n_steps(), 10);
        assert_eq!(params(5.0, 0.05).n_steps(), 100);
        // 0.3 / 0.1 is 2.999... in binary; truncation would lose a step
        assert_eq!(params(0.3, 0.1).n_steps(), 3);
    }
}
