use rand::distributions::{Distribution, Open01, Uniform};
use rand::Rng;
use rand_distr::Exp;

use crate::error::{Result, SimError};

/// Times are carried with four decimals.
pub fn round4(x: f64) -> f64 {
    (x * 1e4).round() / 1e4
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0. {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter(format!("{} must be positive, got {}", name, value)))
    }
}

/// Exponential inter-arrival time stretched by a uniform factor.
#[derive(Clone, Debug)]
pub struct InterArrival {
    exp: Exp<f64>,
    stretch: Uniform<f64>,
}

impl InterArrival {
    pub fn new(lambda: f64, a2l: f64, a2u: f64) -> Result<Self> {
        let lambda = positive("lambda", lambda)?;
        if !(a2l.is_finite() && a2u.is_finite() && 0. <= a2l && a2l <= a2u) {
            return Err(SimError::InvalidParameter(format!("bad stretch range [{}, {}]", a2l, a2u)));
        }
        let exp = Exp::new(lambda).map_err(|e| SimError::InvalidParameter(e.to_string()))?;
        Ok(InterArrival { exp, stretch: Uniform::new_inclusive(a2l, a2u) })
    }
}

impl Distribution<f64> for InterArrival {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let a1 = self.exp.sample(rng);
        let a2 = self.stretch.sample(rng);
        round4(a1 * a2)
    }
}

/// Service time drawn for jobs routed to the fast group.
#[derive(Clone, Copy, Debug)]
pub struct FastLaneService {
    beta: f64,
    gamma: f64,
}

impl FastLaneService {
    pub fn new(alpha: f64, beta: f64, eta: f64) -> Result<Self> {
        let alpha = positive("alpha0", alpha)?;
        let beta = positive("beta0", beta)?;
        let gamma = alpha.powf(-eta) - beta.powf(-eta);
        Ok(FastLaneService { beta, gamma: positive("gamma0", gamma)? })
    }
}

impl Distribution<f64> for FastLaneService {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = Open01.sample(rng);
        round4(((self.beta / (self.gamma * u)).ln() / (self.beta + 1.)).exp())
    }
}

/// Service time drawn for jobs routed straight to the overflow group.
#[derive(Clone, Copy, Debug)]
pub struct OverflowService {
    eta: f64,
    gamma: f64,
}

impl OverflowService {
    pub fn new(alpha: f64, eta: f64) -> Result<Self> {
        let alpha = positive("alpha1", alpha)?;
        let eta = positive("eta1", eta)?;
        Ok(OverflowService { eta, gamma: alpha.powf(-eta) })
    }
}

impl Distribution<f64> for OverflowService {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = Open01.sample(rng);
        round4(((self.eta / (self.gamma * u)).ln() / (self.eta + 1.)).exp())
    }
}
