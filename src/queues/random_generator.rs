use rand::distributions::Distribution;
use rand::Rng;
use serde::Serialize;

use crate::distribution::{FastLaneService, InterArrival, OverflowService};
use crate::error::{Result, SimError};
use crate::queues::{Arrival, ArrivalSource, FAST_GROUP, OVERFLOW_GROUP};

/// Parameters of the random workload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RandomParams {
    pub lambda: f64,
    pub a2l: f64,
    pub a2u: f64,
    /// Probability that a job is routed to the fast group.
    pub p0: f64,
    pub alpha0: f64,
    pub beta0: f64,
    pub eta0: f64,
    pub alpha1: f64,
    pub eta1: f64,
}

/// Arrivals drawn from `rng`; stops after `horizon` if one is set.
pub struct RandomGenerator<R> where R: Rng {
    rng: R,
    p0: f64,
    iat_distribution: InterArrival,
    fast_service: FastLaneService,
    overflow_service: OverflowService,
    horizon: Option<f64>,
    next_exit: f64,
    exhausted: bool,
}

impl<R> RandomGenerator<R> where R: Rng {
    pub fn new(params: &RandomParams, horizon: Option<f64>, rng: R) -> Result<Self> {
        if !(0. ..=1.).contains(&params.p0) {
            return Err(SimError::InvalidParameter(format!("p0 must lie in [0, 1], got {}", params.p0)));
        }
        if let Some(end) = horizon {
            if !(end.is_finite() && end >= 0.) {
                return Err(SimError::InvalidParameter(format!("horizon must be finite and non-negative, got {}", end)));
            }
        }
        Ok(RandomGenerator {
            rng,
            p0: params.p0,
            iat_distribution: InterArrival::new(params.lambda, params.a2l, params.a2u)?,
            fast_service: FastLaneService::new(params.alpha0, params.beta0, params.eta0)?,
            overflow_service: OverflowService::new(params.alpha1, params.eta1)?,
            horizon,
            next_exit: 0.,
            exhausted: false,
        })
    }
}

impl<R> ArrivalSource for RandomGenerator<R> where R: Rng {
    fn next_arrival(&mut self) -> Result<Option<Arrival>> {
        if self.exhausted {
            return Ok(None);
        }
        let t = self.next_exit + self.iat_distribution.sample(&mut self.rng);
        if let Some(end) = self.horizon {
            if t > end {
                self.exhausted = true;
                return Ok(None);
            }
        }
        self.next_exit = t;

        let group = if self.rng.gen::<f64>() < self.p0 { FAST_GROUP } else { OVERFLOW_GROUP };
        let service_time = if group == FAST_GROUP {
            self.fast_service.sample(&mut self.rng)
        } else {
            self.overflow_service.sample(&mut self.rng)
        };
        Ok(Some(Arrival::new(t, service_time, group)))
    }
}
