//! In-process parameter sweep: weighted mean response time for a fixed
//! workload as a function of the fast-group size and the run length.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::queues::random_generator::{RandomGenerator, RandomParams};
use crate::queues::tandem_network::{simulate, OverflowPolicy, SimulationConfig, StopCondition};
use crate::report::summarize;

#[derive(Clone, Debug, PartialEq)]
pub struct SweepParameters {
    pub total_servers: usize,
    pub time_limit: f64,
    pub workload: RandomParams,
    pub w0: f64,
    pub w1: f64,
    pub overflow: OverflowPolicy,
}

impl Default for SweepParameters {
    fn default() -> Self {
        SweepParameters {
            total_servers: 10,
            time_limit: 3.3,
            workload: RandomParams {
                lambda: 3.1, a2l: 0.85, a2u: 1.21,
                p0: 0.74,
                alpha0: 0.5, beta0: 5.7, eta0: 1.9,
                alpha1: 2.7, eta1: 2.5,
            },
            w0: 0.83,
            w1: 0.059,
            overflow: OverflowPolicy::Restart,
        }
    }
}

/// Runs exactly `jobs` generated jobs with `fast_servers` in the fast group.
pub fn weighted_response_time(params: &SweepParameters, fast_servers: usize, jobs: usize, seed: u64) -> Result<f64> {
    if fast_servers > params.total_servers {
        return Err(SimError::InvalidParameter(
            format!("{} fast servers out of {} in total", fast_servers, params.total_servers)));
    }
    let config = SimulationConfig::new(fast_servers, params.total_servers - fast_servers, params.time_limit)
        .with_overflow(params.overflow)
        .with_stop(StopCondition::Jobs(jobs));
    let mut source = RandomGenerator::new(&params.workload, None, StdRng::seed_from_u64(seed))?;

    let (finished, _) = simulate(config, &mut source)?;
    let weighted = summarize(&finished).weighted(params.w0, params.w1);
    debug!(fast_servers, jobs, seed, weighted, "sweep point");
    Ok(weighted)
}

/// Evaluates run lengths `1, 1 + step, ...` below `max_jobs`.
pub fn length_series(params: &SweepParameters, fast_servers: usize, seed: u64, max_jobs: usize, step: usize)
    -> Result<Vec<(usize, f64)>>
{
    if step == 0 {
        return Err(SimError::InvalidParameter("step must be positive".to_owned()));
    }
    (1..max_jobs).step_by(step)
        .map(|jobs| Ok((jobs, weighted_response_time(params, fast_servers, jobs, seed)?)))
        .collect()
}
