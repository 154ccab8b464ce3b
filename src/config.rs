//! Loader for the per-test parameter files.
//!
//! A test `N` is described by four files in the config directory:
//!
//! * `mode_N.txt`: `random` or `trace`
//! * `para_N.txt`: total servers, fast-group servers, dwell-time cap and,
//!   in random mode, the arrival horizon (one value per line)
//! * `interarrival_N.txt`: gaps, one per line (trace), or `lambda a2l a2u` (random)
//! * `service_N.txt`: `service_time group` per line (trace), or `p0`,
//!   `alpha0 beta0 eta0` and `alpha1 eta1` on three lines (random)

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, SimError};
use crate::queues::random_generator::{RandomGenerator, RandomParams};
use crate::queues::tandem_network::{OverflowPolicy, SimulationConfig};
use crate::queues::trace_generator::TraceGenerator;
use crate::queues::{ArrivalSource, GroupId, NUM_GROUPS};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Workload {
    Trace { interarrivals: Vec<f64>, services: Vec<(f64, GroupId)> },
    Random { params: RandomParams, time_end: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TestConfig {
    pub test: String,
    pub total_servers: usize,
    pub fast_servers: usize,
    pub time_limit: f64,
    pub workload: Workload,
}

struct ConfigFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl ConfigFile {
    fn open(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name);
        let text = fs::read_to_string(&path)
            .map_err(|source| SimError::ConfigIo { path: path.clone(), source })?;
        let lines = text.lines().map(|l| l.trim().to_owned()).collect();
        Ok(ConfigFile { path, lines })
    }

    fn error(&self, line: usize, message: String) -> SimError {
        SimError::ConfigParse { path: self.path.clone(), line: line + 1, message }
    }

    fn line(&self, line: usize) -> Result<&str> {
        self.lines.get(line).map(|l| l.as_str())
            .ok_or_else(|| self.error(line, "missing line".to_owned()))
    }

    fn parse<T>(&self, line: usize, token: &str) -> Result<T> where T: FromStr {
        token.parse().map_err(|_| self.error(line, format!("cannot parse '{}'", token)))
    }

    fn value<T>(&self, line: usize) -> Result<T> where T: FromStr {
        let token = self.line(line)?;
        self.parse(line, token)
    }

    fn values<T>(&self, line: usize, n: usize) -> Result<Vec<T>> where T: FromStr {
        let tokens: Vec<&str> = self.line(line)?.split_whitespace().collect();
        if tokens.len() != n {
            return Err(self.error(line, format!("expected {} values, found {}", n, tokens.len())));
        }
        tokens.into_iter().map(|t| self.parse(line, t)).collect()
    }

    fn non_empty(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines.iter().enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, l)| (i, l.as_str()))
    }
}

impl TestConfig {
    pub fn load(dir: &Path, test: &str) -> Result<Self> {
        let mode = ConfigFile::open(dir, &format!("mode_{}.txt", test))?;
        let para = ConfigFile::open(dir, &format!("para_{}.txt", test))?;
        let interarrival = ConfigFile::open(dir, &format!("interarrival_{}.txt", test))?;
        let service = ConfigFile::open(dir, &format!("service_{}.txt", test))?;

        let total_servers: usize = para.value(0)?;
        let fast_servers: usize = para.value(1)?;
        if fast_servers > total_servers {
            return Err(para.error(1, format!("{} fast servers out of {} in total", fast_servers, total_servers)));
        }
        let time_limit: f64 = para.value(2)?;
        if !(time_limit >= 0.) {
            return Err(para.error(2, format!("dwell-time cap must be non-negative, got {}", time_limit)));
        }

        let workload = match mode.line(0)? {
            "trace" => load_trace(&interarrival, &service)?,
            "random" => {
                let [lambda, a2l, a2u]: [f64; 3] = three(interarrival.values(0, 3)?);
                let p0 = service.value(0)?;
                let [alpha0, beta0, eta0]: [f64; 3] = three(service.values(1, 3)?);
                let ab1: Vec<f64> = service.values(2, 2)?;
                let time_end: f64 = para.value(3)?;
                if !(time_end.is_finite() && time_end >= 0.) {
                    return Err(para.error(3, format!("arrival horizon must be finite and non-negative, got {}", time_end)));
                }
                Workload::Random {
                    params: RandomParams { lambda, a2l, a2u, p0, alpha0, beta0, eta0, alpha1: ab1[0], eta1: ab1[1] },
                    time_end,
                }
            }
            other => return Err(mode.error(0, format!("unknown mode '{}'", other))),
        };

        info!(test, total_servers, fast_servers, time_limit, "configuration loaded");
        Ok(TestConfig { test: test.to_owned(), total_servers, fast_servers, time_limit, workload })
    }

    pub fn overflow_servers(&self) -> usize {
        self.total_servers - self.fast_servers
    }

    pub fn simulation_config(&self, overflow: OverflowPolicy) -> SimulationConfig {
        SimulationConfig::new(self.fast_servers, self.overflow_servers(), self.time_limit)
            .with_overflow(overflow)
    }

    /// The seed only matters for random workloads.
    pub fn arrival_source(&self, seed: u64) -> Result<Box<dyn ArrivalSource>> {
        match &self.workload {
            Workload::Trace { interarrivals, services } => {
                Ok(Box::new(TraceGenerator::new(interarrivals, services)))
            }
            Workload::Random { params, time_end } => {
                let rng = StdRng::seed_from_u64(seed);
                Ok(Box::new(RandomGenerator::new(params, Some(*time_end), rng)?))
            }
        }
    }
}

fn three(v: Vec<f64>) -> [f64; 3] {
    [v[0], v[1], v[2]]
}

fn load_trace(interarrival: &ConfigFile, service: &ConfigFile) -> Result<Workload> {
    let interarrivals = interarrival.non_empty()
        .map(|(i, l)| {
            let gap: f64 = interarrival.parse(i, l)?;
            if !(gap.is_finite() && gap >= 0.) {
                return Err(interarrival.error(i, format!("inter-arrival time must be finite and non-negative, got {}", gap)));
            }
            Ok(gap)
        })
        .collect::<Result<Vec<f64>>>()?;

    let services = service.non_empty()
        .map(|(i, l)| {
            let tokens: Vec<&str> = l.split_whitespace().collect();
            if tokens.len() != 2 {
                return Err(service.error(i, "expected 'service_time group'".to_owned()));
            }
            let group: GroupId = service.parse(i, tokens[1])?;
            if group >= NUM_GROUPS {
                return Err(service.error(i, format!("unknown group {}", group)));
            }
            Ok((service.parse(i, tokens[0])?, group))
        })
        .collect::<Result<Vec<(f64, GroupId)>>>()?;

    Ok(Workload::Trace { interarrivals, services })
}
