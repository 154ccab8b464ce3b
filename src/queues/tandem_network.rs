use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SimError};
use crate::queues::event::{Event, EventQueue};
use crate::queues::job::Job;
use crate::queues::server_group::{Dispatch, ServerGroup};
use crate::queues::{ArrivalSource, Arrival, JobId, FAST_GROUP, OVERFLOW_GROUP};

/// What happens to a job evicted from the fast group at its dwell-time cap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Re-admit into the overflow group with the full service time.
    #[default]
    Restart,
    /// Re-admit into the overflow group with the service time not yet received.
    Resume,
    /// Never re-admit; the job stays unfinished.
    Drop,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "restart" => Ok(OverflowPolicy::Restart),
            "resume" => Ok(OverflowPolicy::Resume),
            "drop" => Ok(OverflowPolicy::Drop),
            _ => Err(format!("unknown overflow policy '{}' (expected restart, resume or drop)", s)),
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverflowPolicy::Restart => "restart",
            OverflowPolicy::Resume => "resume",
            OverflowPolicy::Drop => "drop",
        };
        f.write_str(s)
    }
}

/// When to stop taking jobs from the arrival source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopCondition {
    Exhausted,
    Jobs(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub fast_servers: usize,
    pub overflow_servers: usize,
    /// Dwell-time cap of the fast group, `f64::INFINITY` for none.
    pub time_limit: f64,
    pub overflow: OverflowPolicy,
    pub stop: StopCondition,
}

impl SimulationConfig {
    pub fn new(fast_servers: usize, overflow_servers: usize, time_limit: f64) -> Self {
        SimulationConfig {
            fast_servers,
            overflow_servers,
            time_limit,
            overflow: OverflowPolicy::default(),
            stop: StopCondition::Exhausted,
        }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunOutcome {
    pub jobs: usize,
    pub events: usize,
    pub completed: usize,
    pub unfinished: usize,
    pub end_time: f64,
}

impl RunOutcome {
    pub fn ensure_complete(&self) -> Result<()> {
        if self.unfinished > 0 {
            return Err(SimError::Unfinished { count: self.unfinished, total: self.jobs });
        }
        Ok(())
    }
}

/// The fast group and its overflow group sharing one event queue.
pub struct TandemNetwork {
    config: SimulationConfig,
    events: EventQueue,
    groups: Vec<ServerGroup>,
    jobs: Vec<Job>,
    time: f64,
    processed: usize,
}

impl TandemNetwork {
    pub fn new(config: SimulationConfig) -> Self {
        let groups = vec![
            ServerGroup::new(FAST_GROUP, config.fast_servers, config.time_limit),
            ServerGroup::new(OVERFLOW_GROUP, config.overflow_servers, f64::INFINITY),
        ];
        TandemNetwork {
            config,
            events: EventQueue::new(),
            groups,
            jobs: Vec::new(),
            time: 0.,
            processed: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn add_job(&mut self, arrival: Arrival) -> Result<JobId> {
        let id = self.jobs.len();
        let job = Job::new(id, arrival)?;
        self.events.insert(Event::arrival(job.arrival_time(), id))?;
        self.jobs.push(job);
        Ok(id)
    }

    /// Takes arrivals from `source` until it runs dry or the stop condition is met.
    pub fn load<S>(&mut self, source: &mut S) -> Result<usize> where S: ArrivalSource + ?Sized {
        let limit = match self.config.stop {
            StopCondition::Exhausted => usize::MAX,
            StopCondition::Jobs(n) => n,
        };
        let mut loaded = 0;
        while loaded < limit {
            match source.next_arrival()? {
                Some(arrival) => {
                    self.add_job(arrival)?;
                    loaded += 1;
                }
                None => break,
            }
        }
        debug!(loaded, "arrivals scheduled");
        Ok(loaded)
    }

    /// Processes the earliest pending event, `None` once the queue is empty.
    pub fn make_transition(&mut self) -> Result<Option<Event>> {
        let event = match self.events.pop_earliest() {
            Some(event) => event,
            None => return Ok(None),
        };
        self.time = event.time;
        self.processed += 1;

        let mut evicted = None;
        for group in self.groups.iter_mut() {
            if let Dispatch::Evicted(job) = group.handle(&event, &mut self.jobs, &mut self.events)? {
                evicted = Some(job);
            }
        }
        if let Some(job) = evicted {
            self.route_overflow(job, event.time)?;
        }
        Ok(Some(event))
    }

    fn route_overflow(&mut self, job: JobId, now: f64) -> Result<()> {
        let work = match self.config.overflow {
            OverflowPolicy::Drop => {
                debug!(job, now, "evicted job dropped");
                return Ok(());
            }
            OverflowPolicy::Restart => self.jobs[job].service_time(),
            OverflowPolicy::Resume => {
                let j = &self.jobs[job];
                let served = now - j.start_time().unwrap_or(now);
                (j.stage_work() - served).max(0.)
            }
        };
        debug!(job, now, work, "evicted job sent to overflow group");
        self.jobs[job].set_stage_work(work);
        self.groups[OVERFLOW_GROUP].admit(&mut self.jobs[job], now, &mut self.events)?;
        Ok(())
    }

    pub fn run(&mut self) -> Result<RunOutcome> {
        while self.make_transition()?.is_some() {}

        let outcome = self.outcome();
        if outcome.unfinished > 0 {
            warn!(unfinished = outcome.unfinished, total = outcome.jobs, "jobs left without completion time");
        }
        info!(jobs = outcome.jobs, events = outcome.events, end_time = outcome.end_time, "simulation finished");
        Ok(outcome)
    }

    pub fn outcome(&self) -> RunOutcome {
        let completed = self.jobs.iter().filter(|j| j.is_completed()).count();
        RunOutcome {
            jobs: self.jobs.len(),
            events: self.processed,
            completed,
            unfinished: self.jobs.len() - completed,
            end_time: self.time,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }

    pub fn groups(&self) -> &[ServerGroup] {
        &self.groups
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }
}

/// Builds a network from `config`, feeds it `source` and runs it to the end.
pub fn simulate<S>(config: SimulationConfig, source: &mut S) -> Result<(Vec<Job>, RunOutcome)>
    where S: ArrivalSource + ?Sized
{
    let mut qn = TandemNetwork::new(config);
    qn.load(source)?;
    let outcome = qn.run()?;
    Ok((qn.into_jobs(), outcome))
}
