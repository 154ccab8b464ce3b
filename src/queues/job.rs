use std::fmt;

use crate::error::{Result, SimError};
use crate::queues::{Arrival, GroupId, JobId, NUM_GROUPS};

/// Where a job currently is; groups use it to decide whether an event concerns them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JobState {
    Created,
    Queued(GroupId),
    InService(GroupId),
    Evicted(GroupId),
    Completed(f64),
}

/// Reporting class of a finished job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobClass {
    Group(GroupId),
    Rerouted,
}

impl fmt::Display for JobClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobClass::Group(g) => write!(f, "{}", g),
            JobClass::Rerouted => write!(f, "r0"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    id: JobId,
    arrival_time: f64,
    service_time: f64,
    origin_group: GroupId,
    stage_work: f64,
    start_time: Option<f64>,
    completion_time: Option<f64>,
    visited_groups: Vec<GroupId>,
    state: JobState,
}

fn check_time(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(SimError::InvalidJob(format!("{} must be finite and non-negative, got {}", what, value)))
    }
}

impl Job {
    pub fn new(id: JobId, arrival: Arrival) -> Result<Self> {
        check_time("arrival time", arrival.time)?;
        check_time("service time", arrival.service_time)?;
        if arrival.origin_group >= NUM_GROUPS {
            return Err(SimError::InvalidJob(format!("unknown group {}", arrival.origin_group)));
        }
        Ok(Job {
            id,
            arrival_time: arrival.time,
            service_time: arrival.service_time,
            origin_group: arrival.origin_group,
            stage_work: arrival.service_time,
            start_time: None,
            completion_time: None,
            visited_groups: Vec::new(),
            state: JobState::Created,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    pub fn origin_group(&self) -> GroupId {
        self.origin_group
    }

    /// Work still required at the group currently serving the job.
    pub fn stage_work(&self) -> f64 {
        self.stage_work
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<f64> {
        self.completion_time
    }

    pub fn visited_groups(&self) -> &[GroupId] {
        &self.visited_groups
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn response_time(&self) -> Option<f64> {
        self.completion_time.map(|t| t - self.arrival_time)
    }

    /// `None` until the job has been admitted to service somewhere.
    pub fn class(&self) -> Option<JobClass> {
        match self.visited_groups.as_slice() {
            [] => None,
            [g] => Some(JobClass::Group(*g)),
            _ => Some(JobClass::Rerouted),
        }
    }

    pub(crate) fn enqueue(&mut self, group: GroupId) {
        self.state = JobState::Queued(group);
    }

    pub(crate) fn begin_service(&mut self, group: GroupId, now: f64) {
        self.start_time = Some(now);
        self.visited_groups.push(group);
        self.state = JobState::InService(group);
    }

    pub(crate) fn complete(&mut self, now: f64) {
        debug_assert!(self.completion_time.is_none());
        self.completion_time = Some(now);
        self.state = JobState::Completed(now);
    }

    pub(crate) fn evict(&mut self, group: GroupId) {
        self.state = JobState::Evicted(group);
    }

    pub(crate) fn set_stage_work(&mut self, work: f64) {
        self.stage_work = work;
    }
}
