use std::collections::VecDeque;

use tracing::trace;

use crate::error::{Result, SimError};
use crate::queues::event::{Event, EventKind, EventQueue};
use crate::queues::job::{Job, JobState};
use crate::queues::server::Server;
use crate::queues::{GroupId, JobId, TIME_TOLERANCE};

/// What a group did with an event it was offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Ignored,
    Admitted,
    Queued,
    Completed,
    /// The job hit the dwell-time cap and left without finishing.
    Evicted(JobId),
}

/// k FIFO servers sharing one waiting queue, with an optional dwell-time cap.
pub struct ServerGroup {
    id: GroupId,
    time_limit: f64,
    servers: Vec<Server>,
    queue: VecDeque<JobId>,
}

impl ServerGroup {
    pub fn new(id: GroupId, k: usize, time_limit: f64) -> Self {
        ServerGroup {
            id,
            time_limit,
            servers: (0..k).map(|i| Server::new(i, id)).collect(),
            queue: VecDeque::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn waiting(&self) -> impl Iterator<Item = JobId> + '_ {
        self.queue.iter().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn busy_servers(&self) -> usize {
        self.servers.iter().filter(|s| !s.is_idle()).count()
    }

    //Puts 'job' on the lowest idle server, or at the back of the queue
    pub fn admit(&mut self, job: &mut Job, now: f64, events: &mut EventQueue) -> Result<Dispatch> {
        if job.is_completed() {
            return Err(SimError::AlreadyCompleted(job.id()));
        }

        match self.servers.iter().position(|s| s.is_idle()) {
            Some(server) => {
                self.servers[server].assign(job.id())?;
                job.begin_service(self.id, now);
                let dwell = self.time_limit.min(job.stage_work());
                events.insert(Event::departure(now + dwell, job.id()))?;
                trace!(group = self.id, server, job = job.id(), now, dwell, "admitted");
                Ok(Dispatch::Admitted)
            }
            None => {
                job.enqueue(self.id);
                self.queue.push_back(job.id());
                trace!(group = self.id, job = job.id(), now, queued = self.queue.len(), "queued");
                Ok(Dispatch::Queued)
            }
        }
    }

    fn admit_next(&mut self, now: f64, jobs: &mut [Job], events: &mut EventQueue) -> Result<()> {
        if let Some(next) = self.queue.pop_front() {
            self.admit(&mut jobs[next], now, events)?;
        }
        Ok(())
    }

    /// Every group sees every event and acts only on the ones concerning it.
    pub fn handle(&mut self, event: &Event, jobs: &mut [Job], events: &mut EventQueue) -> Result<Dispatch> {
        match event.kind {
            EventKind::Arrival => {
                let job = &mut jobs[event.job];
                if job.origin_group() != self.id || job.state() != JobState::Created {
                    return Ok(Dispatch::Ignored);
                }
                self.admit(job, event.time, events)
            }
            EventKind::Departure => {
                let (start, work) = {
                    let job = &jobs[event.job];
                    if job.state() != JobState::InService(self.id) {
                        return Ok(Dispatch::Ignored);
                    }
                    let start = job.start_time()
                        .ok_or(SimError::JobNotHeld { group: self.id, job: event.job })?;
                    (start, job.stage_work())
                };

                let server = self.servers.iter()
                    .position(|s| s.holds(event.job))
                    .ok_or(SimError::JobNotHeld { group: self.id, job: event.job })?;
                self.servers[server].release();

                let outcome = if (event.time - start - work).abs() < TIME_TOLERANCE {
                    jobs[event.job].complete(event.time);
                    Dispatch::Completed
                } else {
                    jobs[event.job].evict(self.id);
                    Dispatch::Evicted(event.job)
                };
                trace!(group = self.id, server, job = event.job, time = event.time, ?outcome, "departure");

                self.admit_next(event.time, jobs, events)?;
                Ok(outcome)
            }
        }
    }
}
