use crate::error::{Result, SimError};
use crate::queues::{GroupId, JobId};

#[derive(Clone, Debug)]
pub struct Server {
    id: usize,
    group: GroupId,
    current_job: Option<JobId>,
}

impl Server {
    pub fn new(id: usize, group: GroupId) -> Self {
        Server { id, group, current_job: None }
    }

    pub fn current_job(&self) -> Option<JobId> {
        self.current_job
    }

    pub fn is_idle(&self) -> bool {
        self.current_job.is_none()
    }

    pub fn holds(&self, job: JobId) -> bool {
        self.current_job == Some(job)
    }

    pub fn assign(&mut self, job: JobId) -> Result<()> {
        if let Some(held) = self.current_job {
            return Err(SimError::ServerBusy { group: self.group, server: self.id, held, job });
        }
        self.current_job = Some(job);
        Ok(())
    }

    pub fn release(&mut self) -> Option<JobId> {
        self.current_job.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_at_most_one_job() {
        let mut s = Server::new(0, 0);
        assert!(s.is_idle());
        s.assign(7).unwrap();
        assert!(s.holds(7));
        assert!(matches!(s.assign(8), Err(SimError::ServerBusy { held: 7, job: 8, .. })));
        assert_eq!(s.release(), Some(7));
        assert!(s.is_idle());
        assert_eq!(s.release(), None);
    }
}
