use std::collections::VecDeque;

use tracing::warn;

use crate::error::Result;
use crate::queues::{Arrival, ArrivalSource, GroupId};

/// Replays a recorded workload: inter-arrival gaps plus per-job service time and group.
pub struct TraceGenerator {
    requests: VecDeque<Arrival>,
}

impl TraceGenerator {
    pub fn new(interarrivals: &[f64], services: &[(f64, GroupId)]) -> Self {
        if interarrivals.len() != services.len() {
            warn!(interarrivals = interarrivals.len(), services = services.len(),
                  "trace lengths differ, extra lines ignored");
        }

        let mut t = 0.;
        let requests = interarrivals.iter().zip(services)
            .map(|(&gap, &(service_time, group))| {
                t += gap;
                Arrival::new(t, service_time, group)
            })
            .collect();
        TraceGenerator { requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl ArrivalSource for TraceGenerator {
    fn next_arrival(&mut self) -> Result<Option<Arrival>> {
        Ok(self.requests.pop_front())
    }
}
