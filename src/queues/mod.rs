pub mod job;
pub mod event;
pub mod server;
pub mod server_group;
pub mod tandem_network;
pub mod trace_generator;
pub mod random_generator;

use crate::error::Result;

pub type JobId = usize;
pub type GroupId = usize;

/// The capped fast-lane group.
pub const FAST_GROUP: GroupId = 0;
/// The uncapped group absorbing evicted jobs.
pub const OVERFLOW_GROUP: GroupId = 1;
pub const NUM_GROUPS: usize = 2;

/// Times carry four decimals; two times closer than this are the same instant.
pub const TIME_TOLERANCE: f64 = 1e-4;

/// One job offered to the network.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    pub time: f64,
    pub service_time: f64,
    pub origin_group: GroupId,
}

impl Arrival {
    pub fn new(time: f64, service_time: f64, origin_group: GroupId) -> Self {
        Arrival { time, service_time, origin_group }
    }
}

pub trait ArrivalSource {
    /// Next arrival in non-decreasing time order, `None` once exhausted.
    fn next_arrival(&mut self) -> Result<Option<Arrival>>;
}

impl ArrivalSource for std::vec::IntoIter<Arrival> {
    fn next_arrival(&mut self) -> Result<Option<Arrival>> {
        Ok(self.next())
    }
}
