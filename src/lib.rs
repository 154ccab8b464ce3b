//! Discrete-event simulation of a tandem queueing network: a fast server
//! group with a dwell-time cap, backed by an uncapped overflow group.

pub mod error;
pub mod helpers;
pub mod queues;
pub mod distribution;
pub mod config;
pub mod report;
pub mod sweep;

pub use crate::error::{Result, SimError};
pub use crate::queues::event::{Event, EventKind, EventQueue};
pub use crate::queues::job::{Job, JobClass, JobState};
pub use crate::queues::server::Server;
pub use crate::queues::server_group::{Dispatch, ServerGroup};
pub use crate::queues::tandem_network::{simulate, OverflowPolicy, RunOutcome, SimulationConfig, StopCondition, TandemNetwork};
pub use crate::queues::{Arrival, ArrivalSource, GroupId, JobId};
