//! Error types for the simulator.

use std::path::PathBuf;

use thiserror::Error;

use crate::queues::{GroupId, JobId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("invalid generator parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid event time {time} for job {job}")]
    InvalidEventTime { time: f64, job: JobId },

    #[error("server {server} of group {group} is busy with job {held}, cannot take job {job}")]
    ServerBusy { group: GroupId, server: usize, held: JobId, job: JobId },

    #[error("job {0} is already completed and cannot be admitted again")]
    AlreadyCompleted(JobId),

    #[error("job {job} is in service at group {group} but no server holds it")]
    JobNotHeld { group: GroupId, job: JobId },

    #[error("{count} of {total} jobs never completed")]
    Unfinished { count: usize, total: usize },

    #[error("cannot read {path:?}: {source}")]
    ConfigIo { path: PathBuf, source: std::io::Error },

    #[error("{path:?}, line {line}: {message}")]
    ConfigParse { path: PathBuf, line: usize, message: String },

    #[error("cannot write report {path:?}: {source}")]
    ReportIo { path: PathBuf, source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, SimError>;
