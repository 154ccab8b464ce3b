use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, SimError};
use crate::queues::job::{Job, JobClass};
use crate::queues::{FAST_GROUP, OVERFLOW_GROUP};

/// Mean response times of jobs served by a single group.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub mrt: [f64; 2],
    pub served: [usize; 2],
    pub rerouted: usize,
    pub unfinished: usize,
}

impl Summary {
    pub fn weighted(&self, w0: f64, w1: f64) -> f64 {
        w0 * self.mrt[FAST_GROUP] + w1 * self.mrt[OVERFLOW_GROUP]
    }
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() { 0. } else { statistical::mean(v) }
}

/// Rerouted jobs are counted but stay out of both means.
pub fn summarize(jobs: &[Job]) -> Summary {
    let mut response = [Vec::new(), Vec::new()];
    let mut summary = Summary::default();

    for job in jobs {
        match (job.class(), job.response_time()) {
            (Some(JobClass::Group(g)), Some(rt)) => response[g].push(rt),
            (Some(JobClass::Rerouted), Some(_)) => summary.rerouted += 1,
            _ => summary.unfinished += 1,
        }
    }
    for g in [FAST_GROUP, OVERFLOW_GROUP] {
        summary.served[g] = response[g].len();
        summary.mrt[g] = mean(&response[g]);
    }
    summary
}

/// Writes `dep_<test>.txt` and `mrt_<test>.txt` into an output directory.
pub struct ReportWriter {
    dir: PathBuf,
    test: String,
}

impl ReportWriter {
    pub fn new(dir: &Path, test: &str) -> Self {
        ReportWriter { dir: dir.to_path_buf(), test: test.to_owned() }
    }

    pub fn departures_path(&self) -> PathBuf {
        self.dir.join(format!("dep_{}.txt", self.test))
    }

    pub fn mrt_path(&self) -> PathBuf {
        self.dir.join(format!("mrt_{}.txt", self.test))
    }

    pub fn write(&self, jobs: &[Job]) -> Result<Summary> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| SimError::ReportIo { path: self.dir.clone(), source })?;

        let summary = summarize(jobs);
        if summary.unfinished > 0 {
            warn!(unfinished = summary.unfinished, "unfinished jobs left out of the report");
        }

        let path = self.departures_path();
        write_departures(&path, jobs)
            .map_err(|source| SimError::ReportIo { path: path.clone(), source })?;

        let path = self.mrt_path();
        fs::write(&path, format!("{:.4} {:.4}\n", summary.mrt[FAST_GROUP], summary.mrt[OVERFLOW_GROUP]))
            .map_err(|source| SimError::ReportIo { path: path.clone(), source })?;

        info!(test = %self.test, mrt0 = summary.mrt[FAST_GROUP], mrt1 = summary.mrt[OVERFLOW_GROUP], "report written");
        Ok(summary)
    }
}

// One line per finished job, by completion time
fn write_departures(path: &Path, jobs: &[Job]) -> std::io::Result<()> {
    let mut done: Vec<(f64, &Job, JobClass)> = jobs.iter()
        .filter_map(|j| Some((j.completion_time()?, j, j.class()?)))
        .collect();
    done.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut out = BufWriter::new(File::create(path)?);
    for (completion, job, class) in done {
        writeln!(out, "{:.4} {:.4} {}", job.arrival_time(), completion, class)?;
    }
    out.flush()
}
