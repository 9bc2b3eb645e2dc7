//! Bounded-concurrency fan-out of probes over a batch of files.
//!
//! A file is only spawned once a semaphore permit is free, so at most
//! [`MAX_IN_FLIGHT`] probe tasks exist at a time. Records are handed to a
//! callback as they complete. The first failure stops dispatch and aborts
//! whatever is still running.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::error::{ProbeError, ProbeResult};
use crate::probe::MetadataProber;
use crate::types::{FileRecord, RunSummary};

/// Maximum number of probes in flight.
pub const MAX_IN_FLIGHT: usize = 10;

/// Drives a [`MetadataProber`] over a file list.
pub struct FanOut {
    prober: MetadataProber,
    limit: usize,
}

impl FanOut {
    pub fn new(prober: MetadataProber) -> Self {
        Self {
            prober,
            limit: MAX_IN_FLIGHT,
        }
    }

    /// Probe every file, calling `on_record` for each success in completion order.
    ///
    /// Returns the batch summary, or the first error from a probe or from
    /// `on_record`. No records are delivered and no files are dispatched
    /// after an error is observed.
    pub async fn run<F, E>(&self, files: Vec<PathBuf>, mut on_record: F) -> Result<RunSummary, E>
    where
        F: FnMut(FileRecord) -> Result<(), E>,
        E: From<ProbeError>,
    {
        let start = Instant::now();
        let file_count = files.len();
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut tasks = JoinSet::new();

        for path in files {
            // Drain finished probes first so a failure stops dispatch
            let permit = loop {
                tokio::select! {
                    biased;
                    Some(joined) = tasks.join_next() => {
                        if let Err(e) = deliver(joined, &mut on_record) {
                            return Err(abort(&mut tasks, e));
                        }
                    }
                    permit = semaphore.clone().acquire_owned() => break permit,
                }
            };
            let permit = match permit {
                Ok(permit) => permit,
                Err(e) => {
                    let err = E::from(ProbeError::Task {
                        path,
                        message: e.to_string(),
                    });
                    return Err(abort(&mut tasks, err));
                }
            };

            let prober = self.prober.clone();
            tasks.spawn(async move {
                let result = prober.probe(&path).await;
                drop(permit);
                result
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = deliver(joined, &mut on_record) {
                return Err(abort(&mut tasks, e));
            }
        }

        let summary = RunSummary {
            file_count,
            elapsed: start.elapsed(),
        };
        tracing::debug!(
            "Probed {} file(s) in {:?}",
            summary.file_count,
            summary.elapsed
        );
        Ok(summary)
    }
}

/// Hand one finished probe to the callback, or turn it into the batch error.
fn deliver<F, E>(
    joined: Result<ProbeResult<FileRecord>, JoinError>,
    on_record: &mut F,
) -> Result<(), E>
where
    F: FnMut(FileRecord) -> Result<(), E>,
    E: From<ProbeError>,
{
    // A JoinError only arises from a panicking probe; its path is not recoverable here.
    let outcome = joined
        .map_err(|e| ProbeError::Task {
            path: PathBuf::from("<unknown>"),
            message: e.to_string(),
        })
        .and_then(|r| r);

    match outcome {
        Ok(record) => on_record(record),
        Err(e) => {
            tracing::debug!("Failed on {:?}", e.path());
            Err(E::from(e))
        }
    }
}

fn abort<T: 'static, E>(tasks: &mut JoinSet<T>, err: E) -> E {
    tracing::debug!("Batch failed, aborting {} pending task(s)", tasks.len());
    tasks.abort_all();
    err
}
