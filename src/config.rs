use sysinfo::{System, SystemExt};

use crate::SptError;

/// Runtime parameters of a permutation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of random re-pairings.
    pub trials: u64,
    /// Worker thread count. `None` uses the number of logical CPUs.
    pub workers: Option<usize>,
    /// Queue capacity per worker for both the job and the result queue.
    pub queue_factor: usize,
    /// Fixed seed for the job stream. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Print the matches of every trial that reaches the baseline count.
    pub verbose: bool,
    /// Show a progress bar while results are collected.
    pub progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trials: 1_000_000,
            workers: None,
            queue_factor: 2,
            seed: None,
            verbose: false,
            progress: false,
        }
    }
}

impl RunConfig {
    /// Resolve the worker count for this run.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) => n.max(1),
            None => hardware_concurrency(),
        }
    }

    /// Capacity of the job and result queues.
    pub fn queue_capacity(&self) -> usize {
        self.worker_count() * self.queue_factor.max(1)
    }

    pub fn validate(&self) -> Result<(), SptError> {
        if self.workers == Some(0) {
            return Err(SptError::Config("worker count must be positive".into()));
        }
        if self.queue_factor == 0 {
            return Err(SptError::Config("queue factor must be positive".into()));
        }
        Ok(())
    }
}

/// Number of logical CPUs, never less than one.
pub fn hardware_concurrency() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu();
    let cpus = sys.cpus().len();
    if cpus > 0 {
        return cpus;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_workers_size_the_queues() {
        let cfg = RunConfig {
            workers: Some(3),
            ..RunConfig::default()
        };
        assert_eq!(cfg.worker_count(), 3);
        assert_eq!(cfg.queue_capacity(), 6);
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = RunConfig {
            workers: Some(0),
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(hardware_concurrency() >= 1);
    }
}
