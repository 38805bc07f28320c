//! Monte-Carlo permutation test over two aligned wordlists.
//!
//! A producer thread emits one random re-ordering of the first list per
//! trial into a bounded job queue. A fixed pool of workers compares each
//! re-ordered list against the fixed second list and pushes the outcome
//! into a bounded result queue, which a single collector folds into a
//! [`Summary`]. Both queues hold `workers * queue_factor` items, so a slow
//! collector throttles the workers and, through them, the producer.
//!
//! All threads are scoped to the call. The run ends when the collector has
//! drained exactly `trials` results and the producer has returned; workers
//! exit once the job queue is closed.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::thread;

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::RunConfig;
use crate::stats::{baseline_report, Summary};
use crate::weights::WeightTable;
use crate::word::{Comparison, WordList};
use crate::SptError;

/// Baseline comparison plus the null distribution of one run.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub baseline: Comparison,
    pub summary: Summary,
}

/// One trial: `order[i]` is the index into the first list paired with
/// slot `i` of the second list.
struct Job {
    order: Vec<usize>,
}

type TrialOutcome = Result<Comparison, SptError>;

/// Run the permutation test of `list1` against `list2`.
///
/// Fails before any thread starts when the lists differ in length or the
/// configuration is invalid. A failed trial aborts the whole run.
pub fn run_test(
    list1: &WordList,
    list2: &WordList,
    weights: &WeightTable,
    cfg: &RunConfig,
) -> Result<TestRun, SptError> {
    cfg.validate()?;
    if list1.len() != list2.len() {
        return Err(SptError::LengthMismatch {
            left: list1.len(),
            right: list2.len(),
        });
    }

    let baseline = list1.compare(list2, weights);

    let workers = cfg.worker_count();
    let capacity = cfg.queue_capacity();
    let (job_tx, job_rx) = sync_channel::<Job>(capacity);
    let (result_tx, result_rx) = sync_channel::<TrialOutcome>(capacity);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let summary = thread::scope(|scope| {
        for _ in 0..workers {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            scope.spawn(move || worker(&jobs, results, list1, list2, weights));
        }
        // Workers now own the only receivers and senders of their queues, so
        // either side going away unblocks the other.
        drop(job_rx);
        drop(result_tx);

        let slots = list1.len();
        let trials = cfg.trials;
        let producer = scope.spawn(move || produce(job_tx, slots, trials, rng));
        let baseline = &baseline;
        let collector = scope.spawn(move || collect(result_rx, baseline, cfg));

        let summary = collector
            .join()
            .map_err(|_| SptError::Trial("collector panicked".into()))?;
        producer
            .join()
            .map_err(|_| SptError::Trial("producer panicked".into()))?;
        summary
    })?;

    Ok(TestRun { baseline, summary })
}

fn produce(jobs: SyncSender<Job>, slots: usize, trials: u64, mut rng: StdRng) {
    let mut order: Vec<usize> = (0..slots).collect();
    for _ in 0..trials {
        order.shuffle(&mut rng);
        let job = Job {
            order: order.clone(),
        };
        if jobs.send(job).is_err() {
            // every worker is gone; the collector reports why
            break;
        }
    }
}

fn worker(
    jobs: &Mutex<Receiver<Job>>,
    results: SyncSender<TrialOutcome>,
    list1: &WordList,
    list2: &WordList,
    weights: &WeightTable,
) {
    loop {
        let next = jobs.lock().recv();
        let Ok(job) = next else {
            break;
        };
        let outcome = run_trial(&job, list1, list2, weights);
        if results.send(outcome).is_err() {
            break;
        }
    }
}

fn run_trial(
    job: &Job,
    list1: &WordList,
    list2: &WordList,
    weights: &WeightTable,
) -> TrialOutcome {
    if job.order.len() != list2.len() || job.order.iter().any(|&i| i >= list1.len()) {
        return Err(SptError::Trial(format!(
            "re-ordering of {} slots does not fit lists of {} and {}",
            job.order.len(),
            list1.len(),
            list2.len()
        )));
    }
    panic::catch_unwind(AssertUnwindSafe(|| {
        list1.compare_reordered(&job.order, list2, weights)
    }))
    .map_err(|_| SptError::Trial("comparison panicked".into()))
}

fn collect(
    results: Receiver<TrialOutcome>,
    baseline: &Comparison,
    cfg: &RunConfig,
) -> Result<Summary, SptError> {
    let mut summary = Summary::new(baseline);
    let progress = cfg.progress.then(|| progress_bar(cfg.trials));

    for received in 0..cfg.trials {
        let trial = results.recv().map_err(|_| {
            SptError::Trial(format!(
                "result queue closed after {received} of {} trials",
                cfg.trials
            ))
        })??;
        if cfg.verbose && summary.reaches_baseline(trial.count()) {
            eprint!("{}", baseline_report(&trial));
        }
        summary.record(trial.count(), trial.cost);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(summary)
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40} {pos}/{len} trials ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
