//! Aggregates of a permutation run and their text report.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::word::Comparison;
use crate::SptError;

/// Histogram entry for JSON and CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub value: f64,
    pub trials: u64,
}

/// Result of one permutation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub trials: u64,
    pub baseline_count: usize,
    pub baseline_cost: f64,
    /// Match count → number of trials.
    pub counts: BTreeMap<usize, u64>,
    /// Cost → number of trials.
    pub costs: BTreeMap<OrderedFloat<f64>, u64>,
    /// Trials whose match count reached the baseline count.
    pub total_counts: u64,
    /// Trials whose cost reached the baseline cost.
    pub total_cost: u64,
}

impl Summary {
    pub fn new(baseline: &Comparison) -> Self {
        Self {
            baseline_count: baseline.count(),
            baseline_cost: baseline.cost,
            ..Self::default()
        }
    }

    /// Fold one trial into the histograms and counters.
    pub fn record(&mut self, count: usize, cost: f64) {
        self.trials += 1;
        *self.counts.entry(count).or_insert(0) += 1;
        *self.costs.entry(OrderedFloat(cost)).or_insert(0) += 1;
        if count >= self.baseline_count {
            self.total_counts += 1;
        }
        if cost >= self.baseline_cost {
            self.total_cost += 1;
        }
    }

    /// Whether a trial result counts as reaching the baseline.
    pub fn reaches_baseline(&self, count: usize) -> bool {
        count >= self.baseline_count
    }

    /// Empirical P(counts). Zero when no trial ran.
    pub fn p_counts(&self) -> f64 {
        ratio(self.total_counts, self.trials)
    }

    /// Empirical P(costs). Zero when no trial ran.
    pub fn p_costs(&self) -> f64 {
        ratio(self.total_cost, self.trials)
    }

    pub fn count_buckets(&self) -> Vec<Bucket> {
        self.counts
            .iter()
            .map(|(&k, &trials)| Bucket {
                value: k as f64,
                trials,
            })
            .collect()
    }

    pub fn cost_buckets(&self) -> Vec<Bucket> {
        self.costs
            .iter()
            .map(|(k, &trials)| Bucket {
                value: k.into_inner(),
                trials,
            })
            .collect()
    }

    /// Text report of the count histogram and, if `weighted`, of the cost
    /// histogram.
    pub fn report(&self, weighted: bool) -> String {
        let mut out = String::new();
        for (count, trials) in &self.counts {
            let _ = writeln!(out, "k = {count}:\t{trials} trial(s)");
        }
        let _ = writeln!(
            out,
            "P (counts) = {} / {} = {:.6}\n",
            self.total_counts,
            self.trials,
            self.p_counts()
        );
        if weighted {
            for (cost, trials) in &self.costs {
                let _ = writeln!(out, "s = {:.3}: {trials} trial(s)", cost.into_inner());
            }
            let _ = writeln!(
                out,
                "P (costs) = {} / {} = {:.6}",
                self.total_cost,
                self.trials,
                self.p_costs()
            );
        }
        out
    }
}

/// Write both histograms as CSV rows of `(axis, value, trials)`.
pub fn write_histograms<W: io::Write>(summary: &Summary, writer: W) -> Result<(), SptError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["axis", "value", "trials"])?;
    for bucket in summary.count_buckets() {
        wtr.write_record([
            "count".to_string(),
            bucket.value.to_string(),
            bucket.trials.to_string(),
        ])?;
    }
    for bucket in summary.cost_buckets() {
        wtr.write_record([
            "cost".to_string(),
            bucket.value.to_string(),
            bucket.trials.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn ratio(hits: u64, trials: u64) -> f64 {
    if trials == 0 {
        0.0
    } else {
        hits as f64 / trials as f64
    }
}

/// Text report of the unpermuted comparison.
pub fn baseline_report(baseline: &Comparison) -> String {
    let mut out = String::new();
    for (idx, m) in baseline.matches.iter().enumerate() {
        let _ = writeln!(out, "Positive pair {idx}: {m}");
    }
    let _ = writeln!(
        out,
        "N = {} (number of positive pairs in the original list)",
        baseline.count()
    );
    let _ = writeln!(
        out,
        "S = {:.6} (cost of positive pairs in the original list)\n",
        baseline.cost
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(count: usize, cost: f64) -> Comparison {
        Comparison {
            cost,
            matches: (0..count).map(|i| format!("m{i}")).collect(),
        }
    }

    #[test]
    fn counters_use_at_least() {
        let mut s = Summary::new(&baseline(2, 2.0));
        s.record(1, 1.0);
        s.record(2, 2.0);
        s.record(3, 3.0);
        assert_eq!(s.trials, 3);
        assert_eq!(s.total_counts, 2);
        assert_eq!(s.total_cost, 2);
        assert_eq!(s.counts[&2], 1);
        assert!((s.p_counts() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_run_has_zero_p() {
        let s = Summary::new(&baseline(0, 0.0));
        assert_eq!(s.p_counts(), 0.0);
        assert_eq!(s.p_costs(), 0.0);
    }

    #[test]
    fn report_lines() {
        let mut s = Summary::new(&baseline(1, 40.0));
        s.record(0, 0.0);
        s.record(1, 40.0);
        s.record(1, 40.0);
        let text = s.report(true);
        assert!(text.contains("k = 0:\t1 trial(s)"));
        assert!(text.contains("k = 1:\t2 trial(s)"));
        assert!(text.contains("P (counts) = 2 / 3 = 0.666667"));
        assert!(text.contains("s = 40.000: 2 trial(s)"));
        assert!(!s.report(false).contains("P (costs)"));
        assert_eq!(
            s.cost_buckets()[1],
            Bucket {
                value: 40.0,
                trials: 2
            }
        );
    }

    #[test]
    fn histograms_as_csv() {
        let mut s = Summary::new(&baseline(1, 1.5));
        s.record(1, 1.5);
        s.record(0, 0.0);
        let mut buf = Vec::new();
        write_histograms(&s, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "axis,value,trials\ncount,0,1\ncount,1,1\ncost,0,1\ncost,1.5,1\n"
        );
    }

    #[test]
    fn baseline_lists_pairs() {
        let text = baseline_report(&baseline(2, 3.5));
        assert!(text.contains("Positive pair 1: m1"));
        assert!(text.contains("N = 2"));
        assert!(text.contains("S = 3.500000"));
    }
}
