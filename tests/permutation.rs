use proptest::prelude::*;
use spt::{
    decode_form, run_test, ClassRow, RunConfig, SoundClassTable, SptError, WeightTable, Word,
    WordList,
};

fn classes() -> SoundClassTable {
    SoundClassTable::build(&[
        ClassRow::new("Hh", "Laryngeals"),
        ClassRow::new("Vaeiou", "Vowels and features"),
        ClassRow::new("j", "Glides"),
        ClassRow::new("w", "Labial glides"),
        ClassRow::new("Pbp", "Labials"),
        ClassRow::new("Tdt", "Dentals"),
        ClassRow::new("Kgk", "Velars"),
    ])
    .unwrap()
}

fn list(group: &str, forms: &[&str]) -> WordList {
    let classes = classes();
    let words = forms
        .iter()
        .enumerate()
        .map(|(idx, form)| {
            let mut word = Word::new(idx as u32 + 1, format!("gloss{}", idx + 1), group);
            word.push_form(form, decode_form(&classes, form));
            word
        })
        .collect();
    WordList::new(group, words)
}

fn cfg(trials: u64, workers: usize) -> RunConfig {
    RunConfig {
        trials,
        workers: Some(workers),
        seed: Some(7),
        ..RunConfig::default()
    }
}

#[test]
fn baseline_counts_aligned_matches() {
    let a = list("A", &["aaa", "aaa", "aaa", "bbbb"]);
    let b = list("B", &["aaa", "bbbb", "aaa", "bbbb"]);
    let run = run_test(&a, &b, &WeightTable::uniform(), &cfg(1_000, 3)).unwrap();
    assert_eq!(run.baseline.count(), 3);
    assert_eq!(run.summary.baseline_count, 3);
    assert_eq!(run.summary.trials, 1_000);
    // three "aaa" in A against two in B: at most 3 matches, at least 1
    let counts = &run.summary.counts;
    assert!(counts.keys().all(|&k| (1..=3).contains(&k)));
    assert!(run.summary.total_counts > 0);
    assert!(run.summary.p_counts() <= 1.0);
}

#[test]
fn length_mismatch_rejected() {
    let a = list("A", &["pat", "tak"]);
    let b = list("B", &["pat"]);
    let err = run_test(&a, &b, &WeightTable::uniform(), &cfg(10, 2)).unwrap_err();
    assert!(matches!(err, SptError::LengthMismatch { left: 2, right: 1 }));
}

#[test]
fn zero_workers_rejected() {
    let a = list("A", &["pat"]);
    let err = run_test(&a, &a, &WeightTable::uniform(), &cfg(10, 0)).unwrap_err();
    assert!(matches!(err, SptError::Config(_)));
}

#[test]
fn seeded_runs_are_reproducible_across_worker_counts() {
    let a = list("A", &["pat", "tak", "kip", "bat", "dag", "gob"]);
    let b = list("B", &["pit", "tok", "kap", "tab", "gad", "bog"]);
    let w = WeightTable::uniform();
    let one = run_test(&a, &b, &w, &cfg(2_000, 1)).unwrap();
    let four = run_test(&a, &b, &w, &cfg(2_000, 4)).unwrap();
    assert_eq!(one.summary, four.summary);
}

#[test]
fn weighted_cost_follows_fixed_list() {
    let a = list("A", &["pat", "tak"]);
    let b = list("B", &["pit", "tok"]);
    let weights = WeightTable::from_pairs([(1, 40.0), (2, 50.0)]).unwrap();
    let run = run_test(&a, &b, &weights, &cfg(500, 2)).unwrap();
    assert_eq!(run.baseline.cost, 90.0);
    assert_eq!(run.summary.baseline_cost, 90.0);
    // the swapped order matches nothing, the identity matches both
    for (cost, _) in &run.summary.costs {
        assert!(cost.into_inner() == 0.0 || cost.into_inner() == 90.0);
    }
    let full_matches = run.summary.counts.get(&2).copied().unwrap_or(0);
    assert_eq!(run.summary.total_cost, full_matches);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn histograms_account_for_every_trial(trials in 0u64..300, workers in 1usize..5) {
        let a = list("A", &["pat", "tak", "kip", "aaa"]);
        let b = list("B", &["pit", "kap", "tok", "ha"]);
        let run = run_test(&a, &b, &WeightTable::uniform(), &cfg(trials, workers)).unwrap();
        let s = &run.summary;
        prop_assert_eq!(s.trials, trials);
        prop_assert_eq!(s.counts.values().sum::<u64>(), trials);
        prop_assert_eq!(s.costs.values().sum::<u64>(), trials);
        // with uniform weights cost equals count
        prop_assert_eq!(s.total_cost, s.total_counts);
        prop_assert!(s.total_counts <= trials);
    }
}
