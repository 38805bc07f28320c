use clap::Parser;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use spt::io_utils::{
    expand_path, io_cli_error, require_csv, simple_cli_error, spt_cli_error, CliError,
};
use spt::{
    baseline_report, calibrate, combine_all, read_csv, reference_sample, run_test, sound_classes,
    weight_table, wordlists, write_histograms, RunConfig, SoundClassTable, SptError, Table,
    WeightTable, WordList,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Permutation test of lexical similarity between Swadesh wordlists.
#[derive(Parser)]
#[command(name = "spt")]
struct Args {
    /// Sound-class definitions (CSV rows: members, class name)
    #[arg(long, default_value = "./data/sounds.csv")]
    sounds: PathBuf,
    /// Wordlist table (CSV: id, gloss, one column per group)
    #[arg(long, default_value = "./data/wordlists.csv")]
    wordlists: PathBuf,
    /// Wordlist table folded into composite list A (AB mode)
    #[arg(long, requires = "set_b")]
    set_a: Option<PathBuf>,
    /// Wordlist table folded into composite list B (AB mode)
    #[arg(long, requires = "set_a")]
    set_b: Option<PathBuf>,
    /// Slot weights (CSV rows: id, gloss, weight); enables weighted mode
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Reference sample used to calibrate P(costs) above 0.1
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Report file; group names are appended to the file stem
    #[arg(long)]
    output: Option<PathBuf>,
    /// Per-word decoding traces; group name is appended to the file stem
    #[arg(long)]
    transformations: Option<PathBuf>,
    /// Count and cost histograms as CSV; group names are appended
    #[arg(long)]
    histogram_csv: Option<PathBuf>,
    /// Print one JSON summary line per run to stdout; the text report moves
    /// to stderr unless --output is given
    #[arg(long)]
    json: bool,
    /// First language to compare
    #[arg(long, requires = "lang_2")]
    lang_1: Option<String>,
    /// Second language to compare
    #[arg(long, requires = "lang_1")]
    lang_2: Option<String>,
    /// Compare every pair of wordlists in the table
    #[arg(long)]
    all_pairs: bool,
    /// Number of random re-pairings
    #[arg(long, default_value_t = 1_000_000)]
    num_trials: u64,
    /// Worker threads (defaults to the number of logical CPUs)
    #[arg(long)]
    workers: Option<usize>,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Show a progress bar
    #[arg(long)]
    progress: bool,
    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    let cfg = RunConfig {
        trials: args.num_trials,
        workers: args.workers,
        seed: args.seed,
        verbose: args.verbose,
        progress: args.progress,
        ..RunConfig::default()
    };
    cfg.validate()
        .map_err(|e| spt_cli_error("invalid arguments", e))?;

    let weighted = args.weights.is_some();
    let weights = match &args.weights {
        Some(path) => load_weights(path, args.verbose),
        None => WeightTable::uniform(),
    };
    let reference = match &args.reference {
        Some(path) => {
            let table = load_table(path, "reading reference sample")?;
            let sample =
                reference_sample(&table).map_err(|e| spt_cli_error("reference sample", e))?;
            Some(sample)
        }
        None => None,
    };

    let classes = load_table(&args.sounds, "reading sound classes")?;
    let classes = sound_classes(&classes).map_err(|e| spt_cli_error("sound classes", e))?;

    let pairs = match (&args.set_a, &args.set_b) {
        (Some(a), Some(b)) => vec![(composite(a, &classes)?, composite(b, &classes)?)],
        _ => select_pairs(&args, &classes)?,
    };

    let session = Session {
        args: &args,
        cfg: &cfg,
        weights: &weights,
        weighted,
        reference: reference.as_deref(),
    };
    for (l1, l2) in &pairs {
        session.test_pair(l1, l2)?;
    }

    if let Some(path) = &args.transformations {
        let mut written: Vec<&str> = Vec::new();
        for list in pairs.iter().flat_map(|(a, b)| [a, b]) {
            if written.contains(&list.group.as_str()) {
                continue;
            }
            let target = expand_path(path, &[&list.group]);
            fs::write(&target, list.transformations())
                .map_err(|e| io_cli_error("writing transformations", &target, e))?;
            written.push(&list.group);
        }
    }

    Ok(())
}

fn load_table(path: &Path, operation: &str) -> Result<Table, CliError> {
    require_csv(path)?;
    read_csv(path).map_err(|e| match e {
        SptError::Io(io) => io_cli_error(operation, path, io),
        other => spt_cli_error(operation, other),
    })
}

/// Weight tables that fail to load fall back to uniform weights.
fn load_weights(path: &Path, verbose: bool) -> WeightTable {
    let loaded = match load_table(path, "reading weights") {
        Ok(table) => weight_table(&table).map_err(|e| spt_cli_error("weights", e)),
        Err(e) => Err(e),
    };
    match loaded {
        Ok(table) => {
            if verbose {
                eprintln!("Found swadesh ID weights:");
                for (id, weight) in table.sorted() {
                    eprintln!("{id}\t<-->\t{weight:.6}");
                }
            }
            table
        }
        Err(e) => {
            eprintln!(
                "Failed to open weight file {} ({e}), using default weights (1.0)",
                path.display()
            );
            WeightTable::uniform()
        }
    }
}

fn composite(path: &Path, classes: &SoundClassTable) -> CliResult<WordList> {
    let table = load_table(path, "reading wordlists")?;
    let lists =
        wordlists(&table, classes, None).map_err(|e| spt_cli_error("decoding wordlists", e))?;
    let Some(list) = combine_all(&lists) else {
        let msg = format!("no wordlists found in '{}'", path.display());
        return Err(simple_cli_error(&msg).into());
    };
    Ok(list)
}

fn select_pairs(args: &Args, classes: &SoundClassTable) -> CliResult<Vec<(WordList, WordList)>> {
    let selected = match (&args.lang_1, &args.lang_2) {
        (Some(a), Some(b)) => Some(vec![a.clone(), b.clone()]),
        _ => None,
    };
    let table = load_table(&args.wordlists, "reading wordlists")?;
    let lists = wordlists(&table, classes, selected.as_deref())
        .map_err(|e| spt_cli_error("decoding wordlists", e))?;
    if lists.len() < 2 {
        return Err(simple_cli_error(&format!(
            "need at least two wordlists to compare, found {}",
            lists.len()
        ))
        .into());
    }
    eprintln!("n = {} (number of compared pairs)", lists[0].len());

    let mut pairs = Vec::new();
    if args.all_pairs {
        for i in 0..lists.len() {
            for j in i + 1..lists.len() {
                pairs.push((lists[i].clone(), lists[j].clone()));
            }
        }
    } else {
        pairs.push((lists[0].clone(), lists[1].clone()));
    }
    Ok(pairs)
}

struct Session<'a> {
    args: &'a Args,
    cfg: &'a RunConfig,
    weights: &'a WeightTable,
    weighted: bool,
    reference: Option<&'a [f64]>,
}

impl Session<'_> {
    /// Test one pair. Weighted mode runs both directions and reports the
    /// larger P(costs).
    ///
    /// With `--json` and no `--output` the text report goes to stderr so
    /// stdout carries JSON only.
    fn test_pair(&self, l1: &WordList, l2: &WordList) -> CliResult<()> {
        let mut out: Box<dyn Write> = match &self.args.output {
            Some(path) => {
                let target = expand_path(path, &[&l1.group, &l2.group]);
                let file = File::create(&target)
                    .map_err(|e| io_cli_error("creating report file", &target, e))?;
                Box::new(io::BufWriter::new(file))
            }
            None if self.args.json => Box::new(io::stderr().lock()),
            None => Box::new(io::stdout().lock()),
        };

        let forward = self.test_direction(l1, l2, &mut out)?;
        if self.weighted {
            let backward = self.test_direction(l2, l1, &mut out)?;
            let (max_p, first, second) = if backward > forward {
                (backward, &l2.group, &l1.group)
            } else {
                (forward, &l1.group, &l2.group)
            };
            writeln!(
                out,
                "\n[FINAL] Max P(costs) = {max_p:.6} ({first}, {second})"
            )?;
            if let Some(reference) = self.reference {
                let calibrated =
                    calibrate(max_p, reference).map_err(|e| spt_cli_error("calibration", e))?;
                writeln!(out, "Calibrated Max P(costs) = {calibrated:.6}")?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Run one direction and return its P(costs).
    fn test_direction(&self, l1: &WordList, l2: &WordList, out: &mut dyn Write) -> CliResult<f64> {
        writeln!(out, "\n[Comparing {} with {}]", l1.group, l2.group)?;
        let start = Instant::now();
        let run = run_test(l1, l2, self.weights, self.cfg)
            .map_err(|e| spt_cli_error("permutation test", e))?;
        let elapsed = start.elapsed();

        write!(out, "{}", baseline_report(&run.baseline))?;
        write!(out, "{}", run.summary.report(self.weighted))?;

        if let Some(path) = &self.args.histogram_csv {
            let target = expand_path(path, &[&l1.group, &l2.group]);
            let file = File::create(&target)
                .map_err(|e| io_cli_error("creating histogram csv", &target, e))?;
            write_histograms(&run.summary, file).map_err(|e| spt_cli_error("histogram csv", e))?;
        }

        if self.args.json {
            let out_json = serde_json::json!({
                "group_a": l1.group,
                "group_b": l2.group,
                "trials": run.summary.trials,
                "baseline_count": run.summary.baseline_count,
                "baseline_cost": run.summary.baseline_cost,
                "p_counts": run.summary.p_counts(),
                "p_costs": run.summary.p_costs(),
                "counts": run.summary.count_buckets(),
                "costs": run.summary.cost_buckets(),
                "elapsed_ms": elapsed.as_millis(),
            });
            println!("{}", serde_json::to_string(&out_json)?);
        }

        Ok(run.summary.p_costs())
    }
}
