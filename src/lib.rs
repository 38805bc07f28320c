//! Permutation test for lexical similarity between two Swadesh wordlists.
//!
//! Word forms are reduced to two-symbol sound-class skeletons
//! ([`decoder`]), aligned by Swadesh slot ([`word`]) and compared. The
//! observed number (and weighted cost) of matching slots is then measured
//! against a null distribution built by re-pairing the slots at random
//! ([`permutation`]).
//!
//! ```no_run
//! use spt::{read_csv, run_test, sound_classes, wordlists, RunConfig, WeightTable};
//!
//! # fn main() -> Result<(), spt::SptError> {
//! let classes = sound_classes(&read_csv("sounds.csv")?)?;
//! let lists = wordlists(&read_csv("wordlists.csv")?, &classes, None)?;
//! let cfg = RunConfig { trials: 10_000, ..RunConfig::default() };
//! let run = run_test(&lists[0], &lists[1], &WeightTable::uniform(), &cfg)?;
//! println!("P (counts) = {}", run.summary.p_counts());
//! # Ok(())
//! # }
//! ```

pub mod calibrate;
pub mod config;
pub mod decoder;
pub mod error;
pub mod io_utils;
pub mod permutation;
pub mod sound_class;
pub mod stats;
pub mod tabular;
pub mod weights;
pub mod word;

pub use calibrate::{calibrate, empirical_fraction, quadratic_fit};
pub use config::{hardware_concurrency, RunConfig};
pub use decoder::{decode_form, DecodedSet};
pub use error::SptError;
pub use permutation::{run_test, TestRun};
pub use sound_class::{ClassRole, ClassRow, SoundClassTable};
pub use stats::{baseline_report, write_histograms, Bucket, Summary};
pub use tabular::{
    class_rows, read_csv, reference_sample, sound_classes, weight_table, wordlists, Table,
};
pub use weights::WeightTable;
pub use word::{combine_all, skeletons_match, Comparison, Word, WordList};
