use clap::Parser;
use std::path::PathBuf;

use spt::io_utils::{io_cli_error, require_csv, spt_cli_error};
use spt::{read_csv, sound_classes, wordlists, SptError};

#[derive(Parser)]
struct Args {
    /// Sound-class definitions
    #[arg(long, default_value = "./data/sounds.csv")]
    sounds: PathBuf,
    /// Wordlist table
    #[arg(long, default_value = "./data/wordlists.csv")]
    wordlists: PathBuf,
    /// Only dump these groups
    #[arg(long)]
    group: Vec<String>,
    /// Print the decoded lists as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    require_csv(&args.sounds)?;
    require_csv(&args.wordlists)?;

    let load = |path: &PathBuf, op: &str| {
        read_csv(path).map_err(|e| match e {
            SptError::Io(io) => io_cli_error(op, path, io),
            other => spt_cli_error(op, other),
        })
    };
    let classes = sound_classes(&load(&args.sounds, "reading sound classes")?)
        .map_err(|e| spt_cli_error("sound classes", e))?;
    let table = load(&args.wordlists, "reading wordlists")?;
    let selected = (!args.group.is_empty()).then_some(args.group.as_slice());
    let lists = wordlists(&table, &classes, selected).map_err(|e| spt_cli_error("wordlists", e))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }
    for list in &lists {
        println!("== {} ({} slots) ==", list.group, list.len());
        println!("{}", list.transformations());
    }
    Ok(())
}
