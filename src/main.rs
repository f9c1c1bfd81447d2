//! # wikiscript
//!
//! Builds a script-labeled text dataset from a Wikipedia dump:
//! download, extraction, script tagging, train/validation/test split, publishing,
//! and per-split script frequency reporting.
//!
//! ```sh
//! # Konkani Wikipedia, published to the default repository (needs HF_TOKEN)
//! wikiscript
//!
//! # package only
//! wikiscript --dry-run
//! ```
//!
//! Log verbosity is set with `RUST_LOG` (`RUST_LOG=info wikiscript`).

use structopt::StructOpt;
use wikiscript::config::Config;
use wikiscript::error::Error;
use wikiscript::pipelines::{Pipeline, WikiDoc};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Wikiscript::from_args();
    let config = Config::try_from(opt)?;

    let pipeline = WikiDoc::new(config)?;
    let report = pipeline.run()?;

    debug!("load stats: {:?}", report.load);
    info!("dataset files are in {:?}", report.packaged.root());

    for (i, (split, frequencies)) in report.frequencies.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} Script Frequencies:", capitalize(split.name()));
        print!("{}", frequencies);
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
