//! Command line arguments and parameters management/parsing.
//!
//! Every argument is optional: running without any reproduces the default Konkani dataset build.
use std::path::PathBuf;

use reqwest::Url;
use structopt::StructOpt;

use wikiscript::config::{self, Config};
use wikiscript::error::Error;
use wikiscript::processing::frequency::FrequencyMode;
use wikiscript::processing::split::SplitRatios;

#[derive(StructOpt)]
#[structopt(
    name = "wikiscript",
    about = "Builds a script-labeled dataset from a Wikipedia dump and publishes it."
)]
/// Pipeline parameters.
///
/// ```sh
/// USAGE:
///     wikiscript [FLAGS] [OPTIONS]
///
/// FLAGS:
///         --compress            gzip split files
///         --dry-run             package the dataset but do not publish it
///         --force-redownload    download the dump even if it is already there
///         --force-reextract     run the extractor even if the extraction folder is already there
/// ```
pub struct Wikiscript {
    #[structopt(long = "dump-url", help = "dump location", default_value = config::DUMP_URL)]
    pub dump_url: Url,
    #[structopt(
        long = "dump-file",
        parse(from_os_str),
        help = "dump destination",
        default_value = config::DUMP_FILE
    )]
    pub dump_file: PathBuf,
    #[structopt(
        long = "extracted-dir",
        parse(from_os_str),
        help = "extraction destination",
        default_value = config::EXTRACTED_DIR
    )]
    pub extracted_dir: PathBuf,
    #[structopt(
        long = "dataset-dir",
        parse(from_os_str),
        help = "packaged dataset destination",
        default_value = config::DATASET_DIR
    )]
    pub dataset_dir: PathBuf,
    #[structopt(long = "repo", help = "dataset repository id", default_value = config::REPO_NAME)]
    pub repo_name: String,
    #[structopt(
        long = "extractor",
        help = "extractor program (called as <extractor> --json -o <dir> <dump>)",
        default_value = config::EXTRACTOR
    )]
    pub extractor: String,
    #[structopt(long = "train", help = "train split ratio", default_value = "0.8")]
    pub train: f64,
    #[structopt(long = "validation", help = "validation split ratio", default_value = "0.1")]
    pub validation: f64,
    #[structopt(long = "test", help = "test split ratio", default_value = "0.1")]
    pub test: f64,
    #[structopt(long = "seed", help = "split seed", default_value = "42")]
    pub seed: u64,
    #[structopt(
        long = "min-tokens",
        help = "articles need more tokens than this to be kept",
        default_value = "10"
    )]
    pub min_tokens: usize,
    #[structopt(
        long = "frequency-mode",
        help = "combination (joined labels are counted as is) or marginal (each script is counted)",
        default_value = "combination"
    )]
    pub frequency_mode: FrequencyMode,
    #[structopt(long = "compress", help = "gzip split files")]
    pub compress: bool,
    #[structopt(long = "force-redownload", help = "download the dump even if it is already there")]
    pub force_redownload: bool,
    #[structopt(
        long = "force-reextract",
        help = "run the extractor even if the extraction folder is already there"
    )]
    pub force_reextract: bool,
    #[structopt(long = "dry-run", help = "package the dataset but do not publish it")]
    pub dry_run: bool,
    #[structopt(long = "hf-token", help = "Hugging Face token. Defaults to $HF_TOKEN.")]
    pub hf_token: Option<String>,
}

impl TryFrom<Wikiscript> for Config {
    type Error = Error;

    fn try_from(w: Wikiscript) -> Result<Self, Self::Error> {
        Ok(Config {
            dump_url: w.dump_url,
            dump_file: w.dump_file,
            extracted_dir: w.extracted_dir,
            dataset_dir: w.dataset_dir,
            repo_name: w.repo_name,
            extractor: w.extractor,
            ratios: SplitRatios::new(w.train, w.validation, w.test)?,
            seed: w.seed,
            min_tokens: w.min_tokens,
            frequency_mode: w.frequency_mode,
            compress: w.compress,
            force_redownload: w.force_redownload,
            force_reextract: w.force_reextract,
            dry_run: w.dry_run,
            hf_token: w
                .hf_token
                .or_else(|| std::env::var(config::HF_TOKEN_VAR).ok()),
        })
    }
}
