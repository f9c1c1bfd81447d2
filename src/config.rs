//! Pipeline configuration.
//!
//! Defaults build the Konkani Wikipedia dataset.
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::processing::frequency::FrequencyMode;
use crate::processing::split::SplitRatios;

pub const DUMP_URL: &str =
    "https://dumps.wikimedia.org/gomwiki/latest/gomwiki-latest-pages-articles.xml.bz2";
pub const DUMP_FILE: &str = "data/gomwiki-latest-pages-articles.xml.bz2";
pub const EXTRACTED_DIR: &str = "data/extracted";
pub const DATASET_DIR: &str = "data/dataset";
pub const REPO_NAME: &str = "anag007/asmitai_wiki_konkani_dataset";
pub const EXTRACTOR: &str = "wikiextractor";
pub const SEED: u64 = 42;
pub const MIN_TOKENS: usize = 10;
pub const HF_TOKEN_VAR: &str = "HF_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub dump_url: Url,
    pub dump_file: PathBuf,
    pub extracted_dir: PathBuf,
    pub dataset_dir: PathBuf,
    pub repo_name: String,
    pub extractor: String,
    pub ratios: SplitRatios,
    pub seed: u64,
    /// Articles need strictly more tokens than this to be kept.
    pub min_tokens: usize,
    pub frequency_mode: FrequencyMode,
    /// Gzip split files.
    pub compress: bool,
    /// Download the dump even if `dump_file` exists.
    pub force_redownload: bool,
    /// Run the extractor even if `extracted_dir` exists.
    pub force_reextract: bool,
    /// Package but do not publish.
    pub dry_run: bool,
    /// Hub token. Not read from the environment here: the command line falls back to `HF_TOKEN`.
    #[serde(skip_serializing)]
    pub hf_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // constant, known to be valid
            dump_url: Url::parse(DUMP_URL).expect("invalid default dump url"),
            dump_file: PathBuf::from(DUMP_FILE),
            extracted_dir: PathBuf::from(EXTRACTED_DIR),
            dataset_dir: PathBuf::from(DATASET_DIR),
            repo_name: REPO_NAME.to_string(),
            extractor: EXTRACTOR.to_string(),
            ratios: SplitRatios::default(),
            seed: SEED,
            min_tokens: MIN_TOKENS,
            frequency_mode: FrequencyMode::default(),
            compress: false,
            force_redownload: false,
            force_reextract: false,
            dry_run: false,
            hf_token: None,
        }
    }
}

impl Config {
    /// Default configuration rooted in `dir` (dump, extraction and dataset).
    pub fn with_data_dir(dir: &Path) -> Self {
        Self {
            dump_file: dir.join("gomwiki-latest-pages-articles.xml.bz2"),
            extracted_dir: dir.join("extracted"),
            dataset_dir: dir.join("dataset"),
            ..Default::default()
        }
    }

    /// Check everything the build steps rely on.
    pub fn validate_build(&self) -> Result<(), Error> {
        self.ratios.validate()?;

        if self.repo_name.is_empty() {
            return Err(Error::Config("empty repository name".to_string()));
        }
        Ok(())
    }

    /// [Config::validate_build], plus the presence of a token when publishing.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_build()?;

        if !self.dry_run && self.hf_token.is_none() {
            return Err(Error::Config(format!(
                "no Hugging Face token: set {} or use --hf-token (or --dry-run)",
                HF_TOKEN_VAR
            )));
        }
        Ok(())
    }
}
