//! Wikipedia dump to script-labeled dataset pipeline
//!
//! # Processing
//! 1. The dump is downloaded, unless it is already there.
//! 1. Article text is extracted by an external tool, unless the extraction folder is already there.
//! 1. Extracted articles are loaded. Malformed lines are skipped and short articles are filtered out.
//! 1. Remaining articles are tagged with the scripts their text contains.
//! 1. Articles are split into train/validation/test, and script frequencies are computed for each split.
//! 1. The splits are packaged and published.
//!
//! Skipping of the first two steps can be overridden by `force_redownload`/`force_reextract`.
use std::path::Path;

use log::{debug, info, warn};

use crate::config::Config;
use crate::download::Downloader;
use crate::error::Error;
use crate::extract::Extractor;
use crate::filtering::{Filter, MinTokens};
use crate::io::reader::Corpus;
use crate::pipelines::pipeline::Pipeline;
use crate::processing::frequency::{
    self, calculate_script_frequencies_with, FrequencyMode, ScriptFrequencies,
};
use crate::processing::package::{self, PackagedDataset};
use crate::processing::split::{self, SplitName};
use crate::publish::{DryRun, HubPublisher, Publish};
use crate::transformers::{Annotate, Annotator, ScriptTagger};

use super::types::Article;

pub const FREQUENCIES_FILE: &str = "frequencies.csv";

/// Whether a stage has to run, given its force flag and whether its output is already there.
pub fn needs_run(force: bool, target_exists: bool) -> bool {
    force || !target_exists
}

/// Counters of the loading step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Valid records read.
    pub nb_read: usize,
    /// Lines that could not be parsed.
    pub nb_malformed: usize,
    /// Valid records discarded by the filter.
    pub nb_filtered: usize,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct Report {
    pub load: LoadStats,
    pub frequencies: Vec<(SplitName, ScriptFrequencies)>,
    pub packaged: PackagedDataset,
}

/// Load extracted articles located in `src`.
///
/// Articles that do not pass `filter` are dropped, the others are annotated.
/// Malformed lines are logged and skipped; IO errors stop the loading.
pub fn load_articles<F>(
    src: &Path,
    filter: &F,
    annotator: &dyn Annotate<Article>,
) -> Result<(Vec<Article>, LoadStats), Error>
where
    F: for<'a> Filter<&'a Article>,
{
    info!("Loading extracted data from {:?}...", src);
    let corpus = Corpus::new(src)?;

    let mut stats = LoadStats::default();
    let mut articles = Vec::new();

    for reader in corpus.readers() {
        for article in reader? {
            let mut article = match article {
                Ok(article) => article,
                Err(e @ Error::MalformedRecord { .. }) => {
                    warn!("skipping {}", e);
                    stats.nb_malformed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            stats.nb_read += 1;

            if !filter.detect(&article) {
                stats.nb_filtered += 1;
                continue;
            }

            annotator.annotate(&mut article);
            articles.push(article);
        }
    }

    info!(
        "Loaded {} articles ({} filtered out, {} malformed lines).",
        articles.len(),
        stats.nb_filtered,
        stats.nb_malformed
    );
    Ok((articles, stats))
}

/// Frequencies of a split, or an empty table when there is nothing to count.
///
/// Splits are never empty, but in marginal mode a split of script-less articles has no script to count.
fn frequencies_or_empty<'a>(
    split: SplitName,
    labels: impl Iterator<Item = &'a str>,
    mode: FrequencyMode,
) -> Result<ScriptFrequencies, Error> {
    match calculate_script_frequencies_with(labels, mode) {
        Err(Error::EmptyInput) => {
            warn!("[{}] no script to count, reporting an empty table", split);
            Ok(ScriptFrequencies::default())
        }
        other => other,
    }
}

pub struct WikiDoc {
    config: Config,
    publisher: Box<dyn Publish>,
}

impl WikiDoc {
    /// Build the pipeline, publishing to the Hub unless `dry_run` is set.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        let publisher: Box<dyn Publish> = match (&config.hf_token, config.dry_run) {
            (_, true) => Box::new(DryRun),
            (Some(token), false) => Box::new(HubPublisher::new(&config.repo_name, token)?),
            (None, false) => {
                return Err(Error::Config("missing Hugging Face token".to_string()))
            }
        };

        Ok(Self { config, publisher })
    }

    /// Build the pipeline with a custom publisher.
    ///
    /// The token is not checked, `publisher` handles authentication.
    pub fn with_publisher(config: Config, publisher: Box<dyn Publish>) -> Result<Self, Error> {
        config.validate_build()?;
        Ok(Self { config, publisher })
    }

    /// Get a reference to the pipeline configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn acquire_dump(&self) -> Result<(), Error> {
        let dump_file = &self.config.dump_file;
        if needs_run(self.config.force_redownload, dump_file.exists()) {
            Downloader::new()?.download(&self.config.dump_url, dump_file)?;
        } else {
            info!("{:?} already exists. Skipping download.", dump_file);
        }
        Ok(())
    }

    fn extract(&self) -> Result<(), Error> {
        let dst = &self.config.extracted_dir;
        if needs_run(self.config.force_reextract, dst.exists()) {
            Extractor::new(&self.config.extractor).extract(&self.config.dump_file, dst)?;
        } else {
            info!("{:?} already exists. Skipping extraction.", dst);
        }
        Ok(())
    }

    fn annotator(&self) -> Annotator<Article> {
        let mut annotator = Annotator::default();
        annotator.add(Box::new(ScriptTagger));
        annotator
    }
}

impl Pipeline<Report> for WikiDoc {
    fn run(&self) -> Result<Report, Error> {
        // serialized form leaves the token out
        debug!(
            "running with {}",
            serde_json::to_string_pretty(&self.config).unwrap_or_default()
        );

        self.acquire_dump()?;
        self.extract()?;

        let filter = MinTokens::new(self.config.min_tokens);
        let (articles, load) =
            load_articles(&self.config.extracted_dir, &filter, &self.annotator())?;

        if articles.is_empty() {
            return Err(Error::InsufficientData(format!(
                "no article left after loading {:?}",
                self.config.extracted_dir
            )));
        }

        let dataset = split::split(articles, &self.config.ratios, self.config.seed)?;

        let frequencies = dataset
            .iter()
            .map(|(name, articles)| {
                let labels = articles.iter().map(Article::script);
                frequencies_or_empty(name, labels, self.config.frequency_mode)
                    .map(|freqs| (name, freqs))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let packaged = package::package(
            &dataset,
            &self.config.dataset_dir,
            &self.config.repo_name,
            self.config.compress,
        )?;

        self.publisher.publish(&packaged)?;

        // not part of the published files
        frequency::write_csv(&self.config.dataset_dir.join(FREQUENCIES_FILE), &frequencies)?;

        Ok(Report {
            load,
            frequencies,
            packaged,
        })
    }
}
