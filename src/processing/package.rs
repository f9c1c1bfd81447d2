/*! Packaging (prepping for distribution) utilities

A packaged dataset is a folder holding:
- `data/<split>.jsonl` (or `.jsonl.gz`) for each split,
- a `README.md` dataset card, declaring which file holds which split,
- a `checksums.sha384` file, _usually_ compatible with `sha384sum -c` implementations.
!*/
use std::fmt::Write as _;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use sha2::Digest;
use sha2::Sha384;

use crate::error::Error;
use crate::io::reader::DocReader;
use crate::io::writer::WriterDoc;
use crate::pipelines::wikidoc::types::Article;
use crate::processing::split::{SplitName, Splits};

/// Articles of each split.
pub type DatasetDict = Splits<Article>;

const DATA_DIR: &str = "data";
const CARD_FILE: &str = "README.md";
const CHECKSUM_FILE: &str = "checksums.sha384";

/// A dataset written on disk, ready to be published.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagedDataset {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl PackagedDataset {
    /// Get a reference to the dataset folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of packaged files, relative to [PackagedDataset::root].
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// compute the hash of the file pointed by the filepath by using [io::copy] between a file handler and the hasher.
#[inline]
fn get_hash(filepath: &Path, hasher: &mut Sha384) -> Result<String, Error> {
    let mut f = File::open(filepath)?;
    io::copy(&mut f, hasher)?;
    let result = format!("{:x}", hasher.finalize_reset());
    Ok(result)
}

/// Create checksum file for the provided files (relative to `root`).
fn gen_checksum_file(root: &Path, files: &[PathBuf]) -> Result<PathBuf, Error> {
    let mut hasher = Sha384::new();
    let checksum_filepath = root.join(CHECKSUM_FILE);

    debug!("writing hashes to: {:?}", checksum_filepath);
    let mut checksum_file = File::create(&checksum_filepath)?;

    for file in files {
        info!("hashing {:?}", file);
        let hash = get_hash(&root.join(file), &mut hasher)?;
        writeln!(&mut checksum_file, "{}  {}", hash, file.display())?;
    }

    Ok(checksum_filepath)
}

/// Build the dataset card, with the split/file mapping in its YAML header.
fn dataset_card(name: &str, dataset: &DatasetDict, data_files: &[(SplitName, PathBuf)]) -> String {
    let mut card = String::new();

    // writing to a String does not fail
    let _ = writeln!(card, "---");
    let _ = writeln!(card, "pretty_name: {}", name);
    let _ = writeln!(card, "configs:");
    let _ = writeln!(card, "- config_name: default");
    let _ = writeln!(card, "  data_files:");
    for (split, path) in data_files {
        let _ = writeln!(card, "  - split: {}", split);
        let _ = writeln!(card, "    path: {}", path.display());
    }
    let _ = writeln!(card, "---");
    let _ = writeln!(card);
    let _ = writeln!(card, "# {}", name);
    let _ = writeln!(card);
    let _ = writeln!(
        card,
        "Wikipedia articles, each tagged with the writing scripts found in its text."
    );
    let _ = writeln!(card);
    let _ = writeln!(card, "| split | articles |");
    let _ = writeln!(card, "|---|---|");
    for (split, articles) in dataset.iter() {
        let _ = writeln!(card, "| {} | {} |", split, articles.len());
    }
    let _ = writeln!(card);
    let _ = writeln!(
        card,
        "The `script` field holds the detected scripts (devanagari, roman, kannada, malayalam, perso-arabic, goykanadi), joined by `, `. It is empty when none was found."
    );

    card
}

/// Write `dataset` into `dst`, creating the folder if needed.
///
/// Existing files are overwritten, and split files written with the other
/// compression setting are removed.
pub fn package(
    dataset: &DatasetDict,
    dst: &Path,
    name: &str,
    compress: bool,
) -> Result<PackagedDataset, Error> {
    let data_dir = dst.join(DATA_DIR);
    std::fs::create_dir_all(&data_dir)?;

    info!("packaging dataset into {:?}", dst);

    let mut data_files = Vec::with_capacity(3);
    for (split, articles) in dataset.iter() {
        let stale = data_dir.join(WriterDoc::filename(split.name(), !compress));
        if stale.exists() {
            debug!("removing stale {:?}", stale);
            std::fs::remove_file(&stale)?;
        }

        let mut writer = WriterDoc::new(&data_dir, split.name(), compress)?;
        writer.write(articles)?;
        let path = writer.close()?;

        let relative = path
            .strip_prefix(dst)
            .map_err(|e| Error::Custom(e.to_string()))?
            .to_path_buf();
        info!("[{}] {} articles written to {:?}", split, articles.len(), relative);
        data_files.push((split, relative));
    }

    std::fs::write(dst.join(CARD_FILE), dataset_card(name, dataset, &data_files))?;

    let mut files: Vec<PathBuf> = data_files.into_iter().map(|(_, path)| path).collect();
    files.push(PathBuf::from(CARD_FILE));

    gen_checksum_file(dst, &files)?;
    files.push(PathBuf::from(CHECKSUM_FILE));

    Ok(PackagedDataset {
        root: dst.to_path_buf(),
        files,
    })
}

/// Read a packaged dataset back.
///
/// Unlike extraction output, packaged files are expected to be valid:
/// any malformed line is an error, and so is a split present both plain and gzipped.
pub fn load(src: &Path) -> Result<DatasetDict, Error> {
    let data_dir = src.join(DATA_DIR);

    let read_split = |split: SplitName| -> Result<Vec<Article>, Error> {
        let plain = data_dir.join(WriterDoc::filename(split.name(), false));
        let gzipped = data_dir.join(WriterDoc::filename(split.name(), true));
        let path = match (plain.exists(), gzipped.exists()) {
            (true, false) => plain,
            (false, true) => gzipped,
            (true, true) => {
                return Err(Error::Custom(format!(
                    "ambiguous {} split: both {:?} and {:?} exist",
                    split, plain, gzipped
                )))
            }
            (false, false) => {
                return Err(Error::Custom(format!(
                    "no {} split found in {:?}",
                    split, data_dir
                )))
            }
        };

        DocReader::from_path(&path)?.collect()
    };

    Ok(DatasetDict {
        train: read_split(SplitName::Train)?,
        validation: read_split(SplitName::Validation)?,
        test: read_split(SplitName::Test)?,
    })
}
