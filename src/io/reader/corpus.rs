/*! Extraction output discovery.

The extractor writes its output in a tree of subdirectories (`AA/wiki_00`, `AA/wiki_01`, ..., `AB/wiki_00`...).
Every regular file of the tree is considered to be a JSON Lines file.
!*/
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Error;

use super::docreader::DocReader;

#[derive(Debug)]
pub struct Corpus {
    files: Vec<PathBuf>,
}

impl Corpus {
    /// List every file under `src`, sorted by path.
    pub fn new(src: &Path) -> Result<Self, Error> {
        if !src.is_dir() {
            return Err(Error::Custom(format!(
                "extraction directory {:?} does not exist",
                src
            )));
        }

        let src_str = src
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid source path: {:?}", src)))?;
        let pattern = format!("{}/**/*", glob::Pattern::escape(src_str));

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let entry = entry?;
            if entry.is_file() {
                files.push(entry);
            }
        }
        files.sort();

        debug!("found {} extracted files in {:?}", files.len(), src);
        Ok(Self { files })
    }

    /// Get a reference to the corpus files.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Open a reader on each file, in order.
    pub fn readers(&self) -> impl Iterator<Item = Result<DocReader, Error>> + '_ {
        self.files.iter().map(|path| DocReader::from_path(path))
    }
}
