/*! JSON Lines article reader.

Each non-blank line is parsed as a single [Article]. A line that is not a valid article
(including lines that are not valid UTF-8) yields an [Error::MalformedRecord]
and reading goes on with the next line.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Split};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::Error;
use crate::pipelines::wikidoc::types::Article;

#[derive(Debug)]
pub struct Reader<T>
where
    T: Read,
{
    lines: Split<BufReader<T>>,
    path: PathBuf,
    line_nb: usize,
}

pub type DocReader = Reader<Box<dyn Read>>;

impl DocReader {
    /// Open a (possibly gzipped, if the extension is `.gz`) JSON Lines file.
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let handle = File::open(src)?;
        let inner: Box<dyn Read> = match src.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Box::new(MultiGzDecoder::new(BufReader::new(handle))),
            _ => Box::new(handle),
        };

        Ok(Reader::new(inner, src))
    }
}

impl<T> Reader<T>
where
    T: Read,
{
    /// `path` is only used to locate errors.
    pub fn new(inner: T, path: &Path) -> Self {
        Self {
            lines: BufReader::new(inner).split(b'\n'),
            path: path.to_path_buf(),
            line_nb: 0,
        }
    }
}

impl<T> Iterator for Reader<T>
where
    T: Read,
{
    type Item = Result<Article, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_nb += 1;

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            return Some(
                serde_json::from_slice::<Article>(&line).map_err(|e| Error::MalformedRecord {
                    path: self.path.clone(),
                    line: self.line_nb,
                    reason: e.to_string(),
                }),
            );
        }
    }
}
