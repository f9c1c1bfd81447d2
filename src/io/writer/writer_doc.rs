/*! Article writer for a given split.

Writes one JSON serialized [Article] per line, optionally gzipped.
!*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::{write::GzEncoder, Compression};
use log::debug;

use crate::error::Error;
use crate::pipelines::wikidoc::types::Article;

enum Handle {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for Handle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Handle::Plain(w) => w.write(buf),
            Handle::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Handle::Plain(w) => w.flush(),
            Handle::Gzip(w) => w.flush(),
        }
    }
}

pub struct WriterDoc {
    handle: Handle,
    path: PathBuf,
    nb_written: usize,
}

impl WriterDoc {
    /// File name used for `name`: `<name>.jsonl`, or `<name>.jsonl.gz` if `compress` is set.
    pub fn filename(name: &str, compress: bool) -> String {
        if compress {
            format!("{}.jsonl.gz", name)
        } else {
            format!("{}.jsonl", name)
        }
    }

    /// Create `dst/<name>.jsonl` (`.jsonl.gz` if `compress` is set), truncating an existing file.
    pub fn new(dst: &Path, name: &str, compress: bool) -> Result<Self, Error> {
        let path = dst.join(Self::filename(name, compress));
        debug!("opening {:?}", path);

        let file = BufWriter::new(File::create(&path)?);
        let handle = if compress {
            Handle::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            Handle::Plain(file)
        };

        Ok(Self {
            handle,
            path,
            nb_written: 0,
        })
    }

    pub fn write(&mut self, articles: &[Article]) -> Result<(), Error> {
        for article in articles {
            self.write_single(article)?;
        }
        Ok(())
    }

    pub fn write_single(&mut self, article: &Article) -> Result<(), Error> {
        serde_json::to_writer(&mut self.handle, article)?;
        self.handle.write_all(b"\n")?;
        self.nb_written += 1;
        Ok(())
    }

    /// Flush (and end the gzip stream if needed), returning the written file path.
    pub fn close(self) -> Result<PathBuf, Error> {
        let mut inner = match self.handle {
            Handle::Plain(w) => w,
            Handle::Gzip(w) => w.finish()?,
        };
        inner.flush()?;
        debug!("wrote {} articles to {:?}", self.nb_written, self.path);
        Ok(self.path)
    }

    /// Get a reference to the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
