//! Text extraction.
//!
//! Extraction is delegated to [WikiExtractor](https://github.com/attardi/wikiextractor),
//! run as a subprocess. With `--json`, it writes one JSON object per article and per line,
//! in files spread in subdirectories of the output folder.
//!
//! The extractor writes into `<dst>.part`, which replaces `dst` only once the extractor succeeded.
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};

use crate::error::Error;

/// External extractor invocation.
#[derive(Debug, Clone)]
pub struct Extractor {
    program: OsString,
}

impl Extractor {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the extractor.
    fn args<'a>(dump: &'a Path, dst: &'a Path) -> [&'a OsStr; 4] {
        [
            OsStr::new("--json"),
            OsStr::new("-o"),
            dst.as_os_str(),
            dump.as_os_str(),
        ]
    }

    /// Extract `dump` into `dst`, replacing its previous content.
    ///
    /// Fails if the program cannot be started or exits with a non-zero status.
    /// `dst` is left untouched on failure.
    pub fn extract(&self, dump: &Path, dst: &Path) -> Result<(), Error> {
        info!("Extracting text from {:?}...", dump);

        let part = part_dir(dst);
        if part.exists() {
            debug!("removing leftover {:?}", part);
            std::fs::remove_dir_all(&part)?;
        }
        std::fs::create_dir_all(&part)?;

        if let Err(e) = self.run(dump, &part) {
            if let Err(rm) = std::fs::remove_dir_all(&part) {
                warn!("could not remove {:?}: {}", part, rm);
            }
            return Err(e);
        }

        if dst.exists() {
            std::fs::remove_dir_all(dst)?;
        }
        std::fs::rename(&part, dst)?;

        info!("Extraction completed. Extracted files are in {:?}", dst);
        Ok(())
    }

    fn run(&self, dump: &Path, dst: &Path) -> Result<(), Error> {
        let output = Command::new(&self.program)
            .args(Self::args(dump, dst))
            .output()
            .map_err(|e| {
                Error::Extractor(format!("failed to run {:?}: {}", self.program, e))
            })?;

        debug!(
            "extractor stderr:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );

        if !output.status.success() {
            return Err(Error::Extractor(format!(
                "{:?} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Temporary extraction folder.
fn part_dir(dst: &Path) -> PathBuf {
    let mut part = dst.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new("wikiextractor")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{part_dir, Extractor};
    use crate::error::Error;

    #[test]
    fn args() {
        let args = Extractor::args(Path::new("dump.xml.bz2"), Path::new("out"));
        assert_eq!(args, ["--json", "-o", "out", "dump.xml.bz2"].map(std::ffi::OsStr::new));
    }

    #[test]
    fn missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let e = Extractor::new("this-extractor-does-not-exist");
        let res = e.extract(Path::new("dump.xml.bz2"), &dir.path().join("out"));
        assert!(matches!(res, Err(Error::Extractor(_))));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program() {
        let dir = tempfile::tempdir().unwrap();
        let e = Extractor::new("false");
        let res = e.extract(Path::new("dump.xml.bz2"), &dir.path().join("out"));
        assert!(matches!(res, Err(Error::Extractor(_))));
    }

    #[cfg(unix)]
    #[test]
    fn failure_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let res = Extractor::new("false").extract(Path::new("dump.xml.bz2"), &out);

        assert!(res.is_err());
        assert!(!out.exists());
        assert!(!part_dir(&out).exists());
    }

    #[cfg(unix)]
    #[test]
    fn failure_keeps_previous_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(out.join("AA")).unwrap();
        std::fs::write(out.join("AA/wiki_00"), "previous").unwrap();

        let res = Extractor::new("false").extract(Path::new("dump.xml.bz2"), &out);

        assert!(res.is_err());
        assert_eq!(
            std::fs::read_to_string(out.join("AA/wiki_00")).unwrap(),
            "previous"
        );
    }

    #[cfg(unix)]
    #[test]
    fn success_replaces_previous_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(out.join("AA")).unwrap();

        Extractor::new("true")
            .extract(Path::new("dump.xml.bz2"), &out)
            .unwrap();

        assert!(out.is_dir());
        assert!(!out.join("AA").exists());
        assert!(!part_dir(&out).exists());
    }

    #[cfg(unix)]
    #[test]
    fn succeeding_program() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let e = Extractor::new("true");
        e.extract(Path::new("dump.xml.bz2"), &out).unwrap();
        assert!(out.is_dir());
    }
}
