//! Dump downloading.
//!
//! The dump is fetched with a single blocking GET and streamed to `<dst>.part`,
//! which is renamed to `dst` once complete: `dst` never holds a truncated dump.
//! There is no resumption, retry or integrity check.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use reqwest::Url;

use crate::error::Error;

/// holds the http client that will make the requests.
pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Downloader {
    pub fn new() -> Result<Self, Error> {
        // dumps can take a while: only the connection is bounded
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Download `url` into `dst`, creating parent directories.
    ///
    /// A non-success HTTP status is an error.
    /// Returns the number of written bytes.
    pub fn download(&self, url: &Url, dst: &Path) -> Result<u64, Error> {
        info!("Downloading {}...", url);

        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }

        //fire blocking request, create out file,
        //stream response body into file.
        let response = self.client.get(url.clone()).send()?.error_for_status()?;
        debug!("response: {:?}", response.status());

        let part = part_path(dst);
        let nb_bytes = match stream_to(response, &part) {
            Ok(nb_bytes) => nb_bytes,
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&part) {
                    debug!("could not remove {:?}: {}", part, rm);
                }
                return Err(e);
            }
        };
        std::fs::rename(&part, dst)?;

        info!("Downloaded {:?} ({} bytes)", dst, nb_bytes);
        Ok(nb_bytes)
    }
}

/// Temporary location of a download in progress.
pub fn part_path(dst: &Path) -> PathBuf {
    let mut part = dst.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

fn stream_to(response: reqwest::blocking::Response, dst: &Path) -> Result<u64, Error> {
    let mut out = BufWriter::new(File::create(dst)?);
    let mut buf = BufReader::new(response);
    let nb_bytes = std::io::copy(&mut buf, &mut out)?;
    out.flush()?;
    Ok(nb_bytes)
}
