/*! Dataset publishing

Packaged datasets are pushed to a dataset registry through the [Publish] trait.

[HubPublisher] uploads to the Hugging Face Hub:
1. the dataset repository is created if it does not exist,
1. the Hub tells which files go through git LFS (`preupload`),
1. LFS files are uploaded with the basic LFS transfer (one `PUT` per file, then verified),
1. a single commit adds every file: LFS files by their sha256, the others inline (base64).

There is no retry.
!*/
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use base64::Engine;
use log::{debug, info};
use reqwest::blocking::{Body, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::processing::package::PackagedDataset;

pub const HUB_ENDPOINT: &str = "https://huggingface.co";
const REVISION: &str = "main";
const SAMPLE_SIZE: u64 = 512;
const LFS_CONTENT_TYPE: &str = "application/vnd.git-lfs+json";

/// Publishing destination of a packaged dataset.
pub trait Publish {
    fn publish(&self, dataset: &PackagedDataset) -> Result<(), Error>;
}

/// Does not publish anything, only logs what would be published.
#[derive(Debug, Default)]
pub struct DryRun;

impl Publish for DryRun {
    fn publish(&self, dataset: &PackagedDataset) -> Result<(), Error> {
        info!(
            "dry run: not publishing {} files from {:?}",
            dataset.files().len(),
            dataset.root()
        );
        for file in dataset.files() {
            debug!("dry run: would upload {:?}", file);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum UploadMode {
    Regular,
    Lfs,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreuploadFile {
    path: String,
    upload_mode: UploadMode,
    #[serde(default)]
    should_ignore: bool,
}

#[derive(Debug, Deserialize)]
struct PreuploadResponse {
    files: Vec<PreuploadFile>,
}

#[derive(Debug, Deserialize)]
struct BatchAction {
    href: String,
    #[serde(default)]
    header: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchActions {
    upload: Option<BatchAction>,
    verify: Option<BatchAction>,
}

#[derive(Debug, Deserialize)]
struct BatchError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct BatchObject {
    oid: String,
    /// No action: the object is already stored.
    #[serde(default)]
    actions: Option<BatchActions>,
    error: Option<BatchError>,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    objects: Vec<BatchObject>,
}

/// A packaged file to upload.
#[derive(Debug, Clone)]
struct RepoFile {
    local: PathBuf,
    path_in_repo: String,
    size: u64,
    sha256: String,
    /// base64 of the first bytes, used by the Hub to pick the upload mode.
    sample: String,
}

impl RepoFile {
    fn new(root: &Path, file: &Path) -> Result<Self, Error> {
        let local = root.join(file);

        let mut hasher = Sha256::new();
        let size = io::copy(&mut File::open(&local)?, &mut hasher)?;

        let mut sample = Vec::with_capacity(SAMPLE_SIZE as usize);
        File::open(&local)?.take(SAMPLE_SIZE).read_to_end(&mut sample)?;

        Ok(Self {
            path_in_repo: path_in_repo(file),
            local,
            size,
            sha256: format!("{:x}", hasher.finalize()),
            sample: base64::engine::general_purpose::STANDARD.encode(sample),
        })
    }
}

/// Hugging Face Hub dataset repository.
pub struct HubPublisher {
    client: reqwest::blocking::Client,
    endpoint: Url,
    repo_id: String,
    token: String,
}

impl HubPublisher {
    /// `repo_id` is either `name` or `namespace/name`.
    pub fn new(repo_id: &str, token: &str) -> Result<Self, Error> {
        if repo_id.is_empty() || repo_id.split('/').count() > 2 {
            return Err(Error::Config(format!("invalid repository id: {:?}", repo_id)));
        }

        Ok(Self {
            client: reqwest::blocking::Client::builder().timeout(None).build()?,
            endpoint: Url::parse(HUB_ENDPOINT)?,
            repo_id: repo_id.to_string(),
            token: token.to_string(),
        })
    }

    /// Use another Hub endpoint (mirror, local instance).
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Get a reference to the repository id.
    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    /// Fail with the response body if the status is not a success.
    fn check(&self, response: Response, what: &str) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(Error::Publish(format!(
            "{} on {} refused: {} {}",
            what,
            self.repo_id,
            status,
            response.text().unwrap_or_default()
        )))
    }

    /// Create the dataset repository. An already existing repository is not an error.
    fn create_repo(&self) -> Result<(), Error> {
        let (organization, name) = match self.repo_id.split_once('/') {
            Some((org, name)) => (Some(org), name),
            None => (None, self.repo_id.as_str()),
        };

        let url = self.endpoint.join("api/repos/create")?;
        let response = self
            .authed(self.client.post(url))
            .json(&json!({
                "type": "dataset",
                "name": name,
                "organization": organization,
            }))
            .send()?;

        if response.status() == StatusCode::CONFLICT {
            debug!("repository {} already exists", self.repo_id);
            return Ok(());
        }
        self.check(response, "repository creation")?;
        info!("created dataset repository {}", self.repo_id);
        Ok(())
    }

    /// Ask the Hub how each file has to be uploaded. Ignored files are left out.
    fn preupload(&self, files: &[RepoFile]) -> Result<Vec<(RepoFile, UploadMode)>, Error> {
        let url = self.endpoint.join(&format!(
            "api/datasets/{}/preupload/{}",
            self.repo_id, REVISION
        ))?;
        let body = json!({
            "files": files
                .iter()
                .map(|f| json!({"path": f.path_in_repo, "sample": f.sample, "size": f.size}))
                .collect::<Vec<_>>(),
        });

        let response = self.authed(self.client.post(url)).json(&body).send()?;
        let response: PreuploadResponse = self.check(response, "preupload")?.json()?;
        let modes: HashMap<String, PreuploadFile> = response
            .files
            .into_iter()
            .map(|f| (f.path.clone(), f))
            .collect();

        let mut ret = Vec::with_capacity(files.len());
        for file in files {
            match modes.get(&file.path_in_repo) {
                Some(f) if f.should_ignore => {
                    info!("{} is ignored by the repository", file.path_in_repo)
                }
                Some(f) => ret.push((file.clone(), f.upload_mode)),
                None => {
                    return Err(Error::Publish(format!(
                        "no upload mode given for {}",
                        file.path_in_repo
                    )))
                }
            }
        }
        Ok(ret)
    }

    /// Upload `files` to the LFS storage of the repository.
    fn upload_lfs(&self, files: &[&RepoFile]) -> Result<(), Error> {
        if files.is_empty() {
            return Ok(());
        }

        let url = self.endpoint.join(&format!(
            "datasets/{}.git/info/lfs/objects/batch",
            self.repo_id
        ))?;
        let body = json!({
            "operation": "upload",
            "transfers": ["basic"],
            "objects": files
                .iter()
                .map(|f| json!({"oid": f.sha256, "size": f.size}))
                .collect::<Vec<_>>(),
            "hash_algo": "sha256",
            "ref": {"name": REVISION},
        });

        let response = self
            .authed(self.client.post(url))
            .header(reqwest::header::ACCEPT, LFS_CONTENT_TYPE)
            .header(reqwest::header::CONTENT_TYPE, LFS_CONTENT_TYPE)
            .body(body.to_string())
            .send()?;
        let batch: BatchResponse = self.check(response, "lfs batch")?.json()?;

        let by_oid: HashMap<&str, &RepoFile> =
            files.iter().map(|f| (f.sha256.as_str(), *f)).collect();

        for object in batch.objects {
            let file = by_oid.get(object.oid.as_str()).ok_or_else(|| {
                Error::Publish(format!("lfs batch answered for unknown object {}", object.oid))
            })?;

            if let Some(e) = object.error {
                return Err(Error::Publish(format!(
                    "lfs refused {}: {} {}",
                    file.path_in_repo, e.code, e.message
                )));
            }

            let actions = object.actions.unwrap_or_default();
            match actions.upload {
                Some(upload) => {
                    info!("uploading {} ({} bytes)", file.path_in_repo, file.size);
                    self.put_object(file, &upload)?;
                }
                None => debug!("{} already stored", file.path_in_repo),
            }
            if let Some(verify) = actions.verify {
                self.verify_object(file, &verify)?;
            }
        }
        Ok(())
    }

    /// Basic transfer. The upload location is presigned: no token is sent.
    fn put_object(&self, file: &RepoFile, action: &BatchAction) -> Result<(), Error> {
        let mut request = self
            .client
            .put(&action.href)
            .body(Body::sized(File::open(&file.local)?, file.size));
        for (name, value) in &action.header {
            request = request.header(name.as_str(), value.as_str());
        }
        self.check(request.send()?, "lfs upload")?;
        Ok(())
    }

    fn verify_object(&self, file: &RepoFile, action: &BatchAction) -> Result<(), Error> {
        let mut request = self
            .authed(self.client.post(&action.href))
            .header(reqwest::header::CONTENT_TYPE, LFS_CONTENT_TYPE)
            .body(json!({"oid": file.sha256, "size": file.size}).to_string());
        for (name, value) in &action.header {
            request = request.header(name.as_str(), value.as_str());
        }
        self.check(request.send()?, "lfs verification")?;
        Ok(())
    }

    fn commit(&self, files: &[(RepoFile, UploadMode)]) -> Result<(), Error> {
        let url = self.endpoint.join(&format!(
            "api/datasets/{}/commit/{}",
            self.repo_id, REVISION
        ))?;
        let payload = commit_payload(files, "Upload dataset")?;

        let response = self
            .authed(self.client.post(url))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()?;
        self.check(response, "commit")?;
        Ok(())
    }
}

impl Publish for HubPublisher {
    fn publish(&self, dataset: &PackagedDataset) -> Result<(), Error> {
        info!("Uploading dataset to Hugging Face Hub under {}...", self.repo_id);
        self.create_repo()?;

        let files = dataset
            .files()
            .iter()
            .map(|file| RepoFile::new(dataset.root(), file))
            .collect::<Result<Vec<_>, Error>>()?;
        let files = self.preupload(&files)?;

        let lfs: Vec<&RepoFile> = files
            .iter()
            .filter(|(_, mode)| *mode == UploadMode::Lfs)
            .map(|(file, _)| file)
            .collect();
        self.upload_lfs(&lfs)?;

        self.commit(&files)?;
        info!("Dataset uploaded successfully.");
        Ok(())
    }
}

/// Repository path of a packaged file: always `/`-separated.
fn path_in_repo(file: &Path) -> String {
    file.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the newline-delimited JSON body of a Hub commit:
/// a header line, then one line per file.
/// LFS files are referenced by their sha256, regular files are sent base64 encoded.
fn commit_payload(files: &[(RepoFile, UploadMode)], summary: &str) -> Result<String, Error> {
    let mut lines = vec![serde_json::to_string(&json!({
        "key": "header",
        "value": {"summary": summary, "description": ""},
    }))?];

    for (file, mode) in files {
        let line = match mode {
            UploadMode::Lfs => json!({
                "key": "lfsFile",
                "value": {
                    "path": file.path_in_repo,
                    "algo": "sha256",
                    "oid": file.sha256,
                    "size": file.size,
                },
            }),
            UploadMode::Regular => json!({
                "key": "file",
                "value": {
                    "content": base64::engine::general_purpose::STANDARD
                        .encode(std::fs::read(&file.local)?),
                    "path": file.path_in_repo,
                    "encoding": "base64",
                },
            }),
        };
        lines.push(serde_json::to_string(&line)?);
    }

    Ok(lines.join("\n"))
}
