//! Error enum
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Http(reqwest::Error),
    Url(url::ParseError),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Csv(csv::Error),
    Custom(String),
    /// A single extracted line that could not be turned into an article.
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Not enough articles to build the requested splits.
    InsufficientData(String),
    /// Frequency computation on an empty label sequence.
    EmptyInput,
    Extractor(String),
    Config(String),
    Publish(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Serde(e) => write!(f, "json error: {}", e),
            Error::Http(e) => write!(f, "http error: {}", e),
            Error::Url(e) => write!(f, "invalid url: {}", e),
            Error::Glob(e) => write!(f, "glob error: {}", e),
            Error::GlobPattern(e) => write!(f, "invalid glob pattern: {}", e),
            Error::Csv(e) => write!(f, "csv error: {}", e),
            Error::Custom(s) => write!(f, "{}", s),
            Error::MalformedRecord { path, line, reason } => {
                write!(f, "malformed record at {:?}:{}: {}", path, line, reason)
            }
            Error::InsufficientData(s) => write!(f, "insufficient data: {}", s),
            Error::EmptyInput => write!(f, "cannot compute frequencies of an empty label sequence"),
            Error::Extractor(s) => write!(f, "extractor failed: {}", s),
            Error::Config(s) => write!(f, "invalid configuration: {}", s),
            Error::Publish(s) => write!(f, "publishing failed: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
