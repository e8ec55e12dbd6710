use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("product store {} not found", path.display())]
    StoreNotFound { path: PathBuf },

    #[error("product store {} is not valid JSON: {source}", path.display())]
    StoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on product store {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no <{tag} class=\"{class}\"> element found")]
    ElementNotFound { tag: String, class: String },

    #[error("no price found in {text:?}")]
    PriceNotFound { text: String },

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("index {index} is out of range (tracking {len} products)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown product field {0:?}")]
    UnknownField(String),

    #[error("{input:?} is not a finite number")]
    InvalidNumber {
        input: String,
        #[source]
        source: Option<ParseFloatError>,
    },

    #[error("{input:?} is not a valid index")]
    InvalidIndex {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("messaging credentials are incomplete: {0} is not set")]
    MissingCredential(&'static str),

    #[error("failed to send text message: {0}")]
    Notify(#[source] reqwest::Error),

    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

impl TrackerError {
    /// True for the "nothing there" family: missing store, element or price.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StoreNotFound { .. } | Self::ElementNotFound { .. } | Self::PriceNotFound { .. }
        )
    }
}
