//! Access to the remote XML feed: request construction, transport, and
//! response parsing.

mod client;
pub(crate) mod parse;
pub(crate) mod request;

pub use client::{FeedClient, FeedTransport};

use thiserror::Error;

/// Failures surfaced by feed operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied an under-specified query. Raised before any
    /// network call is made.
    #[error("bad request: {0}")]
    Request(String),

    /// The document could not be fetched, or is not well-formed markup.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The document is well-formed but is missing required data, or a
    /// value failed to convert to its expected type.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed document: {0}")]
    Document(#[from] roxmltree::Error),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("missing element <{0}>")]
    MissingElement(&'static str),

    #[error("element <{element}> is missing attribute {attribute:?}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("attribute {attribute:?} on <{element}> has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}
